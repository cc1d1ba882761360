//! Movie handlers.
//!
//! - `GET /movies` - list (get:movies)
//! - `POST /movies` - create (post:movies)
//! - `PATCH /movies/{id}` - partial update (update:movies)
//! - `DELETE /movies/{id}` - delete (delete:movies)

use super::{parse_body, path_id};
use crate::errors::ApiError;
use crate::models::{
    CreateMovieRequest, MovieAddedResponse, MovieDeletedResponse, MovieListResponse,
    MovieResponse, MovieValidation, UpdateMovieRequest,
};
use crate::repositories::MoviesRepository;
use crate::routes::AppState;
use axum::body::Bytes;
use axum::extract::{rejection::PathRejection, Path, State};
use axum::Json;
use std::sync::Arc;
use tracing::{info, instrument};

pub const MOVIE_NOT_FOUND: &str = "Movie ID requested not found in the database";
pub const ADD_MOVIE_FAILED: &str = "Failed to add new movie to the database";
pub const UPDATE_MOVIE_FAILED: &str = "Failed to make updates to movie in the database";
pub const DELETE_MOVIE_FAILED: &str = "Failed to delete the movie from database";

/// Handler for GET /movies
#[instrument(skip_all, name = "ca.handlers.movies.list")]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let movies = MoviesRepository::list(&state.pool).await?;

    Ok(Json(MovieListResponse {
        success: true,
        movies,
    }))
}

/// Handler for POST /movies
///
/// A release date that is present but not `YYYY-MM-DD` cannot be stored and
/// is reported like any other failed insert.
#[instrument(skip_all, name = "ca.handlers.movies.create")]
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MovieAddedResponse>, ApiError> {
    let request: CreateMovieRequest = parse_body(&body)?;

    let new_movie = match request.validate() {
        MovieValidation::Valid(movie) => movie,
        MovieValidation::Missing(message) => return Err(ApiError::unprocessable(message)),
        MovieValidation::InvalidDate(err) => {
            tracing::debug!(target: "ca.handlers.movies", release_date = %err.0, "Unparseable release date");
            return Err(ApiError::unprocessable(ADD_MOVIE_FAILED));
        }
    };

    let movie = MoviesRepository::insert(&state.pool, &new_movie)
        .await
        .map_err(|source| ApiError::Persistence {
            message: ADD_MOVIE_FAILED,
            source,
        })?;

    info!(target: "ca.handlers.movies", movie_id = movie.id, "Movie added");

    Ok(Json(MovieAddedResponse {
        success: true,
        movie_added: movie,
    }))
}

/// Handler for PATCH /movies/{id}
#[instrument(skip_all, name = "ca.handlers.movies.update")]
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<MovieResponse>, ApiError> {
    let id = path_id(path)?;

    MoviesRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    let request: UpdateMovieRequest = parse_body(&body)?;
    let changes = request.into_changes().map_err(|err| {
        tracing::debug!(target: "ca.handlers.movies", release_date = %err.0, "Unparseable release date");
        ApiError::unprocessable(UPDATE_MOVIE_FAILED)
    })?;

    let movie = MoviesRepository::update(&state.pool, id, changes)
        .await
        .map_err(|source| ApiError::Persistence {
            message: UPDATE_MOVIE_FAILED,
            source,
        })?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    info!(target: "ca.handlers.movies", movie_id = id, "Movie updated");

    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

/// Handler for DELETE /movies/{id}
#[instrument(skip_all, name = "ca.handlers.movies.delete")]
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<MovieDeletedResponse>, ApiError> {
    let id = path_id(path)?;

    MoviesRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    let movie = MoviesRepository::delete(&state.pool, id)
        .await
        .map_err(|source| ApiError::Persistence {
            message: DELETE_MOVIE_FAILED,
            source,
        })?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    info!(target: "ca.handlers.movies", movie_id = id, "Movie deleted");

    Ok(Json(MovieDeletedResponse {
        success: true,
        deleted_movie: movie,
    }))
}
