//! Actor handlers.
//!
//! - `GET /actors` - list (get:actors)
//! - `POST /actors` - create (post:actors)
//! - `PATCH /actors/{id}` - partial update (update:actors)
//! - `DELETE /actors/{id}` - delete (delete:actors)

use super::{parse_body, path_id};
use crate::errors::ApiError;
use crate::models::{
    ActorAddedResponse, ActorDeletedResponse, ActorListResponse, ActorResponse,
    CreateActorRequest, UpdateActorRequest,
};
use crate::repositories::ActorsRepository;
use crate::routes::AppState;
use axum::body::Bytes;
use axum::extract::{rejection::PathRejection, Path, State};
use axum::Json;
use std::sync::Arc;
use tracing::{info, instrument};

pub const ACTOR_NOT_FOUND: &str = "Actor ID requested not found in the database";
pub const ADD_ACTOR_FAILED: &str = "Failed to add new actor to the database";
pub const UPDATE_ACTOR_FAILED: &str = "Failed to make updates to Actors database";
pub const DELETE_ACTOR_FAILED: &str = "Failed to delete the actor from database";

/// Handler for GET /actors
#[instrument(skip_all, name = "ca.handlers.actors.list")]
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActorListResponse>, ApiError> {
    let actors = ActorsRepository::list(&state.pool).await?;

    Ok(Json(ActorListResponse {
        success: true,
        actors,
    }))
}

/// Handler for POST /actors
///
/// # Response
///
/// - 200 OK: `{"success": true, "actor_added": {...}}`
/// - 422: missing field, malformed body, or rejected insert
#[instrument(skip_all, name = "ca.handlers.actors.create")]
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ActorAddedResponse>, ApiError> {
    let request: CreateActorRequest = parse_body(&body)?;
    let new_actor = request.validate()?;

    let actor = ActorsRepository::insert(&state.pool, &new_actor)
        .await
        .map_err(|source| ApiError::Persistence {
            message: ADD_ACTOR_FAILED,
            source,
        })?;

    info!(target: "ca.handlers.actors", actor_id = actor.id, "Actor added");

    Ok(Json(ActorAddedResponse {
        success: true,
        actor_added: actor,
    }))
}

/// Handler for PATCH /actors/{id}
///
/// Only keys present in the body are written. The actor is looked up
/// before the body is read, so an unknown id is a 404 whatever the body.
#[instrument(skip_all, name = "ca.handlers.actors.update")]
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<ActorResponse>, ApiError> {
    let id = path_id(path)?;

    ActorsRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(ACTOR_NOT_FOUND))?;

    let changes: UpdateActorRequest = parse_body(&body)?;

    let actor = ActorsRepository::update(&state.pool, id, changes)
        .await
        .map_err(|source| ApiError::Persistence {
            message: UPDATE_ACTOR_FAILED,
            source,
        })?
        .ok_or_else(|| ApiError::not_found(ACTOR_NOT_FOUND))?;

    info!(target: "ca.handlers.actors", actor_id = id, "Actor updated");

    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

/// Handler for DELETE /actors/{id}
#[instrument(skip_all, name = "ca.handlers.actors.delete")]
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ActorDeletedResponse>, ApiError> {
    let id = path_id(path)?;

    ActorsRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(ACTOR_NOT_FOUND))?;

    let actor = ActorsRepository::delete(&state.pool, id)
        .await
        .map_err(|source| ApiError::Persistence {
            message: DELETE_ACTOR_FAILED,
            source,
        })?
        .ok_or_else(|| ApiError::not_found(ACTOR_NOT_FOUND))?;

    info!(target: "ca.handlers.actors", actor_id = id, "Actor deleted");

    Ok(Json(ActorDeletedResponse {
        success: true,
        deleted_actor: actor,
    }))
}
