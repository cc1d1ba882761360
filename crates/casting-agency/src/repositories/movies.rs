//! Movies repository.

use super::{observe, StoreError};
use crate::models::{Movie, MovieChanges, NewMovie};
use sqlx::PgPool;
use tracing::instrument;

/// Repository for movie records.
pub struct MoviesRepository;

impl MoviesRepository {
    /// All movies, ordered by id.
    #[instrument(skip_all, name = "ca.repository.list_movies")]
    pub async fn list(pool: &PgPool) -> Result<Vec<Movie>, StoreError> {
        observe(
            "list_movies",
            sqlx::query_as::<_, Movie>(
                r#"
                SELECT id, title, release_date
                FROM movies
                ORDER BY id ASC
                "#,
            )
            .fetch_all(pool),
        )
        .await
    }

    #[instrument(skip_all, name = "ca.repository.find_movie", fields(movie_id = id))]
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Movie>, StoreError> {
        observe(
            "find_movie",
            sqlx::query_as::<_, Movie>(
                r#"
                SELECT id, title, release_date
                FROM movies
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(pool),
        )
        .await
    }

    #[instrument(skip_all, name = "ca.repository.insert_movie")]
    pub async fn insert(pool: &PgPool, movie: &NewMovie) -> Result<Movie, StoreError> {
        observe("insert_movie", async {
            let mut tx = pool.begin().await?;

            let inserted = sqlx::query_as::<_, Movie>(
                r#"
                INSERT INTO movies (title, release_date)
                VALUES ($1, $2)
                RETURNING id, title, release_date
                "#,
            )
            .bind(&movie.title)
            .bind(movie.release_date)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(inserted)
        })
        .await
    }

    /// Apply the fields present in `changes`; `None` if the movie is gone.
    #[instrument(skip_all, name = "ca.repository.update_movie", fields(movie_id = id))]
    pub async fn update(
        pool: &PgPool,
        id: i32,
        changes: MovieChanges,
    ) -> Result<Option<Movie>, StoreError> {
        let set_title = changes.title.is_present();
        let set_release_date = changes.release_date.is_present();

        observe("update_movie", async {
            let mut tx = pool.begin().await?;

            let updated = sqlx::query_as::<_, Movie>(
                r#"
                UPDATE movies
                SET title = CASE WHEN $2 THEN $3 ELSE title END,
                    release_date = CASE WHEN $4 THEN $5 ELSE release_date END
                WHERE id = $1
                RETURNING id, title, release_date
                "#,
            )
            .bind(id)
            .bind(set_title)
            .bind(changes.title.into_value())
            .bind(set_release_date)
            .bind(changes.release_date.into_value())
            .fetch_optional(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(updated)
        })
        .await
    }

    #[instrument(skip_all, name = "ca.repository.delete_movie", fields(movie_id = id))]
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Movie>, StoreError> {
        observe("delete_movie", async {
            let mut tx = pool.begin().await?;

            let deleted = sqlx::query_as::<_, Movie>(
                r#"
                DELETE FROM movies
                WHERE id = $1
                RETURNING id, title, release_date
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(deleted)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::Patch;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_movie(title: &str, release_date: NaiveDate) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            release_date,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_insert_list_find(pool: PgPool) {
        let heat = MoviesRepository::insert(&pool, &new_movie("Heat", date(1995, 12, 15)))
            .await
            .unwrap();
        let alien = MoviesRepository::insert(&pool, &new_movie("Alien", date(1979, 5, 25)))
            .await
            .unwrap();

        let movies = MoviesRepository::list(&pool).await.unwrap();
        assert_eq!(movies, vec![heat.clone(), alien]);

        let found = MoviesRepository::find_by_id(&pool, heat.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.release_date, date(1995, 12, 15));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_insert_rejects_empty_title(pool: PgPool) {
        let err = MoviesRepository::insert(&pool, &new_movie("", date(2000, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_release_date_only(pool: PgPool) {
        let movie = MoviesRepository::insert(&pool, &new_movie("Heat", date(1995, 12, 15)))
            .await
            .unwrap();

        let changes = MovieChanges {
            release_date: Patch::Value(date(1996, 1, 1)),
            ..Default::default()
        };
        let updated = MoviesRepository::update(&pool, movie.id, changes)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Heat");
        assert_eq!(updated.release_date, date(1996, 1, 1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_missing_movie(pool: PgPool) {
        let changes = MovieChanges {
            title: Patch::Value("Ghost".to_string()),
            ..Default::default()
        };
        assert!(MoviesRepository::update(&pool, 404, changes)
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_null_title_fails(pool: PgPool) {
        let movie = MoviesRepository::insert(&pool, &new_movie("Heat", date(1995, 12, 15)))
            .await
            .unwrap();

        let changes = MovieChanges {
            title: Patch::Null,
            ..Default::default()
        };
        let err = MoviesRepository::update(&pool, movie.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete(pool: PgPool) {
        let movie = MoviesRepository::insert(&pool, &new_movie("Heat", date(1995, 12, 15)))
            .await
            .unwrap();

        let deleted = MoviesRepository::delete(&pool, movie.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deleted, movie);
        assert!(MoviesRepository::list(&pool).await.unwrap().is_empty());
    }
}
