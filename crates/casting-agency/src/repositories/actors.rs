//! Actors repository.
//!
//! # Security
//!
//! - All queries use parameterized statements
//! - Record contents are not logged

use super::{observe, StoreError};
use crate::models::{Actor, NewActor, UpdateActorRequest};
use sqlx::PgPool;
use tracing::instrument;

/// Repository for actor records.
pub struct ActorsRepository;

impl ActorsRepository {
    /// All actors, ordered by id.
    #[instrument(skip_all, name = "ca.repository.list_actors")]
    pub async fn list(pool: &PgPool) -> Result<Vec<Actor>, StoreError> {
        observe(
            "list_actors",
            sqlx::query_as::<_, Actor>(
                r#"
                SELECT id, name, age, gender
                FROM actors
                ORDER BY id ASC
                "#,
            )
            .fetch_all(pool),
        )
        .await
    }

    /// Look up a single actor.
    #[instrument(skip_all, name = "ca.repository.find_actor", fields(actor_id = id))]
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Actor>, StoreError> {
        observe(
            "find_actor",
            sqlx::query_as::<_, Actor>(
                r#"
                SELECT id, name, age, gender
                FROM actors
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(pool),
        )
        .await
    }

    /// Insert an actor and return the stored row.
    #[instrument(skip_all, name = "ca.repository.insert_actor")]
    pub async fn insert(pool: &PgPool, actor: &NewActor) -> Result<Actor, StoreError> {
        observe("insert_actor", async {
            let mut tx = pool.begin().await?;

            let inserted = sqlx::query_as::<_, Actor>(
                r#"
                INSERT INTO actors (name, age, gender)
                VALUES ($1, $2, $3)
                RETURNING id, name, age, gender
                "#,
            )
            .bind(&actor.name)
            .bind(actor.age)
            .bind(&actor.gender)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(inserted)
        })
        .await
    }

    /// Apply the fields present in `changes` and return the updated row.
    ///
    /// A field sent as `null` is written as NULL and rejected by the schema.
    /// Returns `None` if the actor no longer exists.
    #[instrument(skip_all, name = "ca.repository.update_actor", fields(actor_id = id))]
    pub async fn update(
        pool: &PgPool,
        id: i32,
        changes: UpdateActorRequest,
    ) -> Result<Option<Actor>, StoreError> {
        let set_name = changes.name.is_present();
        let set_age = changes.age.is_present();
        let set_gender = changes.gender.is_present();

        observe("update_actor", async {
            let mut tx = pool.begin().await?;

            let updated = sqlx::query_as::<_, Actor>(
                r#"
                UPDATE actors
                SET name = CASE WHEN $2 THEN $3 ELSE name END,
                    age = CASE WHEN $4 THEN $5 ELSE age END,
                    gender = CASE WHEN $6 THEN $7 ELSE gender END
                WHERE id = $1
                RETURNING id, name, age, gender
                "#,
            )
            .bind(id)
            .bind(set_name)
            .bind(changes.name.into_value())
            .bind(set_age)
            .bind(changes.age.into_value())
            .bind(set_gender)
            .bind(changes.gender.into_value())
            .fetch_optional(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(updated)
        })
        .await
    }

    /// Delete an actor and return the removed row, or `None` if absent.
    #[instrument(skip_all, name = "ca.repository.delete_actor", fields(actor_id = id))]
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Actor>, StoreError> {
        observe("delete_actor", async {
            let mut tx = pool.begin().await?;

            let deleted = sqlx::query_as::<_, Actor>(
                r#"
                DELETE FROM actors
                WHERE id = $1
                RETURNING id, name, age, gender
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
