use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::read::READ_COLUMNS;
use super::{Merge, Read};
use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Collection {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CollectionPatch {
    pub fn apply(self, collection: &mut Collection) {
        self.name.merge_into(&mut collection.name);
        self.description.merge_into(&mut collection.description);
    }
}

fn duplicate_name(name: &str) -> String {
    format!("Collection {} already exists", name)
}

impl Collection {
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<Collection>, DatabaseError> {
        Ok(sqlx::query_as::<_, Collection>(
            "SELECT id, user_id, name, description FROM collections WHERE user_id = $1 ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?)
    }

    pub async fn find(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<Collection>, DatabaseError> {
        Ok(sqlx::query_as::<_, Collection>(
            "SELECT id, user_id, name, description FROM collections WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
    }

    pub async fn create(pool: &PgPool, user_id: i64, new: &NewCollection) -> Result<Collection, DatabaseError> {
        sqlx::query_as::<_, Collection>(
            "INSERT INTO collections (user_id, name, description) VALUES ($1, $2, $3)
             RETURNING id, user_id, name, description",
        )
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            DatabaseError::unique_as_conflict(e, || duplicate_name(&new.name))
                .foreign_key_as_not_found(|| format!("No user: {}", user_id))
        })
    }

    pub async fn save(&self, pool: &PgPool) -> Result<Collection, DatabaseError> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections SET name = $3, description = $4
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, name, description",
        )
        .bind(self.id)
        .bind(self.user_id)
        .bind(&self.name)
        .bind(&self.description)
        .fetch_optional(pool)
        .await
        .map_err(|e| DatabaseError::unique_as_conflict(e, || duplicate_name(&self.name)))?
        .ok_or_else(|| DatabaseError::NotFound(format!("No collection: {}", self.id)))
    }

    /// Delete by (id, owner) so a guessed id cannot remove another user's row
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn reads(pool: &PgPool, collection_id: i64) -> Result<Vec<Read>, DatabaseError> {
        let sql = format!(
            "SELECT {READ_COLUMNS} FROM collections_reads cr
             JOIN reads r ON r.id = cr.read_id
             WHERE cr.collection_id = $1
             ORDER BY r.title, r.id"
        );
        Ok(sqlx::query_as::<_, Read>(&sql).bind(collection_id).fetch_all(pool).await?)
    }

    pub async fn add_read(pool: &PgPool, collection_id: i64, read_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO collections_reads (collection_id, read_id) VALUES ($1, $2)")
            .bind(collection_id)
            .bind(read_id)
            .execute(pool)
            .await
            .map_err(|e| {
                DatabaseError::unique_as_conflict(e, || {
                    format!("Read {} already exists in collection {}", read_id, collection_id)
                })
            })?;
        Ok(())
    }

    pub async fn remove_read(pool: &PgPool, collection_id: i64, read_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM collections_reads WHERE collection_id = $1 AND read_id = $2")
            .bind(collection_id)
            .bind(read_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
