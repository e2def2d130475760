use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::user::USER_COLUMNS;
use super::User;
use crate::database::DatabaseError;

/// Directed edge: `follower_id` follows `followed_id`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Follow {
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Users following `user_id`
    pub async fn followers(pool: &PgPool, user_id: i64) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM follows f
             JOIN users u ON u.id = f.follower_id
             WHERE f.followed_id = $1
             ORDER BY f.created_at, u.id"
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_all(pool).await?)
    }

    /// Users that `user_id` follows
    pub async fn following(pool: &PgPool, user_id: i64) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM follows f
             JOIN users u ON u.id = f.followed_id
             WHERE f.follower_id = $1
             ORDER BY f.created_at, u.id"
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_all(pool).await?)
    }

    pub async fn create(pool: &PgPool, follower_id: i64, followed_id: i64) -> Result<Follow, DatabaseError> {
        sqlx::query_as::<_, Follow>(
            "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)
             RETURNING follower_id, followed_id, created_at",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            DatabaseError::unique_as_conflict(e, || format!("Already following user {}", followed_id))
                .foreign_key_as_not_found(|| format!("No user: {}", follower_id))
        })
    }

    pub async fn delete(pool: &PgPool, follower_id: i64, followed_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
