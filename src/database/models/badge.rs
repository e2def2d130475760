use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub thumbnail: Option<String>,
}

/// A badge as held by a user
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EarnedBadge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub earned_at: DateTime<Utc>,
}

const EARNED_SELECT: &str = "SELECT b.id, b.name, b.description, b.thumbnail, ub.earned_at \
     FROM users_badges ub JOIN badges b ON b.id = ub.badge_id";

impl Badge {
    pub async fn list(pool: &PgPool) -> Result<Vec<Badge>, DatabaseError> {
        Ok(sqlx::query_as::<_, Badge>("SELECT id, name, description, thumbnail FROM badges ORDER BY id")
            .fetch_all(pool)
            .await?)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Badge>, DatabaseError> {
        Ok(sqlx::query_as::<_, Badge>("SELECT id, name, description, thumbnail FROM badges WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn earned(pool: &PgPool, user_id: i64) -> Result<Vec<EarnedBadge>, DatabaseError> {
        let sql = format!("{EARNED_SELECT} WHERE ub.user_id = $1 ORDER BY ub.earned_at, b.id");
        Ok(sqlx::query_as::<_, EarnedBadge>(&sql).bind(user_id).fetch_all(pool).await?)
    }

    pub async fn award(pool: &PgPool, user_id: i64, badge_id: i64) -> Result<EarnedBadge, DatabaseError> {
        sqlx::query("INSERT INTO users_badges (user_id, badge_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(badge_id)
            .execute(pool)
            .await
            .map_err(|e| {
                DatabaseError::unique_as_conflict(e, || format!("Badge {} already earned", badge_id))
                    .foreign_key_as_not_found(|| format!("No user: {}", user_id))
            })?;

        let sql = format!("{EARNED_SELECT} WHERE ub.user_id = $1 AND ub.badge_id = $2");
        sqlx::query_as::<_, EarnedBadge>(&sql)
            .bind(user_id)
            .bind(badge_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No badge: {}", badge_id)))
    }

    pub async fn revoke(pool: &PgPool, user_id: i64, badge_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users_badges WHERE user_id = $1 AND badge_id = $2")
            .bind(user_id)
            .bind(badge_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
