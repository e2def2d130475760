use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::Merge;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Journal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub text: String,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewJournal {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalPatch {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl JournalPatch {
    pub fn apply(self, journal: &mut Journal) {
        self.title.merge_into(&mut journal.title);
        self.text.merge_into(&mut journal.text);
    }
}

impl Journal {
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<Journal>, DatabaseError> {
        Ok(sqlx::query_as::<_, Journal>(
            "SELECT id, user_id, title, text, date_created FROM journals
             WHERE user_id = $1 ORDER BY date_created DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?)
    }

    pub async fn find(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<Journal>, DatabaseError> {
        Ok(sqlx::query_as::<_, Journal>(
            "SELECT id, user_id, title, text, date_created FROM journals WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
    }

    pub async fn create(pool: &PgPool, user_id: i64, new: &NewJournal) -> Result<Journal, DatabaseError> {
        sqlx::query_as::<_, Journal>(
            "INSERT INTO journals (user_id, title, text) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, text, date_created",
        )
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.text)
        .fetch_one(pool)
        .await
        .map_err(|e| DatabaseError::from(e).foreign_key_as_not_found(|| format!("No user: {}", user_id)))
    }

    pub async fn save(&self, pool: &PgPool) -> Result<Journal, DatabaseError> {
        sqlx::query_as::<_, Journal>(
            "UPDATE journals SET title = $3, text = $4
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, title, text, date_created",
        )
        .bind(self.id)
        .bind(self.user_id)
        .bind(&self.title)
        .bind(&self.text)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("No journal: {}", self.id)))
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM journals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
