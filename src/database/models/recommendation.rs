use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::Merge;
use crate::database::DatabaseError;

/// A read suggested by `sender_id` to `receiver_id`. Either party may view or
/// delete it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recommendation {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub read_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewRecommendation {
    pub receiver_id: i64,
    pub read_id: i64,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationPatch {
    pub content: Option<String>,
}

impl RecommendationPatch {
    pub fn apply(self, recommendation: &mut Recommendation) {
        self.content.merge_into(&mut recommendation.content);
    }
}

impl Recommendation {
    /// Sent and received recommendations, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Recommendation>, DatabaseError> {
        Ok(sqlx::query_as::<_, Recommendation>(
            "SELECT id, sender_id, receiver_id, read_id, content, created_at FROM recommendations
             WHERE sender_id = $1 OR receiver_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?)
    }

    /// Fetch a recommendation only if `user_id` sent or received it
    pub async fn find_for_party(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<Recommendation>, DatabaseError> {
        Ok(sqlx::query_as::<_, Recommendation>(
            "SELECT id, sender_id, receiver_id, read_id, content, created_at FROM recommendations
             WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
    }

    pub async fn create(pool: &PgPool, sender_id: i64, new: &NewRecommendation) -> Result<Recommendation, DatabaseError> {
        sqlx::query_as::<_, Recommendation>(
            "INSERT INTO recommendations (sender_id, receiver_id, read_id, content) VALUES ($1, $2, $3, $4)
             RETURNING id, sender_id, receiver_id, read_id, content, created_at",
        )
        .bind(sender_id)
        .bind(new.receiver_id)
        .bind(new.read_id)
        .bind(&new.content)
        .fetch_one(pool)
        .await
        .map_err(|e| DatabaseError::from(e).foreign_key_as_not_found(|| format!("No user: {}", sender_id)))
    }

    /// Persist the content; only the sender's row matches
    pub async fn save(&self, pool: &PgPool) -> Result<Recommendation, DatabaseError> {
        sqlx::query_as::<_, Recommendation>(
            "UPDATE recommendations SET content = $3
             WHERE id = $1 AND sender_id = $2
             RETURNING id, sender_id, receiver_id, read_id, content, created_at",
        )
        .bind(self.id)
        .bind(self.sender_id)
        .bind(&self.content)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("No recommendation: {}", self.id)))
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM recommendations WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_replaces_content_only_when_supplied() {
        let mut rec = Recommendation {
            id: 1,
            sender_id: 10,
            receiver_id: 20,
            read_id: 5,
            content: "You'll love it".to_string(),
            created_at: Utc::now(),
        };
        RecommendationPatch { content: Some(String::new()) }.apply(&mut rec);
        assert_eq!(rec.content, "You'll love it");
        RecommendationPatch { content: Some("Chapter 3 is the best".to_string()) }.apply(&mut rec);
        assert_eq!(rec.content, "Chapter 3 is the best");
        assert_eq!(rec.sender_id, 10);
    }
}
