use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgPool};

use super::{Merge, Read, User};
use crate::database::DatabaseError;

const USER_READ_SELECT: &str = "SELECT ur.user_id, ur.read_id, r.title, r.isbn, r.pages, r.thumbnail, \
     ARRAY(SELECT a.name FROM read_authors ra JOIN authors a ON a.id = ra.author_id \
           WHERE ra.read_id = r.id ORDER BY ra.position) AS authors, \
     ur.rating, ur.review_text, ur.review_date, ur.added_at \
     FROM users_reads ur JOIN reads r ON r.id = ur.read_id";

/// A read in a user's library, with the user's own rating and review
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRead {
    pub user_id: i64,
    pub read_id: i64,
    pub title: String,
    pub isbn: String,
    pub pages: Option<i32>,
    pub thumbnail: Option<String>,
    pub authors: Vec<String>,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserRead {
    pub read_id: i64,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub review_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserReadPatch {
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub review_date: Option<NaiveDate>,
}

impl UserReadPatch {
    pub fn apply(self, user_read: &mut UserRead) {
        self.rating.merge_into(&mut user_read.rating);
        self.review_text.merge_into(&mut user_read.review_text);
        self.review_date.merge_into(&mut user_read.review_date);
    }
}

impl UserRead {
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<UserRead>, DatabaseError> {
        let sql = format!("{USER_READ_SELECT} WHERE ur.user_id = $1 ORDER BY ur.added_at DESC, ur.read_id");
        Ok(sqlx::query_as::<_, UserRead>(&sql).bind(user_id).fetch_all(pool).await?)
    }

    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        read_id: i64,
    ) -> Result<Option<UserRead>, DatabaseError> {
        let sql = format!("{USER_READ_SELECT} WHERE ur.user_id = $1 AND ur.read_id = $2");
        Ok(sqlx::query_as::<_, UserRead>(&sql)
            .bind(user_id)
            .bind(read_id)
            .fetch_optional(executor)
            .await?)
    }

    /// Add a read to the library and credit the user's statistics with its
    /// page count, atomically.
    pub async fn add(pool: &PgPool, user_id: i64, new: &NewUserRead) -> Result<UserRead, DatabaseError> {
        let mut tx = pool.begin().await?;

        let pages = Read::page_count(&mut *tx, new.read_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No read: {}", new.read_id)))?;

        sqlx::query(
            "INSERT INTO users_reads (user_id, read_id, rating, review_text, review_date)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(new.read_id)
        .bind(new.rating)
        .bind(&new.review_text)
        .bind(new.review_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DatabaseError::unique_as_conflict(e, || {
                format!("Read {} is already in the library", new.read_id)
            })
            .foreign_key_as_not_found(|| format!("No user: {}", user_id))
        })?;

        User::adjust_stats(&mut *tx, user_id, 1, pages).await?;

        let user_read = UserRead::find(&mut *tx, user_id, new.read_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No read: {}", new.read_id)))?;

        tx.commit().await?;

        tracing::debug!("User {} added read {} ({} pages)", user_id, new.read_id, pages);
        Ok(user_read)
    }

    /// Persist rating and review fields
    pub async fn save(&self, pool: &PgPool) -> Result<UserRead, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users_reads SET rating = $3, review_text = $4, review_date = $5
             WHERE user_id = $1 AND read_id = $2",
        )
        .bind(self.user_id)
        .bind(self.read_id)
        .bind(self.rating)
        .bind(&self.review_text)
        .bind(self.review_date)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No read in library: {}", self.read_id)));
        }

        UserRead::find(pool, self.user_id, self.read_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No read in library: {}", self.read_id)))
    }

    /// Remove a read from the library and debit the same statistics `add`
    /// credited. Returns false when the read was not in the library.
    pub async fn remove(pool: &PgPool, user_id: i64, read_id: i64) -> Result<bool, DatabaseError> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query_scalar::<_, Option<i32>>(
            "DELETE FROM users_reads ur USING reads r
             WHERE ur.user_id = $1 AND ur.read_id = $2 AND r.id = ur.read_id
             RETURNING r.pages",
        )
        .bind(user_id)
        .bind(read_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(pages) = removed else {
            return Ok(false);
        };
        let pages = i64::from(pages.unwrap_or(0));

        User::adjust_stats(&mut *tx, user_id, -1, -pages).await?;

        tx.commit().await?;

        tracing::debug!("User {} removed read {} ({} pages)", user_id, read_id, pages);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut user_read = UserRead {
            user_id: 1,
            read_id: 2,
            title: "Dune".to_string(),
            isbn: "111".to_string(),
            pages: Some(412),
            thumbnail: None,
            authors: vec!["Frank Herbert".to_string()],
            rating: Some(4),
            review_text: Some("Spice".to_string()),
            review_date: None,
            added_at: Utc::now(),
        };

        UserReadPatch {
            rating: Some(5),
            review_text: Some(String::new()),
            review_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
        .apply(&mut user_read);

        assert_eq!(user_read.rating, Some(5));
        assert_eq!(user_read.review_text.as_deref(), Some("Spice"));
        assert_eq!(user_read.review_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
