use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

/// Columns of `reads r` plus the linked author names in submission order
pub(crate) const READ_COLUMNS: &str = "r.id, r.title, r.description, r.isbn, r.avg_rating, \
     r.print_type, r.publisher, r.pages, r.thumbnail, \
     ARRAY(SELECT a.name FROM read_authors ra JOIN authors a ON a.id = ra.author_id \
           WHERE ra.read_id = r.id ORDER BY ra.position) AS authors";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Read {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub isbn: String,
    pub avg_rating: Option<f64>,
    pub print_type: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    pub thumbnail: Option<String>,
    pub authors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewRead {
    pub title: String,
    pub description: Option<String>,
    pub isbn: String,
    pub avg_rating: Option<f64>,
    pub print_type: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
}

impl NewRead {
    /// Trimmed, non-empty author names with duplicates removed, first
    /// occurrence wins
    pub fn author_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.authors.iter().flatten() {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// A user's rating or review of a read, as shown on the read's page
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub user_id: i64,
    pub username: String,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub review_date: Option<NaiveDate>,
}

impl Read {
    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Read>, DatabaseError> {
        let sql = format!("SELECT {READ_COLUMNS} FROM reads r WHERE r.id = $1");
        Ok(sqlx::query_as::<_, Read>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn find_by_isbn<'e>(executor: impl PgExecutor<'e>, isbn: &str) -> Result<Option<Read>, DatabaseError> {
        let sql = format!("SELECT {READ_COLUMNS} FROM reads r WHERE r.isbn = $1");
        Ok(sqlx::query_as::<_, Read>(&sql)
            .bind(isbn)
            .fetch_optional(executor)
            .await?)
    }

    /// Catalog listing, optionally filtered by a case-insensitive title
    /// substring
    pub async fn list(pool: &PgPool, title: Option<&str>) -> Result<Vec<Read>, DatabaseError> {
        let pattern = title.map(|t| format!("%{}%", super::user::escape_like(t)));
        let sql = format!(
            "SELECT {READ_COLUMNS} FROM reads r
             WHERE $1::text IS NULL OR r.title ILIKE $1
             ORDER BY r.title, r.id"
        );
        Ok(sqlx::query_as::<_, Read>(&sql).bind(pattern).fetch_all(pool).await?)
    }

    pub async fn exists<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<bool, DatabaseError> {
        Ok(sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM reads WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?)
    }

    /// Page count used for reading statistics; `None` when the read does not
    /// exist, `Some(0)` when its page count is unknown
    pub async fn page_count<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<Option<i64>, DatabaseError> {
        let pages = sqlx::query_scalar::<_, Option<i32>>("SELECT pages FROM reads WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(pages.map(|p| i64::from(p.unwrap_or(0))))
    }

    /// Insert a read and link its authors in one transaction. An existing
    /// isbn short-circuits with a conflict before anything is written.
    pub async fn create(pool: &PgPool, new: &NewRead) -> Result<Read, DatabaseError> {
        let conflict = || format!("Read with isbn {} already exists", new.isbn);

        let mut tx = pool.begin().await?;

        if Read::find_by_isbn(&mut *tx, &new.isbn).await?.is_some() {
            return Err(DatabaseError::Conflict(conflict()));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO reads (title, description, isbn, avg_rating, print_type, publisher, pages, thumbnail)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.isbn)
        .bind(new.avg_rating)
        .bind(&new.print_type)
        .bind(&new.publisher)
        .bind(new.pages)
        .bind(&new.thumbnail)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DatabaseError::unique_as_conflict(e, conflict))?;

        let authors = new.author_names();
        for (position, name) in authors.iter().enumerate() {
            // The no-op update makes RETURNING yield the id of an existing author too
            let author_id: i64 = sqlx::query_scalar(
                "INSERT INTO authors (name) VALUES ($1)
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                 RETURNING id",
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO read_authors (read_id, author_id, position) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(author_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Created read {} ({}) with {} authors", id, new.isbn, authors.len());

        Ok(Read {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            isbn: new.isbn.clone(),
            avg_rating: new.avg_rating,
            print_type: new.print_type.clone(),
            publisher: new.publisher.clone(),
            pages: new.pages,
            thumbnail: new.thumbnail.clone(),
            authors,
        })
    }

    /// Ratings and reviews left on a read, newest first
    pub async fn reviews(pool: &PgPool, read_id: i64) -> Result<Vec<Review>, DatabaseError> {
        Ok(sqlx::query_as::<_, Review>(
            "SELECT ur.user_id, u.username, ur.rating, ur.review_text, ur.review_date
             FROM users_reads ur
             JOIN users u ON u.id = ur.user_id
             WHERE ur.read_id = $1 AND (ur.rating IS NOT NULL OR ur.review_text IS NOT NULL)
             ORDER BY ur.review_date DESC NULLS LAST, ur.added_at DESC",
        )
        .bind(read_id)
        .fetch_all(pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_read(authors: Option<Vec<&str>>) -> NewRead {
        NewRead {
            title: "Dune".to_string(),
            description: None,
            isbn: "111".to_string(),
            avg_rating: None,
            print_type: None,
            publisher: None,
            pages: Some(412),
            thumbnail: None,
            authors: authors.map(|a| a.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn missing_authors_yield_empty_list() {
        assert!(new_read(None).author_names().is_empty());
    }

    #[test]
    fn author_names_are_trimmed_and_deduplicated_in_order() {
        let read = new_read(Some(vec![" Frank Herbert", "Brian Herbert", "Frank Herbert", ""]));
        assert_eq!(read.author_names(), vec!["Frank Herbert", "Brian Herbert"]);
    }
}
