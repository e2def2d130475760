use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgPool};

use super::Merge;
use crate::database::DatabaseError;

/// Column list for `users u`, shared by every query that returns profiles
pub(crate) const USER_COLUMNS: &str = "u.id, u.username, u.password, u.email, u.first_name, \
     u.last_name, u.bio, u.exp, u.total_books, u.total_pages, u.created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub exp: i64,
    pub total_books: i64,
    pub total_pages: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Apply profile fields. The password is hashed by the caller and set
    /// separately.
    pub fn apply(self, user: &mut User) {
        self.email.merge_into(&mut user.email);
        self.first_name.merge_into(&mut user.first_name);
        self.last_name.merge_into(&mut user.last_name);
        self.bio.merge_into(&mut user.bio);
    }
}

impl User {
    pub async fn create(pool: &PgPool, new: &NewUser, password_hash: &str) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users AS u (username, password, email, first_name, last_name, bio)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&new.username)
            .bind(password_hash)
            .bind(&new.email)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.bio)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                DatabaseError::unique_as_conflict(e, || {
                    format!("Username {} is already taken", new.username)
                })
            })
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?)
    }

    /// All users, optionally restricted to usernames starting with `prefix`
    pub async fn list(pool: &PgPool, prefix: Option<&str>) -> Result<Vec<User>, DatabaseError> {
        let pattern = prefix.map(|p| format!("{}%", escape_like(p)));
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u
             WHERE $1::text IS NULL OR u.username ILIKE $1
             ORDER BY u.username"
        );
        Ok(sqlx::query_as::<_, User>(&sql).bind(pattern).fetch_all(pool).await?)
    }

    pub async fn exists<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<bool, DatabaseError> {
        Ok(sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?)
    }

    /// Persist the mutable profile fields and password
    pub async fn save(&self, pool: &PgPool) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users AS u
             SET email = $2, first_name = $3, last_name = $4, bio = $5, password = $6
             WHERE u.id = $1
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(self.id)
            .bind(&self.email)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.bio)
            .bind(&self.password)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", self.id)))
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Shift the reading counters. Pages count toward both `total_pages` and
    /// `exp`; negative deltas undo a previous addition.
    pub async fn adjust_stats<'e>(
        executor: impl PgExecutor<'e>,
        id: i64,
        books: i64,
        pages: i64,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users
             SET total_books = total_books + $2,
                 total_pages = total_pages + $3,
                 exp = exp + $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(books)
        .bind(pages)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No user: {}", id)));
        }
        Ok(())
    }
}

/// Escape LIKE wildcards so user input matches literally
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password: "$argon2id$v=19$...".to_string(),
            email: Some("alice@example.com".to_string()),
            first_name: None,
            last_name: None,
            bio: None,
            exp: 0,
            total_books: 0,
            total_pages: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_is_never_serialized() {
        let value = serde_json::to_value(user()).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn patch_keeps_unsupplied_fields() {
        let mut user = user();
        UserPatch {
            bio: Some("Reads on the train".to_string()),
            email: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.bio.as_deref(), Some("Reads on the train"));
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("a_b%c"), "a\\_b\\%c");
    }
}
