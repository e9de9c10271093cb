//! # User Repository
//!
//! Database operations for inspector accounts.
//!
//! ## Lookup Paths
//! ```text
//! register ──► find_by_email_or_username ──► taken? 400 : insert
//! login    ──► get_by_email ──► verify_password
//! /me      ──► get_by_id (id from the JWT `sub` claim)
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use inspect_core::User;

const USER_COLUMNS: &str = "id, email, username, password_hash, name, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user row.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` when the email or username is taken.
    ///   The field is `users.email` or `users.username`.
    pub async fn insert(&self, user: &User) -> DbResult<User> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, username, password_hash, name, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                let value = if field.ends_with("username") {
                    user.username.clone()
                } else {
                    user.email.clone()
                };
                DbError::duplicate(field, value)
            }
            other => other,
        })?;

        Ok(user.clone())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by login email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Finds a user holding either the email or the username.
    ///
    /// Used by registration to reject duplicates before hashing a password.
    pub async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 OR username = ?2 LIMIT 1"
        ))
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets the total count of users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::{Database, DbConfig};

    use super::*;

    fn user(email: &str, username: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            name: Some("Kim Inspector".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    async fn repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = repo().await;
        let kim = repo.insert(&user("kim@example.com", "kim")).await.unwrap();

        let by_id = repo.get_by_id(&kim.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "kim@example.com");
        assert_eq!(by_id.password_hash, "$argon2id$placeholder");
        assert_eq!(by_id.name.as_deref(), Some("Kim Inspector"));

        let by_email = repo.get_by_email("kim@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, kim.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_or_username() {
        let repo = repo().await;
        repo.insert(&user("kim@example.com", "kim")).await.unwrap();

        assert!(repo
            .find_by_email_or_username("kim@example.com", "other")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_email_or_username("other@example.com", "kim")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_email_or_username("other@example.com", "other")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let repo = repo().await;
        repo.insert(&user("kim@example.com", "kim")).await.unwrap();

        let err = repo
            .insert(&user("kim@example.com", "kim2"))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "users.email");
                assert_eq!(value, "kim@example.com");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }

        let err = repo
            .insert(&user("lee@example.com", "kim"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }
}
