//! Account storage behind a narrow interface.
//!
//! Handlers only see [`UserStore`]; the SQLite implementation hashes with
//! argon2 on the blocking pool so a login never stalls the runtime.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inspect_core::User;
use inspect_db::{Database, DbError, DbResult};

/// Registration input after validation. `password` is plaintext.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

/// Account storage used by the auth handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hashes the password and stores a new account.
    async fn create(&self, record: NewUserRecord) -> DbResult<User>;

    /// Any account whose email or username collides with the given pair.
    async fn find_by_email_or_username(&self, email: &str, username: &str)
        -> DbResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> DbResult<Option<User>>;

    /// Checks a plaintext password against the stored hash.
    async fn verify_password(&self, user: &User, password: &str) -> bool;
}

/// [`UserStore`] over the inspect-db SQLite pool.
#[derive(Clone)]
pub struct SqliteUserStore {
    db: Database,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        SqliteUserStore { db }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, record: NewUserRecord) -> DbResult<User> {
        let password = record.password;
        let password_hash = tokio::task::spawn_blocking(move || {
            inspect_db::hash_password(&password)
        })
        .await
        .map_err(|e| DbError::Internal(format!("Hashing task failed: {}", e)))??;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: record.email,
            username: record.username,
            password_hash,
            name: record.name,
            created_at: now,
            updated_at: now,
        };

        self.db.users().insert(&user).await
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> DbResult<Option<User>> {
        self.db.users().find_by_email_or_username(email, username).await
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.db.users().get_by_email(email).await
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<User>> {
        self.db.users().get_by_id(id).await
    }

    async fn verify_password(&self, user: &User, password: &str) -> bool {
        let password = password.to_string();
        let hash = user.password_hash.clone();

        match tokio::task::spawn_blocking(move || inspect_db::verify_password(&password, &hash))
            .await
        {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspect_db::DbConfig;

    fn record(email: &str, username: &str) -> NewUserRecord {
        NewUserRecord {
            email: email.to_string(),
            username: username.to_string(),
            password: "correct horse".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_verify() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = SqliteUserStore::new(db);

        let user = store.create(record("kim@example.com", "kim")).await.unwrap();
        assert_ne!(user.password_hash, "correct horse");

        let found = store.find_by_email("kim@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.verify_password(&found, "correct horse").await);
        assert!(!store.verify_password(&found, "wrong horse").await);

        assert!(store.find_by_id(&user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_collision_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = SqliteUserStore::new(db);
        store.create(record("kim@example.com", "kim")).await.unwrap();

        let by_username = store
            .find_by_email_or_username("other@example.com", "kim")
            .await
            .unwrap();
        assert!(by_username.is_some());

        let none = store
            .find_by_email_or_username("other@example.com", "other")
            .await
            .unwrap();
        assert!(none.is_none());

        let err = store.create(record("kim@example.com", "kim2")).await.unwrap_err();
        assert!(err.is_duplicate());
    }
}
