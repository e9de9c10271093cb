//! # Inspection Repository
//!
//! Database operations for inspection records.
//!
//! ## Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewInspection (request)            inspections (row)                   │
//! │  ─────────────────────              ─────────────────────────           │
//! │  productName ─────────────────────► product_name                        │
//! │  inspector ───────────────────────► inspector                           │
//! │  notes ───────────────────────────► notes (NULL when absent)            │
//! │  photos {front,back,left,right} ──► photos (JSON text)                  │
//! │  (authenticated user) ────────────► user_id ──FK──► users.id           │
//! │                                                      ON DELETE CASCADE  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! History queries never select the `photos` column; a single inspection can
//! carry several megabytes of base64.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use inspect_core::{Inspection, InspectionSummary, NewInspection};

/// Repository for inspection database operations.
#[derive(Debug, Clone)]
pub struct InspectionRepository {
    pool: SqlitePool,
}

impl InspectionRepository {
    /// Creates a new InspectionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InspectionRepository { pool }
    }

    /// Builds and stores a new inspection owned by `user_id`.
    ///
    /// ## Errors
    /// - `DbError::ForeignKeyViolation` if the user does not exist
    pub async fn create(&self, user_id: &str, new: &NewInspection) -> DbResult<Inspection> {
        let now = Utc::now();

        let inspection = Inspection {
            id: Uuid::new_v4().to_string(),
            product_name: new.product_name.trim().to_string(),
            inspector: new.inspector.trim().to_string(),
            notes: new.notes.clone(),
            photos: serde_json::to_string(&new.photos)?,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.insert(&inspection).await
    }

    /// Inserts a fully-formed inspection row.
    pub async fn insert(&self, inspection: &Inspection) -> DbResult<Inspection> {
        debug!(
            id = %inspection.id,
            product_name = %inspection.product_name,
            user_id = %inspection.user_id,
            "Inserting inspection"
        );

        sqlx::query(
            r#"
            INSERT INTO inspections (
                id, product_name, inspector, notes, photos,
                user_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&inspection.id)
        .bind(&inspection.product_name)
        .bind(&inspection.inspector)
        .bind(&inspection.notes)
        .bind(&inspection.photos)
        .bind(&inspection.user_id)
        .bind(inspection.created_at)
        .bind(inspection.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(inspection.clone())
    }

    /// Lists a user's inspections, newest first, without photos.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<InspectionSummary>> {
        let items = sqlx::query_as::<_, InspectionSummary>(
            r#"
            SELECT
                id, product_name, inspector, notes, created_at, updated_at
            FROM inspections
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = items.len(), "Listed inspections");
        Ok(items)
    }

    /// Counts a user's inspections.
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
