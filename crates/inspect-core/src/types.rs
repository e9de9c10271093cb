//! # Domain Types
//!
//! Core domain types used throughout the inspection service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   Inspection    │   │  MirrorReceipt  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  user_id (FK)   │   │  folder_path    │       │
//! │  │  email (unique) │   │  product_name   │   │  json_file      │       │
//! │  │  username (uq)  │   │  inspector      │   │  photos map     │       │
//! │  │  password_hash  │   │  photos (JSON)  │   └─────────────────┘       │
//! │  └────────┬────────┘   └────────┬────────┘                              │
//! │           │                     │                                       │
//! │           ▼                     ▼                                       │
//! │  ┌─────────────────┐   ┌───────────────────┐                           │
//! │  │   UserProfile   │   │ InspectionSummary │  (public projections)     │
//! │  └─────────────────┘   └───────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type serializes with camelCase keys (`productName`, `createdAt`)
//! so the web client's existing TypeScript types line up.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::photo::InspectionPhotos;

// =============================================================================
// User
// =============================================================================

/// A registered inspector account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login email. Unique.
    pub email: String,

    /// Display handle. Unique.
    pub username: String,

    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    /// Optional full name.
    pub name: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public projection returned by the auth endpoints.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// What clients see of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inspection
// =============================================================================

/// Inspection submitted by the capture form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewInspection {
    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub inspector: String,

    /// Free-text remarks. Empty is allowed.
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub photos: InspectionPhotos,
}

/// A stored inspection row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Inspection {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub product_name: String,

    pub inspector: String,

    pub notes: Option<String>,

    /// The photo set as JSON text, exactly as it was submitted.
    pub photos: String,

    /// Owner. Deleting the user deletes their inspections.
    pub user_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Inspection {
    /// Deserializes the stored photo set.
    pub fn photo_set(&self) -> Result<InspectionPhotos, serde_json::Error> {
        serde_json::from_str(&self.photos)
    }

    /// Drops the photo payloads for list views.
    pub fn summary(&self) -> InspectionSummary {
        InspectionSummary {
            id: self.id.clone(),
            product_name: self.product_name.clone(),
            inspector: self.inspector.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// History entry. Photos are left out to keep the list light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InspectionSummary {
    pub id: String,
    pub product_name: String,
    pub inspector: String,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Mirror Receipt
// =============================================================================

/// Where a document sink put a mirrored inspection.
///
/// `json_file` is the bare metadata file name inside `folder_path`.
/// `photos` maps a direction key (`front`, ...) to a web URL (SharePoint)
/// or a file path (local folder). Photos that failed to upload are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MirrorReceipt {
    pub folder_path: String,
    pub json_file: String,
    pub photos: BTreeMap<String, String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
