//! # Document Sinks
//!
//! After an inspection is stored it is mirrored as a folder of documents:
//!
//! ```text
//! <base>/<productName>_<timestamp>/
//!     inspection-data.json     { productName, inspector, notes, timestamp }
//!     정면.jpg                 front; only the photos that were captured
//!     후면.jpg                 back
//!     좌측.jpg                 left
//!     우측.jpg                 right
//! ```
//!
//! ## Implementations
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ SharePointSink   │ Microsoft Graph, app-only (client credentials) token │
//! │ LocalFolderSink  │ Same layout on the local filesystem                  │
//! │ NoopSink         │ Mirroring disabled, always SinkError::Disabled       │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! The inspection is already committed when a sink runs, so the handler logs
//! sink errors and carries on.

pub mod local;
pub mod sharepoint;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use inspect_core::{InspectionPhotos, MirrorReceipt, NewInspection};

use crate::config::{ApiConfig, MirrorMode};

pub use local::LocalFolderSink;
pub use sharepoint::{SharePointConfig, SharePointSink};

/// Characters SharePoint refuses in item names. Replaced with `_`.
const INVALID_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '#', '%'];

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Mirroring is disabled")]
    Disabled,

    #[error("Sink configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        SinkError::Http(err.to_string())
    }
}

// =============================================================================
// Document
// =============================================================================

/// Everything a sink needs to mirror one inspection.
#[derive(Debug, Clone)]
pub struct InspectionDocument {
    pub product_name: String,
    pub inspector: String,
    pub notes: String,
    pub photos: InspectionPhotos,
    pub timestamp: DateTime<Utc>,
}

/// Body of `inspection-data.json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentMetadata<'a> {
    product_name: &'a str,
    inspector: &'a str,
    notes: &'a str,
    timestamp: String,
}

impl InspectionDocument {
    /// Builds the document from a validated submission.
    pub fn from_submission(submission: NewInspection, timestamp: DateTime<Utc>) -> Self {
        InspectionDocument {
            product_name: submission.product_name.trim().to_string(),
            inspector: submission.inspector.trim().to_string(),
            notes: submission.notes.unwrap_or_default(),
            photos: submission.photos,
            timestamp,
        }
    }

    /// `<productName>_<timestamp>` with the name made safe for a folder.
    pub fn folder_name(&self) -> String {
        format!(
            "{}_{}",
            sanitize_name(&self.product_name),
            folder_timestamp(&self.timestamp)
        )
    }

    /// Pretty-printed `inspection-data.json`.
    pub fn metadata_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let metadata = DocumentMetadata {
            product_name: &self.product_name,
            inspector: &self.inspector,
            notes: &self.notes,
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        serde_json::to_vec_pretty(&metadata)
    }
}

/// RFC 3339 in UTC with `:` and `.` replaced by `-`.
pub fn folder_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

// =============================================================================
// Sink Trait
// =============================================================================

/// Destination for mirrored inspections.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Writes the metadata file and every decodable photo.
    ///
    /// Fails only when the folder or the metadata file cannot be written.
    /// Individual photos that fail are logged and left out of the receipt.
    async fn store(&self, document: &InspectionDocument) -> Result<MirrorReceipt, SinkError>;
}

/// Sink used when mirroring is turned off.
pub struct NoopSink;

#[async_trait]
impl DocumentSink for NoopSink {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn store(&self, _document: &InspectionDocument) -> Result<MirrorReceipt, SinkError> {
        Err(SinkError::Disabled)
    }
}

/// Builds the sink selected by `MIRROR`.
pub fn build_sink(config: &ApiConfig) -> Result<Arc<dyn DocumentSink>, SinkError> {
    let sink: Arc<dyn DocumentSink> = match config.mirror {
        MirrorMode::None => Arc::new(NoopSink),
        MirrorMode::SharePoint => {
            Arc::new(SharePointSink::new(SharePointConfig::from_api_config(config)?)?)
        }
        MirrorMode::Local => Arc::new(LocalFolderSink::new(
            config.data_storage_path.join(&config.data_folder_path),
        )),
    };

    tracing::info!(sink = sink.name(), "Document sink ready");
    Ok(sink)
}
