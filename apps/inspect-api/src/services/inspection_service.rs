//! Inspection handlers.
//!
//! ```text
//! POST /api/inspection
//!     │
//!     ├── validate ──────────► 400 on bad input
//!     ├── INSERT (SQLite) ───► committed, id assigned
//!     └── DocumentSink.store ─► receipt, or null when the mirror failed
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use inspect_core::validation::{validate_inspector, validate_notes, validate_product_name};
use inspect_core::{InspectionSummary, MirrorReceipt, NewInspection};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::sink::{InspectionDocument, SinkError};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInspection {
    pub id: String,
    pub product_name: String,
    pub inspector: String,
    pub created_at: DateTime<Utc>,
    /// Where the mirror put the documents. `null` when mirroring is off or failed.
    pub share_point: Option<MirrorReceipt>,
}

#[derive(Debug, Serialize)]
pub struct CreateInspectionResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: SavedInspection,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<InspectionSummary>,
}

/// `POST /api/inspection`
pub async fn create_inspection(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    payload: Result<Json<NewInspection>, JsonRejection>,
) -> ApiResult<Json<CreateInspectionResponse>> {
    let Json(submission) = payload?;

    validate_product_name(&submission.product_name)?;
    validate_inspector(&submission.inspector)?;
    if let Some(notes) = &submission.notes {
        validate_notes(notes)?;
    }

    let inspection = state.db.inspections().create(&auth.id, &submission).await?;
    info!(
        id = %inspection.id,
        product_name = %inspection.product_name,
        photos = submission.photos.count(),
        "Inspection stored"
    );

    let document = InspectionDocument::from_submission(submission, inspection.created_at);
    let share_point = match state.sink.store(&document).await {
        Ok(receipt) => Some(receipt),
        Err(SinkError::Disabled) => {
            debug!("Mirroring disabled");
            None
        }
        Err(e) => {
            warn!(id = %inspection.id, sink = state.sink.name(), "Mirror failed: {}", e);
            None
        }
    };

    Ok(Json(CreateInspectionResponse {
        success: true,
        message: "Inspection saved",
        data: SavedInspection {
            id: inspection.id,
            product_name: inspection.product_name,
            inspector: inspection.inspector,
            created_at: inspection.created_at,
            share_point,
        },
    }))
}

/// `GET /api/inspection/history`
pub async fn history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<HistoryResponse>> {
    let data = state.db.inspections().list_for_user(&auth.id).await?;

    Ok(Json(HistoryResponse {
        success: true,
        data,
    }))
}
