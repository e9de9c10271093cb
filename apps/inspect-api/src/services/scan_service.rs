//! Scan decoding.
//!
//! The web client sends whatever text the camera decoded; this turns it into
//! a product name or tells the operator to try again.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use inspect_core::validation::validate_scan_payload;
use inspect_core::{diagnose_product_code, CoreError, Symbology};

use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    pub product_name: String,
    pub symbology: Symbology,
}

/// `POST /api/scan`
pub async fn scan(payload: Result<Json<ScanRequest>, JsonRejection>) -> ApiResult<Json<ScanResponse>> {
    let Json(req) = payload?;
    validate_scan_payload(&req.raw)?;

    match diagnose_product_code(&req.raw) {
        Ok(code) => {
            debug!(product_name = code.as_str(), symbology = ?code.symbology(), "Scan decoded");
            Ok(Json(ScanResponse {
                success: true,
                symbology: code.symbology(),
                product_name: code.into_string(),
            }))
        }
        Err(reason) => {
            debug!(%reason, "Scan not recognized");
            Err(CoreError::UnrecognizedScan.into())
        }
    }
}
