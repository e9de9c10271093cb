//! # SharePoint Sink
//!
//! Mirrors inspections into a SharePoint document library through Microsoft
//! Graph, authenticating as the application (client credentials).
//!
//! ## Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SharePoint Mirror Flow                          │
//! │                                                                         │
//! │  ┌──────────────┐     ┌──────────────────┐     ┌──────────────────┐    │
//! │  │ inspect-api  │     │ login.microsoft  │     │ graph.microsoft  │    │
//! │  └──────┬───────┘     └────────┬─────────┘     └────────┬─────────┘    │
//! │         │  1. client creds     │                        │              │
//! │         │─────────────────────►│                        │              │
//! │         │  access_token        │                        │              │
//! │         │◄─────────────────────│                        │              │
//! │         │                                               │              │
//! │         │  2. GET root:/<segment> (404 → POST children) │              │
//! │         │──────────────────────────────────────────────►│              │
//! │         │  3. PUT inspection-data.json                  │              │
//! │         │──────────────────────────────────────────────►│              │
//! │         │  4. PUT <label>.jpg (each present photo)      │              │
//! │         │──────────────────────────────────────────────►│              │
//! │         │  webUrl for each file                         │              │
//! │         │◄──────────────────────────────────────────────│              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Storage
//! The token lives in memory and is refreshed 5 minutes before it expires.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use inspect_core::{decode_photo, MirrorReceipt, INSPECTION_JSON_FILE};

use super::{DocumentSink, InspectionDocument, SinkError};
use crate::config::ApiConfig;

/// Margin before token expiration to trigger refresh (5 minutes)
const REFRESH_MARGIN_SECS: u64 = 300;

const LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";
const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Azure app registration plus the target drive.
#[derive(Debug, Clone)]
pub struct SharePointConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub site_id: String,
    pub drive_id: String,
    /// Base folder inside the drive, e.g. `InspectionData`
    pub base_folder: String,
}

impl SharePointConfig {
    pub fn from_api_config(config: &ApiConfig) -> Result<Self, SinkError> {
        fn required(key: &str, value: &Option<String>) -> Result<String, SinkError> {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| SinkError::Config(format!("{} is not set", key)))
        }

        Ok(SharePointConfig {
            client_id: required("AZURE_CLIENT_ID", &config.azure_client_id)?,
            client_secret: required("AZURE_CLIENT_SECRET", &config.azure_client_secret)?,
            tenant_id: required("AZURE_TENANT_ID", &config.azure_tenant_id)?,
            site_id: required("SHAREPOINT_SITE_ID", &config.sharepoint_site_id)?,
            drive_id: required("SHAREPOINT_DRIVE_ID", &config.sharepoint_drive_id)?,
            base_folder: config.sharepoint_folder_path.trim_matches('/').to_string(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", LOGIN_BASE_URL, self.tenant_id)
    }

    fn drive_url(&self) -> String {
        format!(
            "{}/sites/{}/drives/{}",
            GRAPH_BASE_URL, self.site_id, self.drive_id
        )
    }

    /// Drive item addressed by path.
    fn item_url(&self, path: &str) -> String {
        format!("{}/root:/{}", self.drive_url(), path)
    }

    /// Children collection of `parent`, or of the drive root.
    fn children_url(&self, parent: &str) -> String {
        if parent.is_empty() {
            format!("{}/root/children", self.drive_url())
        } else {
            format!("{}/root:/{}:/children", self.drive_url(), parent)
        }
    }

    fn content_url(&self, folder: &str, file_name: &str) -> String {
        format!("{}/root:/{}/{}:/content", self.drive_url(), folder, file_name)
    }
}

// =============================================================================
// Token Cache
// =============================================================================

/// App-only Graph token.
#[derive(Debug, Clone)]
pub struct GraphToken {
    pub access_token: String,
    /// When the access token expires (local time)
    pub expires_at: Instant,
}

impl GraphToken {
    /// Check if the token is expired or about to expire
    pub fn needs_refresh(&self) -> bool {
        Instant::now() + Duration::from_secs(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    /// Get remaining valid time
    pub fn remaining_secs(&self) -> u64 {
        self.expires_at
            .saturating_duration_since(Instant::now())
            .as_secs()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveItem {
    web_url: String,
}

// =============================================================================
// Sink
// =============================================================================

pub struct SharePointSink {
    config: SharePointConfig,
    http: reqwest::Client,
    token: RwLock<Option<GraphToken>>,
}

impl SharePointSink {
    pub fn new(config: SharePointConfig) -> Result<Self, SinkError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(SharePointSink {
            config,
            http,
            token: RwLock::new(None),
        })
    }

    /// Returns a valid access token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String, SinkError> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.needs_refresh() {
                    debug!(remaining_secs = token.remaining_secs(), "Using cached Graph token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut guard = self.token.write().await;

        // Double-check after acquiring write lock
        if let Some(token) = guard.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        info!(expires_in_secs = token.remaining_secs(), "Acquired Graph token");
        let access_token = token.access_token.clone();
        *guard = Some(token);

        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<GraphToken, SinkError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(self.config.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| SinkError::Auth(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Auth(format!("Token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SinkError::Auth(format!("Malformed token response: {}", e)))?;

        Ok(GraphToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    /// Creates every missing segment of `path`. Failures are logged only;
    /// the upload that follows reports the real problem if there is one.
    async fn ensure_folder(&self, token: &str, path: &str) {
        let mut parent = String::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let current = if parent.is_empty() {
                segment.to_string()
            } else {
                format!("{}/{}", parent, segment)
            };

            if let Err(e) = self.ensure_segment(token, &parent, segment, &current).await {
                warn!(folder = %current, "Could not ensure folder: {}", e);
            }
            parent = current;
        }
    }

    async fn ensure_segment(
        &self,
        token: &str,
        parent: &str,
        name: &str,
        path: &str,
    ) -> Result<(), SinkError> {
        let response = self
            .http
            .get(self.config.item_url(path))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(folder = %path, "Creating folder");
                self.http
                    .post(self.config.children_url(parent))
                    .bearer_auth(token)
                    .json(&json!({
                        "name": name,
                        "folder": {},
                        "@microsoft.graph.conflictBehavior": "rename",
                    }))
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(())
            }
            status => Err(SinkError::Http(format!("Folder lookup returned {}", status))),
        }
    }

    async fn upload(
        &self,
        token: &str,
        folder: &str,
        file_name: &str,
        content_type: &'static str,
        bytes: Vec<u8>,
    ) -> Result<String, SinkError> {
        let item: DriveItem = self
            .http
            .put(self.config.content_url(folder, file_name))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(item.web_url)
    }
}

#[async_trait]
impl DocumentSink for SharePointSink {
    fn name(&self) -> &'static str {
        "sharepoint"
    }

    async fn store(&self, document: &InspectionDocument) -> Result<MirrorReceipt, SinkError> {
        let token = self.access_token().await?;

        let folder = if self.config.base_folder.is_empty() {
            document.folder_name()
        } else {
            format!("{}/{}", self.config.base_folder, document.folder_name())
        };
        self.ensure_folder(&token, &folder).await;

        self.upload(
            &token,
            &folder,
            INSPECTION_JSON_FILE,
            "application/json",
            document.metadata_json()?,
        )
        .await?;

        let mut photos = BTreeMap::new();
        for (direction, payload) in document.photos.iter() {
            let bytes = match decode_photo(payload) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(direction = direction.key(), "Skipping photo: {}", e);
                    continue;
                }
            };

            match self
                .upload(&token, &folder, direction.file_name(), "image/jpeg", bytes)
                .await
            {
                Ok(url) => {
                    photos.insert(direction.key().to_string(), url);
                }
                Err(e) => warn!(direction = direction.key(), "Photo upload failed: {}", e),
            }
        }

        info!(folder = %folder, photos = photos.len(), "Mirrored inspection to SharePoint");

        Ok(MirrorReceipt {
            folder_path: folder,
            json_file: INSPECTION_JSON_FILE.to_string(),
            photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SharePointConfig {
        SharePointConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            tenant_id: "tenant".to_string(),
            site_id: "site".to_string(),
            drive_id: "drive".to_string(),
            base_folder: "InspectionData".to_string(),
        }
    }

    #[test]
    fn test_token_refresh_margin() {
        let fresh = GraphToken {
            access_token: "a".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3600),
        };
        assert!(!fresh.needs_refresh());

        let expiring = GraphToken {
            access_token: "a".to_string(),
            expires_at: Instant::now() + Duration::from_secs(120),
        };
        assert!(expiring.needs_refresh());
    }

    #[test]
    fn test_graph_urls() {
        let config = config();
        assert_eq!(
            config.token_url(),
            "https://login.microsoftonline.com/tenant/oauth2/v2.0/token"
        );
        assert_eq!(
            config.item_url("InspectionData/X_1"),
            "https://graph.microsoft.com/v1.0/sites/site/drives/drive/root:/InspectionData/X_1"
        );
        assert_eq!(
            config.children_url(""),
            "https://graph.microsoft.com/v1.0/sites/site/drives/drive/root/children"
        );
        assert_eq!(
            config.children_url("InspectionData"),
            "https://graph.microsoft.com/v1.0/sites/site/drives/drive/root:/InspectionData:/children"
        );
        assert_eq!(
            config.content_url("InspectionData/X_1", "front.jpg"),
            "https://graph.microsoft.com/v1.0/sites/site/drives/drive/root:/InspectionData/X_1/front.jpg:/content"
        );
    }

    #[test]
    fn test_config_from_api_config() {
        let api = ApiConfig {
            azure_client_id: Some("client".to_string()),
            azure_client_secret: Some("secret".to_string()),
            azure_tenant_id: Some("tenant".to_string()),
            sharepoint_site_id: Some("site".to_string()),
            sharepoint_drive_id: Some("drive".to_string()),
            sharepoint_folder_path: "/Quality/Inspections/".to_string(),
            ..ApiConfig::default()
        };
        let config = SharePointConfig::from_api_config(&api).unwrap();
        assert_eq!(config.base_folder, "Quality/Inspections");

        let missing = ApiConfig {
            azure_tenant_id: None,
            ..api
        };
        assert!(matches!(
            SharePointConfig::from_api_config(&missing),
            Err(SinkError::Config(msg)) if msg.contains("AZURE_TENANT_ID")
        ));
    }
}
