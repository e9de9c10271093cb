//! # Inspect API
//!
//! HTTP server behind the inspection capture web client.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Inspect API Services                            │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth_service  │  │  scan_service  │  │  inspection_service        ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • scan         │  │ • create_inspection        ││
//! │  │ • login        │  │   (product     │  │   (store, then mirror)     ││
//! │  │ • me / logout  │  │    code parse) │  │ • history                  ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐                                                    │
//! │  │ health_service │                                                    │
//! │  └────────────────┘                                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  SQLite      │  │  JWT Auth    │  │  DocumentSink            ││  │
//! │  │  │  (inspect-db)│  │  HS256       │  │  SharePoint / local /    ││  │
//! │  │  │              │  │  bearer      │  │  disabled                ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `inspect.toml`):
//! - `PORT` - HTTP port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: ./data/inspect.db)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_EXPIRY_SECS` - Token lifetime (default: 604800)
//! - `CORS_ORIGINS` - Comma-separated origins, empty for any
//! - `BODY_LIMIT_BYTES` - Request body cap (default: 50MB)
//! - `MIRROR` - `none`, `sharepoint` or `local`

pub mod auth;
pub mod config;
pub mod error;
pub mod services;
pub mod sink;
pub mod store;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use inspect_db::Database;

// Re-exports
pub use auth::{AuthUser, JwtManager};
pub use config::{ApiConfig, MirrorMode};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use sink::{build_sink, DocumentSink};
pub use store::{SqliteUserStore, UserStore};

use crate::services::{auth_service, health_service, inspection_service, scan_service};

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtManager,
    pub sink: Arc<dyn DocumentSink>,
}

impl AppState {
    /// State backed by `db`, with the SQLite user store.
    pub fn new(db: Database, jwt: JwtManager, sink: Arc<dyn DocumentSink>) -> Self {
        AppState {
            users: Arc::new(SqliteUserStore::new(db.clone())),
            db,
            jwt,
            sink,
        }
    }
}

/// Builds the router with CORS, body limit and request tracing.
pub fn router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    Router::new()
        .route("/api/health", get(health_service::health))
        .route("/api/auth/register", post(auth_service::register))
        .route("/api/auth/login", post(auth_service::login))
        .route("/api/auth/me", get(auth_service::me))
        .route("/api/auth/logout", post(auth_service::logout))
        .route("/api/scan", post(scan_service::scan))
        .route("/api/inspection", post(inspection_service::create_inspection))
        .route("/api/inspection/history", get(inspection_service::history))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors_layer(&config.allowed_origins()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
