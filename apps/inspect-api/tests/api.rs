//! End-to-end tests against the router with an in-memory database and a
//! local-folder mirror in a temp directory.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use inspect_api::sink::LocalFolderSink;
use inspect_api::{router, ApiConfig, AppState, JwtManager};
use inspect_db::{Database, DbConfig};

const CANONICAL_SCAN: &str = "[)>\u{1E}06\u{1D}VSBH4\u{1D}P91958CU810PD\u{1D}SHB81\u{1D}EJW124052\u{1D}T241017KKH1@OX15901W\u{1D}C020100007000000A2\u{1D}\u{1E}\u{04}";

struct TestApp {
    app: Router,
    mirror_root: PathBuf,
    _dir: TempDir,
}

async fn setup() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mirror_root = dir.path().join("InspectionData");

    let state = Arc::new(AppState::new(
        db,
        JwtManager::new("test-secret", 3600),
        Arc::new(LocalFolderSink::new(mirror_root.clone())),
    ));

    TestApp {
        app: router(state, &ApiConfig::default()),
        mirror_root,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(&self, email: &str, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "username": username, "password": "hunter2hunter2" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_register_login_me_logout() {
    let app = setup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "kim@example.com",
                "username": "kim",
                "password": "hunter2hunter2",
                "name": "Kim Inspector"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "kim@example.com");
    assert_eq!(body["user"]["name"], "Kim Inspector");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "kim@example.com", "password": "hunter2hunter2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "kim");

    let (status, body) = app.send(Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_duplicate_registration() {
    let app = setup().await;
    app.register("kim@example.com", "kim").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "other@example.com", "username": "kim", "password": "hunter2hunter2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "ACCOUNT_EXISTS");
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "username": "kim", "password": "hunter2hunter2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "kim@example.com", "username": "kim", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = setup().await;
    app.register("kim@example.com", "kim").await;

    let (status, wrong_password) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "kim@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["code"], "INVALID_CREDENTIALS");

    let (status, unknown_email) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "hunter2hunter2" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_email["error"]);
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = setup().await;

    let (status, body) = app.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_REQUIRED");

    let (status, body) = app
        .send(Method::GET, "/api/auth/me", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "INVALID_TOKEN");

    let foreign = JwtManager::new("some-other-secret", 3600)
        .generate_token("user-1", "kim@example.com")
        .unwrap();
    let (status, _) = app
        .send(Method::GET, "/api/inspection/history", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_for_deleted_user() {
    let app = setup().await;
    let token = JwtManager::new("test-secret", 3600)
        .generate_token("missing-user", "ghost@example.com")
        .unwrap();

    let (status, body) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Scan
// =============================================================================

#[tokio::test]
async fn test_scan_data_matrix() {
    let app = setup().await;
    let (status, body) = app
        .send(Method::POST, "/api/scan", None, Some(json!({ "raw": CANONICAL_SCAN })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productName"], "91958CU810JW007");
    assert_eq!(body["symbology"], "dataMatrix");
}

#[tokio::test]
async fn test_scan_label() {
    let app = setup().await;
    let (status, body) = app
        .send(Method::POST, "/api/scan", None, Some(json!({ "raw": "91958-PI010" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productName"], "91958PI010");
    assert_eq!(body["symbology"], "label");
}

#[tokio::test]
async fn test_scan_no_match() {
    let app = setup().await;

    for raw in ["hello world", ""] {
        let (status, body) = app
            .send(Method::POST, "/api/scan", None, Some(json!({ "raw": raw })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "NO_MATCH");
    }
}

// =============================================================================
// Inspections
// =============================================================================

#[tokio::test]
async fn test_create_inspection_mirrors_to_folder() {
    let app = setup().await;
    let token = app.register("kim@example.com", "kim").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/inspection",
            Some(&token),
            Some(json!({
                "productName": "91958CU810JW007",
                "inspector": "Kim",
                "notes": "Scratch on the back panel",
                "photos": {
                    "front": "data:image/jpeg;base64,aGVsbG8=",
                    "back": "d29ybGQ="
                }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["productName"], "91958CU810JW007");
    assert!(body["data"]["id"].is_string());

    let receipt = &body["data"]["sharePoint"];
    let folder = PathBuf::from(receipt["folderPath"].as_str().unwrap());
    assert!(folder.starts_with(&app.mirror_root));
    assert_eq!(receipt["jsonFile"], "inspection-data.json");
    assert!(folder.join("inspection-data.json").exists());
    assert_eq!(std::fs::read(folder.join("정면.jpg")).unwrap(), b"hello");
    assert_eq!(std::fs::read(folder.join("후면.jpg")).unwrap(), b"world");
    assert!(receipt["photos"].get("left").is_none());
}

#[tokio::test]
async fn test_create_inspection_requires_auth() {
    let app = setup().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/inspection",
            None,
            Some(json!({ "productName": "PY24672", "inspector": "Kim" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_inspection_validation() {
    let app = setup().await;
    let token = app.register("kim@example.com", "kim").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/inspection",
            Some(&token),
            Some(json!({ "productName": "   ", "inspector": "Kim" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/inspection",
            Some(&token),
            Some(json!({ "productName": "PY24672" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = setup().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/scan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_is_scoped_and_newest_first() {
    let app = setup().await;
    let kim = app.register("kim@example.com", "kim").await;
    let lee = app.register("lee@example.com", "lee").await;

    for product in ["FIRST01", "SECOND02"] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/inspection",
                Some(&kim),
                Some(json!({ "productName": product, "inspector": "Kim" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .send(Method::GET, "/api/inspection/history", Some(&kim), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["productName"], "SECOND02");
    assert_eq!(items[1]["productName"], "FIRST01");
    assert!(items[0].get("photos").is_none());

    let (_, body) = app
        .send(Method::GET, "/api/inspection/history", Some(&lee), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
