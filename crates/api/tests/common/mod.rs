//! Shared harness for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` (same middleware stack) but
//! swaps the HTTP translator for an instant in-process stub.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use maistor_api::auth::jwt::{generate_access_token, JwtConfig};
use maistor_api::background::translation::{
    spawn_translation_worker, TranslationError, TranslationJob, Translator,
};
use maistor_api::config::ServerConfig;
use maistor_api::router::build_app_router;
use maistor_api::state::AppState;
use maistor_db::models::task::TranslatedContent;

/// Stable secret for test tokens.
const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-entropy";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        translator_url: "http://localhost:8090/translate".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Instant translator stub: prefixes every field with `[bg]`.
struct StubTranslator;

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        job: &TranslationJob,
    ) -> Result<TranslatedContent, TranslationError> {
        Ok(TranslatedContent {
            title: Some(format!("[bg] {}", job.title)),
            description: Some(format!("[bg] {}", job.description)),
            requirements: job.requirements.as_ref().map(|r| format!("[bg] {r}")),
            location_notes: job.location_notes.as_ref().map(|n| format!("[bg] {n}")),
        })
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and an in-process translation worker.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let cancel = tokio_util::sync::CancellationToken::new();
    let (translations, _handle) =
        spawn_translation_worker(pool.clone(), Arc::new(StubTranslator), cancel);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        translations,
    };

    build_app_router(state, &config)
}

/// Mint a bearer token for the given user id with the test secret.
pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}
