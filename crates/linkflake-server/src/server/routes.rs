//! HTTP routes.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/shorten` | Shorten `{"url": ...}`, `201` with the mapping |
//! | GET | `/{code}` | `302` redirect to the original URL |
//! | GET | `/info/{code}` | The mapping as JSON |
//! | GET | `/health` | Liveness probe |

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use linkflake_core::Mapping;
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::server::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten))
        .route("/health", get(health))
        .route("/info/{code}", get(info))
        .route("/{code}", get(redirect))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// POST /shorten
async fn shorten(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Mapping>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let mapping = state.shortener.shorten_url(&request.url).await?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

/// GET /{code}
async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mapping = state.shortener.get_original_url(&code).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, mapping.original_url)]))
}

/// GET /info/{code}
async fn info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Mapping>, ApiError> {
    Ok(Json(state.shortener.get_original_url(&code).await?))
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response},
    };
    use linkflake_core::{
        MemoryStore, Shortener,
        linkflake::{LockIdentifierClock, NodeIdentity, SystemClock, TWITTER_EPOCH},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::server::state::{DynGenerator, DynStore};

    fn app() -> Router {
        let generator: DynGenerator = Box::new(LockIdentifierClock::new(
            NodeIdentity::new(1, 1).unwrap(),
            TWITTER_EPOCH,
            SystemClock,
        ));
        let store: DynStore = Arc::new(MemoryStore::new());
        router(AppState::new(Shortener::new(generator, store)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json(resp: Response<Body>) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn shorten_ok(router: &Router, url: &str) -> Value {
        let body = serde_json::json!({ "url": url }).to_string();
        let resp = router.clone().oneshot(post_json(&body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        json(resp).await
    }

    fn assert_error_body(body: &Value, status: u16, reason: &str) {
        assert_eq!(body["status"], status);
        assert_eq!(body["error"], reason);
        assert!(body["message"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn shorten_returns_created_mapping() {
        let router = app();
        let body = shorten_ok(&router, "https://example.com/a").await;

        assert_eq!(body["originalUrl"], "https://example.com/a");
        assert_eq!(body["shortCode"].as_str().unwrap().len(), 11);
        assert!(body["id"].is_i64());
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn shorten_is_idempotent() {
        let router = app();
        let first = shorten_ok(&router, "https://example.com/a").await;
        let second = shorten_ok(&router, "https://example.com/a").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn shorten_rejects_invalid_url() {
        let router = app();
        for body in [
            r#"{"url": "ftp://example.com"}"#,
            r#"{"url": "example.com"}"#,
            r#"{"url": "   "}"#,
            r#"{"url": "https://example.com/café"}"#,
            r#"{"url": "https://example.com/%zz"}"#,
            r#"{}"#,
            r#"{"url": 42}"#,
            "not json",
        ] {
            let resp = router.clone().oneshot(post_json(body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_error_body(&json(resp).await, 400, "Bad Request");
        }
    }

    #[tokio::test]
    async fn invalid_url_message_is_reported() {
        let resp = app()
            .oneshot(post_json(r#"{"url": "ftp://example.com"}"#))
            .await
            .unwrap();
        let body = json(resp).await;
        assert_eq!(body["message"], "only http and https are supported");
    }

    #[tokio::test]
    async fn redirect_points_to_original() {
        let router = app();
        let created = shorten_ok(&router, "https://example.com/target?q=1").await;
        let code = created["shortCode"].as_str().unwrap();

        let resp = router.oneshot(get(&format!("/{code}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers()[header::LOCATION],
            "https://example.com/target?q=1"
        );
    }

    #[tokio::test]
    async fn info_returns_mapping() {
        let router = app();
        let created = shorten_ok(&router, "https://example.com/info").await;
        let code = created["shortCode"].as_str().unwrap();

        let resp = router.oneshot(get(&format!("/info/{code}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json(resp).await, created);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let router = app();
        for uri in ["/unknown-code", "/info/unknown-code"] {
            let resp = router.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = json(resp).await;
            assert_error_body(&body, 404, "Not Found");
            assert_eq!(body["message"], "Short code not found: unknown-code");
        }
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
