use std::sync::Arc;

use axum::{Json, body::Bytes, extract::Query, extract::State};
use registry::LicenseRecord;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::AppError,
    state::AppState,
    verify::{self, VerificationResult},
};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub struct LookupParams {
    number: String,
}

/// `POST /verify` — the verification proxy. The body is taken as raw
/// bytes and parsed leniently so every rejection, non-UTF-8 included,
/// carries our own error shape rather than the framework's.
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<VerificationResult>, AppError> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let query = require_query(&payload)?;

    let api_key = verify::api_key()?;
    let result = verify::lookup_license(&state.http, &state.config, &api_key, query).await?;

    Ok(Json(result))
}

/// Any method other than POST on `/verify`.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// `GET /search?q=` — substring search over the cached registry.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<LicenseRecord>> {
    Json(state.cache.search(&params.q).await)
}

/// `GET /lookup?number=` — exact license-number lookup, `null` on a miss.
pub async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> Json<Option<LicenseRecord>> {
    Json(state.cache.lookup(&params.number).await)
}

fn require_query(payload: &Value) -> Result<&str, AppError> {
    payload
        .get("query")
        .and_then(Value::as_str)
        .ok_or(AppError::MissingQuery)
}

#[cfg(test)]
mod tests {
    use std::env;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        response::Response,
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{
        cache::{HttpRegistry, LicenseCache},
        config::Config,
        verify::{API_KEY_VAR, ENV_LOCK},
    };

    use super::*;

    // nothing listens on port 9, so any upstream attempt fails fast with
    // the generic unavailable error instead of hanging
    fn test_state() -> Arc<AppState> {
        let http = reqwest::Client::new();
        let config = Config {
            port: 0,
            registry_url: "http://127.0.0.1:9/registry".to_string(),
            model_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
        };
        let cache = LicenseCache::new(HttpRegistry::new(
            http.clone(),
            config.registry_url.clone(),
        ));

        Arc::new(AppState {
            config,
            http,
            cache,
        })
    }

    fn app() -> Router {
        Router::new()
            .route("/verify", post(verify_handler).fallback(method_not_allowed))
            .with_state(test_state())
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_non_post_verify_rejected() {
        for method in ["GET", "PUT", "DELETE"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/verify")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                body_bytes(response).await,
                br#"{"error":"Method not allowed"}"#
            );
        }
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits_upstream() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var(API_KEY_VAR);

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify")
                    .body(Body::from(r#"{"query": "OCM-001"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        // an upstream attempt would surface the unavailable message instead
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_bytes(response).await,
            br#"{"error":"API key not configured"}"#
        );
    }

    #[tokio::test]
    async fn test_non_utf8_body_rejected_with_error_shape() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify")
                    .body(Body::from(vec![0x9f, 0x92, 0x96]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_bytes(response).await,
            br#"{"error":"Query parameter is required"}"#
        );
    }

    #[test]
    fn test_require_query_present() {
        let payload = json!({ "query": "OCM-001" });

        assert_eq!(require_query(&payload), Ok("OCM-001"));
    }

    #[test]
    fn test_require_query_missing() {
        assert_eq!(require_query(&json!({})), Err(AppError::MissingQuery));
        assert_eq!(require_query(&Value::Null), Err(AppError::MissingQuery));
    }

    #[test]
    fn test_require_query_non_string() {
        let payload = json!({ "query": 42 });

        assert_eq!(require_query(&payload), Err(AppError::MissingQuery));
    }
}
