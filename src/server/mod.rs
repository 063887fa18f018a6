//! HTTP server exposing the document analysis endpoint.
//!
//! Each request is independent: the server keeps no state between requests
//! beyond the shared, immutable completion provider.

mod handlers;
mod routes;

pub use routes::{create_router, validate_endpoint_path, DEFAULT_ENDPOINT_PATH, HEALTH_PATH};

use std::net::SocketAddr;

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::llm::provider_from_config;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(&config.llm)?;
        Ok(Self {
            analysis: AnalysisService::new(provider, &config.llm),
        })
    }
}

/// Start the web server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    validate_endpoint_path(&config.server.endpoint_path)?;
    let state = AppState::new(config)?;
    tracing::info!(
        "Using {} completion provider",
        state.analysis.provider_name()
    );
    let app = create_router(state, &config.server.endpoint_path);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!(
        "Starting server at http://{}{}",
        addr,
        config.server.endpoint_path
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::llm::{LlmConfig, SimulatedProvider};
    use crate::models::AnalysisResult;

    fn setup_test_app() -> axum::Router {
        let config = LlmConfig::base_default();
        let state = AppState {
            analysis: AnalysisService::new(Arc::new(SimulatedProvider::default()), &config),
        };
        create_router(state, DEFAULT_ENDPOINT_PATH)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze-document")
            .header("content-type", "application/json")
            .header("origin", "http://localhost:8080")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let app = setup_test_app();

        let response = app
            .oneshot(post_json(r#"{"documentContent":"Smith v. Jones supply contract"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        let json = body_json(response).await;
        let result: AnalysisResult = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(result, AnalysisResult::sample());
        assert_eq!(json["risks"]["title"], "Risk Assessment & Leverage Points");
    }

    #[tokio::test]
    async fn test_analyze_missing_content() {
        let app = setup_test_app();

        let response = app.oneshot(post_json(r#"{}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Document content is required");
    }

    #[tokio::test]
    async fn test_analyze_non_string_content() {
        let app = setup_test_app();

        let response = app
            .oneshot(post_json(r#"{"documentContent":["a","b"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Document content must be a string");
    }

    #[tokio::test]
    async fn test_analyze_malformed_json() {
        let app = setup_test_app();

        let response = app.oneshot(post_json("{documentContent")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Request body is not valid JSON"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/analyze-document")
                    .header("origin", "http://localhost:8080")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "apikey, content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let allowed = headers["access-control-allow-headers"].to_str().unwrap();
        for name in ["authorization", "x-client-info", "apikey", "content-type"] {
            assert!(allowed.contains(name), "missing {}", name);
        }
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_plain_options() {
        let app = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/analyze-document")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_validate_endpoint_path() {
        assert!(validate_endpoint_path("/analyze-document").is_ok());
        assert!(validate_endpoint_path("/functions/v1/analyze-document").is_ok());

        let err = validate_endpoint_path("analyze-document").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
        let err = validate_endpoint_path("").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));

        let err = validate_endpoint_path("/health").unwrap_err();
        assert!(err.to_string().contains("conflicts"));
    }

    #[tokio::test]
    async fn test_serve_rejects_bad_endpoint_path() {
        for path in ["analyze-document", "/health"] {
            let mut config = Config::default();
            config.server.endpoint_path = path.to_string();
            config.llm = LlmConfig::base_default();

            let result = tokio::time::timeout(
                std::time::Duration::from_secs(5),
                serve(&config, "127.0.0.1", 0),
            )
            .await
            .expect("serve returns before binding");
            assert!(result.is_err(), "accepted {}", path);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "simulated");
    }
}
