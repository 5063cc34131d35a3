//! HTTP and interactive front ends for the parley relay.
//!
//! Both front ends drive the same [`Relay`]:
//!
//! - [`router`] — Axum routes: `GET /test`, `GET /chat?message=`, `GET /`
//! - [`repl::run`] — Line-at-a-time loop used by the `parley-cli` binary
//! - [`connect`] — Builds the relay from startup [`Settings`]

mod assets;
mod dto;
mod error;
mod handlers;
pub mod repl;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get;
use axum::Router;
use parley_config::Settings;
use parley_engine::Relay;
use parley_llm::{ModelClient, OpenAiCompatClient};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub use error::AppError;

/// Shared server state accessible from all handlers.
pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self { relay }
    }
}

/// Builds the relay described by `settings`.
///
/// When credential verification is enabled, the upstream is probed once and
/// a rejected credential aborts startup.
pub async fn connect(settings: &Settings) -> Result<Relay> {
    let client = OpenAiCompatClient::new(&settings.api_key, &settings.api_base, &settings.model);

    if settings.verify_credential {
        client
            .verify()
            .await
            .with_context(|| format!("credential check against {} failed", settings.api_base))?;
        info!("Credential verified against {}", settings.api_base);
    }

    info!(
        "Persona '{}' bound to model {} at {}",
        settings.persona.name, settings.model, settings.api_base
    );

    Ok(Relay::new(Arc::new(client), Arc::new(settings.persona.clone())))
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/chat", get(handlers::chat::chat))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/test", get(handlers::health))
        .route("/", get(assets::index))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{relay_with, MockClient};
    use axum::http::{header, StatusCode};
    use parley_core::RelayError;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(client: Arc<MockClient>) -> Router {
        router(Arc::new(AppState::new(relay_with(client))))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_endpoint_reports_working() {
        let client = MockClient::replying("unused");
        let (status, body) = get_json(app(client.clone()), "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "working");
        assert_eq!(body["message"], "Tester is running!");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_relays_message() {
        let client = MockClient::replying("Hi there");
        let (status, body) = get_json(app(client.clone()), "/chat?message=Hello").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Hello", "response": "Hi there"}));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn chat_decodes_url_encoded_message() {
        let client = MockClient::replying("ok");
        let (_, body) = get_json(app(client.clone()), "/chat?message=Who%20is%20Abid%3F").await;

        assert_eq!(body["message"], "Who is Abid?");
        assert_eq!(client.queries(), ["Who is Abid?"]);
    }

    #[tokio::test]
    async fn chat_without_message_is_bad_request() {
        let client = MockClient::replying("unused");
        let (status, body) = get_json(app(client.clone()), "/chat").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("message"));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_with_empty_message_is_bad_request() {
        let client = MockClient::replying("unused");
        let (status, _) = get_json(app(client.clone()), "/chat?message=").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_with_repeated_message_is_json_bad_request() {
        let client = MockClient::replying("unused");
        let (status, body) = get_json(app(client.clone()), "/chat?message=a&message=b").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let client = MockClient::failing(RelayError::Upstream("connection refused".into()));
        let (status, body) = get_json(app(client), "/chat?message=Hello").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn auth_failure_is_bad_gateway() {
        let client = MockClient::failing(RelayError::Auth("API key not valid".into()));
        let (status, body) = get_json(app(client), "/chat?message=Hello").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("credential"));
    }

    #[tokio::test]
    async fn server_keeps_serving_after_failure() {
        let client = MockClient::failing(RelayError::Upstream("boom".into()));
        let app = app(client.clone());

        let (first, _) = get_json(app.clone(), "/chat?message=one").await;
        let (second, _) = get_json(app.clone(), "/chat?message=two").await;
        let (health, _) = get_json(app, "/test").await;

        assert_eq!(first, StatusCode::BAD_GATEWAY);
        assert_eq!(second, StatusCode::BAD_GATEWAY);
        assert_eq!(health, StatusCode::OK);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn any_origin_is_allowed() {
        let res = app(MockClient::replying("ok"))
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn root_serves_chat_page() {
        let res = app(MockClient::replying("ok"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let content_type = res.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/chat?message="));
    }

    /// Settings pointing at `api_base`, optionally probing the credential.
    fn settings_for(api_base: &str, verify: bool) -> Settings {
        let api_base = api_base.to_string();
        Settings::from_lookup(move |key| match key {
            "GEMINI_API_KEY" => Some("k".into()),
            "PARLEY_API_BASE" => Some(api_base.clone()),
            "PARLEY_VERIFY_CREDENTIAL" => Some(verify.to_string()),
            _ => None,
        })
        .unwrap()
    }

    /// Serves a fixed `/v1/models` answer and returns the API base.
    async fn models_endpoint(status: StatusCode, body: &'static str) -> String {
        let models = Router::new().route("/v1/models", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, models).await.unwrap();
        });
        format!("http://{}/v1/", addr)
    }

    #[tokio::test]
    async fn connect_skips_probe_by_default() {
        let settings = settings_for("http://127.0.0.1:9/v1", false);

        let relay = connect(&settings).await.unwrap();

        assert_eq!(relay.model(), parley_config::DEFAULT_MODEL);
        assert_eq!(relay.persona(), &parley_config::default_persona());
    }

    #[tokio::test]
    async fn connect_accepts_verified_credential() {
        let base = models_endpoint(
            StatusCode::OK,
            r#"{"object":"list","data":[{"id":"models/gemini-2.0-flash","object":"model","owned_by":"google"}]}"#,
        )
        .await;

        let relay = connect(&settings_for(&base, true)).await.unwrap();

        assert_eq!(relay.model(), parley_config::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn connect_refuses_rejected_credential() {
        let base = models_endpoint(StatusCode::UNAUTHORIZED, "").await;

        let err = connect(&settings_for(&base, true)).await.err().unwrap();

        assert!(matches!(err.downcast_ref::<RelayError>(), Some(RelayError::Auth(_))));
    }
}
