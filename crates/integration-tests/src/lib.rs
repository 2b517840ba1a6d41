//! Integration tests for the AquaCafe storefront.
//!
//! Every test starts its own storefront on an ephemeral loopback port and
//! talks to it over real HTTP with a cookie-keeping client, so session
//! behaviour is exercised end to end. Consultation tests point the
//! storefront at [`StandInGemini`], an in-process server that answers the
//! `generateContent` call with a canned response and records what it got.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aquacafe-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aquacafe_storefront::config::{GeminiConfig, StorefrontConfig};
use aquacafe_storefront::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

/// API key handed to the storefront in consultation tests.
pub const TEST_API_KEY: &str = "AIzaSyD3v9Qk2LmN8pR4sT6uW1xZ0bC5eF7gH";

/// Serve `router` on an ephemeral loopback port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });
    addr
}

/// A running storefront plus a client holding one visitor's session.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront with no Gemini key (AquaBot always falls back).
    pub async fn start() -> Self {
        Self::with_config(StorefrontConfig::default()).await
    }

    /// Start a storefront whose consultant talks to `gemini`.
    ///
    /// # Panics
    ///
    /// Panics if the stand-in URL does not parse.
    pub async fn with_gemini(gemini: &StandInGemini, timeout: Duration) -> Self {
        let config = StorefrontConfig {
            gemini: GeminiConfig {
                api_key: Some(SecretString::from(TEST_API_KEY)),
                api_base: Url::parse(&gemini.base_url).expect("Invalid stand-in URL"),
                timeout,
                ..GeminiConfig::default()
            },
            ..StorefrontConfig::default()
        };
        Self::with_config(config).await
    }

    async fn with_config(config: StorefrontConfig) -> Self {
        let addr = spawn(aquacafe_storefront::app(AppState::new(config))).await;
        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path` on this storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        read(response).await
    }

    /// POST a urlencoded form to `path` and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed");
        read(response).await
    }

    /// POST a multipart form to `path` and return status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("POST failed");
        read(response).await
    }

    /// The number shown on the header cart badge.
    ///
    /// # Panics
    ///
    /// Panics if the badge cannot be parsed.
    pub async fn cart_count(&self) -> u32 {
        let (_, body) = self.get("/cart/count").await;
        badge_number(&body).expect("Cart badge has no number")
    }
}

/// A client that keeps cookies, i.e. one visitor.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn read(response: reqwest::Response) -> (StatusCode, String) {
    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

/// Pull the number out of the cart badge fragment.
#[must_use]
pub fn badge_number(html: &str) -> Option<u32> {
    let start = html.find('>')? + 1;
    let end = start + html.get(start..)?.find('<')?;
    html.get(start..end)?.trim().parse().ok()
}

/// What the stand-in Gemini server received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Last path segment, e.g. `gemini-3-flash-preview:generateContent`.
    pub call: String,
    pub api_key: Option<String>,
    pub body: Value,
}

struct StandInState {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the Gemini `generateContent` endpoint.
pub struct StandInGemini {
    pub base_url: String,
    state: Arc<StandInState>,
}

impl StandInGemini {
    /// Answer every call with `200` and `reply`.
    pub async fn replying(reply: Value) -> Self {
        Self::start(StatusCode::OK, reply, Duration::ZERO).await
    }

    /// Answer every call with `status` and a Gemini-style error body.
    pub async fn failing(status: StatusCode) -> Self {
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": "stand-in failure",
                "status": "INTERNAL"
            }
        });
        Self::start(status, body, Duration::ZERO).await
    }

    /// Answer with `reply`, but only after `delay`.
    pub async fn slow(reply: Value, delay: Duration) -> Self {
        Self::start(StatusCode::OK, reply, delay).await
    }

    async fn start(status: StatusCode, reply: Value, delay: Duration) -> Self {
        let state = Arc::new(StandInState {
            status,
            reply,
            delay,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .route("/v1beta/models/{call}", post(generate_content))
            .with_state(Arc::clone(&state));
        let addr = spawn(router).await;
        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }
}

async fn generate_content(
    State(state): State<Arc<StandInState>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.requests.lock().await.push(RecordedRequest {
        call,
        api_key,
        body,
    });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, Json(state.reply.clone()))
}
