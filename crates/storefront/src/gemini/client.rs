//! Gemini API client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone. The per-request timeout comes from [`GeminiConfig`].
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::NotConfigured`] without an API key, or an error
    /// if the key is not a valid header value or the HTTP client cannot be
    /// built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let api_key = config.api_key.as_ref().ok_or(GeminiError::NotConfigured)?;

        let mut key_value = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| GeminiError::Unauthorized("API key is not a valid header".to_string()))?;
        key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, key_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let endpoint = generate_content_url(&config.api_base, &config.model)?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint,
                model: config.model.clone(),
            }),
        })
    }

    /// Model this client talks to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a `generateContent` request and return the parsed response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the API answers
    /// with a non-success status or an unparseable body.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
    }
}

/// Build `{api_base}/v1beta/models/{model}:generateContent`.
fn generate_content_url(api_base: &Url, model: &str) -> Result<Url, GeminiError> {
    let base = api_base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/v1beta/models/{model}:generateContent"))
        .map_err(|e| GeminiError::Parse(format!("Invalid endpoint: {e}")))
}

/// Map an error status code to a [`GeminiError`].
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GeminiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return GeminiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return GeminiError::Unauthorized(format!("API key rejected ({status})"));
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => GeminiError::Api {
                status: api_error
                    .error
                    .status
                    .unwrap_or_else(|| api_error.error.code.to_string()),
                message: api_error.error.message,
            },
            Err(_) => GeminiError::Api {
                status: status.as_u16().to_string(),
                message: body,
            },
        },
        Err(e) => GeminiError::from(e),
    }
}
