//! Gemini REST client configuration with sensible defaults.

pub mod types;

use crate::config::GeminiSettings;
use crate::error::{NewscasterError, Result};
use std::time::Duration;
use tracing::{debug, instrument};
use types::{GenerateContentRequest, GenerateContentResponse};
use url::Url;

/// Default timeout for Gemini API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Thin client for the Generative Language `generateContent` endpoint.
///
/// The API key is held by the client; nothing reads it from ambient state.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint with the default timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(
            api_key,
            &GeminiSettings::default().base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client with a custom base URL and timeout.
    pub fn with_config(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NewscasterError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Create a client from settings, resolving the API key.
    pub fn from_settings(settings: &GeminiSettings) -> Result<Self> {
        Self::with_config(
            settings.resolve_api_key()?,
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Endpoint URL for a model's `generateContent` method.
    pub fn endpoint(&self, model: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("models/{}:generateContent", model))?)
    }

    /// Send one request. Single attempt, no retry.
    #[instrument(skip(self, request))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("{} returned {}: {}", model, status, body.trim());
            return Err(if status.is_server_error() {
                NewscasterError::Network(message)
            } else {
                NewscasterError::Model(message)
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| NewscasterError::Model(format!("{} returned unreadable JSON: {}", model, e)))
    }
}

/// Parse the base URL, making sure relative joins land below it.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}
