//! Chat-completions client.

use std::time::Duration;

use gitsafe_types::NarrationError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::retry::{RetryConfig, calculate_delay, is_retryable};
use crate::types::{ChatRequest, ChatResponse};

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    retry_config: RetryConfig,
}

impl ChatClient {
    /// Create a new chat client.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, NarrationError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NarrationError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            retry_config: RetryConfig::default(),
        })
    }

    /// Set the retry configuration for transient errors (429, 5xx, network).
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Send a chat-completions request and return the parsed response.
    ///
    /// No overall deadline is applied here; callers bound the whole call.
    pub async fn create_chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, NarrationError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|_| {
                NarrationError::Auth {
                    message: "Invalid API key format".into(),
                }
            })?,
        );

        for attempt in 0..=self.retry_config.max_retries {
            tracing::debug!(
                "POST {url} (attempt {}/{})",
                attempt + 1,
                self.retry_config.max_retries + 1
            );

            let result = self
                .http
                .post(&url)
                .headers(headers.clone())
                .json(request)
                .send()
                .await;

            let (err, delay) = match result {
                Ok(response) => {
                    let status = response.status();
                    let retry_after = parse_retry_after(response.headers());
                    let body_text = response.text().await.unwrap_or_default();

                    if status.is_success() {
                        return serde_json::from_str::<ChatResponse>(&body_text)
                            .map_err(|e| NarrationError::Malformed(e.to_string()));
                    }

                    let err = classify_error(status.as_u16(), &body_text, retry_after);
                    if !is_retryable(&err) || attempt == self.retry_config.max_retries {
                        return Err(err);
                    }
                    (err, calculate_delay(&self.retry_config, attempt, retry_after))
                }
                Err(e) => {
                    let err = NarrationError::Network(e.to_string());
                    if attempt == self.retry_config.max_retries {
                        return Err(err);
                    }
                    (err, calculate_delay(&self.retry_config, attempt, None))
                }
            };

            tracing::debug!(
                "Retryable narration error (attempt {}/{}): {err}. Retrying in {delay}ms...",
                attempt + 1,
                self.retry_config.max_retries + 1,
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        // Unreachable: the loop always returns on the last attempt
        unreachable!("retry loop should have returned")
    }
}

/// Parse the `retry-after` header value as seconds and convert to milliseconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}

/// Classify an HTTP error response into a typed NarrationError.
fn classify_error(status: u16, body: &str, retry_after: Option<u64>) -> NarrationError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
    }
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => NarrationError::Auth { message },
        400 => NarrationError::BadRequest { message },
        429 => NarrationError::RateLimited {
            retry_after_ms: retry_after,
        },
        _ => NarrationError::Server { status, message },
    }
}
