//! OpenAI narrator and the best-effort narration helper.

use crate::client::ChatClient;
use crate::retry::RetryConfig;
use crate::types::{ChatMessage, ChatRequest};
use gitsafe_types::{NarrationError, NarrationFuture, Narrator};
use std::time::Duration;

/// System prompt for the safety bot.
pub const SYSTEM_PROMPT: &str = "You are a helpful Git Safety Bot that explains why a blocked git operation \
     (a direct commit or push to a protected branch, or a push that skips a promotion stage) is dangerous. \
     Keep responses concise (2-3 sentences).";

/// Narrations longer than this are cut, on a char boundary.
const MAX_NARRATION_BYTES: usize = 2_000;

/// Narrator backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiNarrator {
    client: ChatClient,
    model: String,
    max_tokens: u32,
}

impl OpenAiNarrator {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, NarrationError> {
        Ok(Self {
            client: ChatClient::new(api_key, base_url)?,
            model: model.into(),
            max_tokens,
        })
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.client = self.client.with_retry_config(config);
        self
    }

    fn request(&self, violation: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!("Explain why this is a problem: {violation}")),
            ],
            max_tokens: self.max_tokens,
        }
    }
}

impl Narrator for OpenAiNarrator {
    fn explain<'a>(&'a self, violation: &'a str) -> NarrationFuture<'a> {
        Box::pin(async move {
            let response = self.client.create_chat_completion(&self.request(violation)).await?;
            response
                .first_text()
                .map(|text| clip(text, MAX_NARRATION_BYTES).to_string())
                .ok_or_else(|| NarrationError::Malformed("response has no message content".into()))
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Ask `narrator` to explain `violation`, giving up after `timeout`.
///
/// Every failure (timeout, network, HTTP error, malformed response) is logged
/// at `warn` and becomes `None`. On timeout the in-flight request is dropped.
pub async fn narrate_best_effort(
    narrator: &dyn Narrator,
    violation: &str,
    timeout: Duration,
) -> Option<String> {
    let result = match tokio::time::timeout(timeout, narrator.explain(violation)).await {
        Ok(result) => result,
        Err(_) => Err(NarrationError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(narrator = narrator.name(), "narration unavailable: {e}");
            None
        }
    }
}

/// Truncate to at most `max_bytes`, never splitting a UTF-8 codepoint.
fn clip(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
