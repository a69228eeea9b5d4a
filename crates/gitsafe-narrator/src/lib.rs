//! OpenAI-compatible chat-completions client used to narrate blocked git operations.
//!
//! Narration is advisory. [`narrate_best_effort`] bounds the call with a hard
//! timeout and turns every failure into `None`.

mod client;
mod narrator;
mod retry;
mod types;

pub use client::ChatClient;
pub use narrator::{OpenAiNarrator, SYSTEM_PROMPT, narrate_best_effort};
pub use retry::RetryConfig;
pub use types::{ChatMessage, ChatRequest, ChatResponse};
