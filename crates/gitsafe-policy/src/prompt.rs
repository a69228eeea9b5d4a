//! Confirmation prompt for the fix-branch flow.

use std::future::Future;
use std::pin::Pin;

/// User's answer to a fix-branch proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixResponse {
    /// Create the proposed branch and switch to it.
    Accept,
    /// Leave the repository untouched.
    Decline,
}

/// Trait for asking the user whether to create a fix branch.
///
/// Uses `Pin<Box<dyn Future>>` for dyn-compatibility, matching the `Narrator` trait.
pub trait FixPrompt: Send + Sync {
    /// Show the current and proposed branch names and wait for an answer.
    fn confirm_fix(
        &self,
        current: &str,
        proposed: &str,
    ) -> Pin<Box<dyn Future<Output = FixResponse> + Send + '_>>;
}

/// Ask `prompt` if there is one. No prompt (non-interactive) means decline.
pub async fn confirm_fix(prompt: Option<&dyn FixPrompt>, current: &str, proposed: &str) -> FixResponse {
    match prompt {
        Some(prompt) => prompt.confirm_fix(current, proposed).await,
        None => FixResponse::Decline,
    }
}
