//! Narrator trait for text-generation backends.

use crate::NarrationError;
use std::future::Future;
use std::pin::Pin;

/// A boxed future resolving to a narration or a narration error.
pub type NarrationFuture<'a> = Pin<Box<dyn Future<Output = Result<String, NarrationError>> + Send + 'a>>;

/// A text-generation backend that explains a blocked git operation.
///
/// Dyn-compatible so the CLI can hold an `Arc<dyn Narrator>` picked at startup.
/// Narration is advisory: implementations may fail freely, callers never let a
/// failure change a policy decision.
pub trait Narrator: Send + Sync {
    /// Produce a short natural-language explanation of `violation`.
    fn explain<'a>(&'a self, violation: &'a str) -> NarrationFuture<'a>;

    /// Backend name for logging (e.g., "openai").
    fn name(&self) -> &str;
}
