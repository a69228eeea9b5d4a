//! Shared types and error hierarchy for gitsafe.

pub mod error;
pub mod narrator;

pub use error::{ConfigError, GitError, NarrationError, RefUpdateError};
pub use narrator::{NarrationFuture, Narrator};
