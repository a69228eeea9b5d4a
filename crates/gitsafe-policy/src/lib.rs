//! Branch-promotion policy for gitsafe's git hooks.
//!
//! Commit rules: protected / naming / identity.
//! Push rules: an ordered table keyed by (source category, target category).
//! Everything here is pure; git queries and narration live in other crates.

pub mod classify;
pub mod engine;
pub mod fix;
pub mod narration;
pub mod prompt;
pub mod refs;
pub mod rules;
pub mod types;

pub use classify::classify;
pub use engine::PolicyEvaluator;
pub use fix::suggest_fix_branch;
pub use narration::{describe_commit_violation, describe_push_violation};
pub use prompt::{FixPrompt, FixResponse, confirm_fix};
pub use refs::{RefUpdate, parse_ref_updates};
pub use types::*;
