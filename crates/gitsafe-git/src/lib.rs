//! Thin wrapper over the `git` binary.
//!
//! Everything here shells out with `tokio::process::Command` so the caller
//! can bound how long a hook waits on git.

mod command;
mod hooks;
mod repo;

pub use hooks::{HOOK_MARKER, install_hooks};
pub use repo::{configured_identity, create_and_switch, current_branch, hooks_dir, repo_root};
