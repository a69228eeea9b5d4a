//! Error hierarchy for gitsafe.
//!
//! Policy violations are not errors: they are `Decision::Block` values.
//! Everything here is operational (git, config, narration, hook input).

use thiserror::Error;

/// Errors from the narration service. All of them are swallowed by callers.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Server error: {status} {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Narration timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Errors from querying or driving the `git` binary.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {path}")]
    NotGitRepo { path: String },

    #[error("git not found on PATH")]
    GitNotFound,

    #[error("`git {command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("a different hook already exists at {path} (use --force to replace it)")]
    HookExists { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },
}

/// Errors from parsing the ref-update lines git feeds the pre-push hook.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefUpdateError {
    #[error("line {line}: expected `<local_ref> <local_oid> <remote_ref> <remote_oid>`, got {fields} field(s)")]
    WrongFieldCount { line: usize, fields: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_update_error_names_the_line() {
        let err = RefUpdateError::WrongFieldCount { line: 3, fields: 2 };
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn git_error_from_io() {
        let err: GitError = std::io::Error::other("boom").into();
        assert!(matches!(err, GitError::Io(_)));
    }

    #[test]
    fn narration_timeout_display() {
        let err = NarrationError::Timeout { timeout_ms: 12_000 };
        assert_eq!(err.to_string(), "Narration timed out after 12000ms");
    }
}
