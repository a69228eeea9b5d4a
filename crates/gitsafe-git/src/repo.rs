//! Repository queries and branch switching.

use crate::command::run_git;
use gitsafe_policy::Context;
use gitsafe_types::GitError;
use std::path::{Path, PathBuf};

/// Name of the checked-out branch.
///
/// A detached HEAD, a directory outside any repository or a missing `git`
/// binary all yield `Context::Indeterminate`.
pub async fn current_branch(dir: &Path) -> Context<String> {
    match run_git(dir, &["symbolic-ref", "--short", "-q", "HEAD"]).await {
        Ok(name) if !name.is_empty() => Context::Known(name),
        Ok(_) => Context::indeterminate("HEAD is detached"),
        Err(GitError::CommandFailed { message, .. }) if message.is_empty() => {
            Context::indeterminate("HEAD is detached")
        }
        Err(e) => Context::indeterminate(format!("cannot read current branch: {e}")),
    }
}

/// The committer's `user.email`. Unset or empty yields `Context::Indeterminate`.
pub async fn configured_identity(dir: &Path) -> Context<String> {
    match run_git(dir, &["config", "user.email"]).await {
        Ok(email) if !email.is_empty() => Context::Known(email),
        Ok(_) => Context::indeterminate("user.email is empty"),
        Err(GitError::CommandFailed { .. }) => Context::indeterminate("user.email is not set"),
        Err(e) => Context::indeterminate(format!("cannot read user.email: {e}")),
    }
}

/// Top-level directory of the repository containing `dir`.
pub async fn repo_root(dir: &Path) -> Result<PathBuf, GitError> {
    match run_git(dir, &["rev-parse", "--show-toplevel"]).await {
        Ok(root) => Ok(PathBuf::from(root)),
        Err(GitError::CommandFailed { .. }) => Err(GitError::NotGitRepo {
            path: dir.display().to_string(),
        }),
        Err(e) => Err(e),
    }
}

/// Create `name` at HEAD and check it out, carrying the working tree and index along.
pub async fn create_and_switch(dir: &Path, name: &str) -> Result<(), GitError> {
    run_git(dir, &["switch", "-c", name]).await?;
    tracing::debug!("switched to new branch {name}");
    Ok(())
}

/// The directory git runs hooks from (honours `core.hooksPath`).
pub async fn hooks_dir(dir: &Path) -> Result<PathBuf, GitError> {
    let path = match run_git(dir, &["rev-parse", "--git-path", "hooks"]).await {
        Ok(path) => PathBuf::from(path),
        Err(GitError::CommandFailed { .. }) => {
            return Err(GitError::NotGitRepo {
                path: dir.display().to_string(),
            });
        }
        Err(e) => return Err(e),
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(dir.join(path))
    }
}
