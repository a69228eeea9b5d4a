//! Installation of the `pre-commit` and `pre-push` shims.

use crate::repo::hooks_dir;
use gitsafe_types::GitError;
use std::path::{Path, PathBuf};

/// Line every shim carries so a reinstall recognises its own files.
pub const HOOK_MARKER: &str = "# installed by gitsafe";

const HOOKS: &[(&str, &str)] = &[
    ("pre-commit", "exec gitsafe validate-commit"),
    ("pre-push", "exec gitsafe validate-push \"$@\""),
];

fn shim(command: &str) -> String {
    format!("#!/bin/sh\n{HOOK_MARKER}\n{command}\n")
}

/// Write both hook shims into the repository's hooks directory.
///
/// An existing hook that gitsafe did not write is left alone and reported as
/// `GitError::HookExists` unless `force` is set. Nothing is written when any
/// hook is refused. Returns the paths written.
pub async fn install_hooks(dir: &Path, force: bool) -> Result<Vec<PathBuf>, GitError> {
    let hooks = hooks_dir(dir).await?;
    tokio::fs::create_dir_all(&hooks).await?;

    if !force {
        for (name, _) in HOOKS {
            let path = hooks.join(name);
            if is_foreign(&path).await? {
                return Err(GitError::HookExists {
                    path: path.display().to_string(),
                });
            }
        }
    }

    let mut written = Vec::with_capacity(HOOKS.len());
    for (name, command) in HOOKS {
        let path = hooks.join(name);
        tokio::fs::write(&path, shim(command)).await?;
        make_executable(&path).await?;
        tracing::debug!("installed {}", path.display());
        written.push(path);
    }
    Ok(written)
}

async fn is_foreign(path: &Path) -> Result<bool, GitError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(!contents.contains(HOOK_MARKER)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        // Binary or unreadable hook: not ours.
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(true),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), GitError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), GitError> {
    Ok(())
}
