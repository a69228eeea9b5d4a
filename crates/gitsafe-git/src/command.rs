use gitsafe_types::GitError;
use std::path::Path;

/// Run `git <args>` in `dir` and return trimmed stdout.
pub(crate) async fn run_git(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    tracing::debug!(dir = %dir.display(), "git {}", args.join(" "));

    let output = tokio::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GitError::GitNotFound,
            _ => GitError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            command: args.join(" "),
            message: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
