//! Terminal confirmation for `suggest-fix`.

use gitsafe_policy::{FixPrompt, FixResponse};
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::pin::Pin;

/// Asks on stderr and reads the answer from stdin.
pub struct TerminalFixPrompt;

impl FixPrompt for TerminalFixPrompt {
    fn confirm_fix(
        &self,
        current: &str,
        proposed: &str,
    ) -> Pin<Box<dyn Future<Output = FixResponse> + Send + '_>> {
        let current = current.to_string();
        let proposed = proposed.to_string();

        Box::pin(async move {
            // Use spawn_blocking since we read from stdin
            let result = tokio::task::spawn_blocking(move || {
                let stderr = io::stderr();
                let mut err = stderr.lock();

                let _ = writeln!(err);
                let _ = writeln!(err, "  Commits are not allowed on '{current}'.");
                let _ = write!(
                    err,
                    "  Move your work to a new branch '{proposed}'? [y/N] > "
                );
                let _ = err.flush();

                let mut input = String::new();
                let stdin = io::stdin();
                let _ = stdin.lock().read_line(&mut input);

                parse_answer(&input)
            })
            .await;

            result.unwrap_or(FixResponse::Decline)
        })
    }
}

fn parse_answer(input: &str) -> FixResponse {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => FixResponse::Accept,
        _ => FixResponse::Decline,
    }
}
