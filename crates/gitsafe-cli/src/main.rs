//! gitsafe: git hooks that keep work flowing feature -> release -> main.

mod prompt;
mod report;
mod style;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitsafe_config::{CliOverrides, GitsafeConfig};
use gitsafe_narrator::{OpenAiNarrator, narrate_best_effort};
use gitsafe_policy::{
    BlockKind, CommitOutcome, Decision, FixPrompt, FixResponse, PolicyEvaluator, PushEdge,
    confirm_fix, describe_commit_violation, describe_push_violation, parse_ref_updates,
    suggest_fix_branch,
};
use gitsafe_types::Narrator;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(
    name = "gitsafe",
    version,
    about = "Enforce a feature -> release -> main promotion workflow from git hooks"
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Never call the narration service
    #[arg(long, global = true)]
    no_narration: bool,

    /// Narration model (overrides GITSAFE_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pre-commit hook: reject commits on protected or misnamed branches
    ValidateCommit,
    /// Pre-push hook: read ref updates from stdin and check every edge
    ValidatePush {
        /// Remote name, as passed by git
        remote: Option<String>,
        /// Remote URL, as passed by git
        url: Option<String>,
    },
    /// Check a single push from SOURCE to TARGET
    Check { source: String, target: String },
    /// Move work off a protected branch onto a correctly named one
    SuggestFix {
        /// Name to build the new branch from
        #[arg(long)]
        name: Option<String>,
        /// Create the branch without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Install the pre-commit and pre-push hooks in this repository
    Install {
        /// Replace hooks gitsafe did not write
        #[arg(long)]
        force: bool,
    },
}

/// Everything a subcommand needs, resolved once.
struct App {
    cwd: PathBuf,
    config: GitsafeConfig,
    evaluator: PolicyEvaluator,
    narrator: Option<Arc<dyn Narrator>>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let repo_root = gitsafe_git::repo_root(&cwd).await.ok();

    let config = GitsafeConfig::load(
        CliOverrides {
            no_narration: cli.no_narration,
            model: cli.model,
        },
        repo_root.as_deref(),
    );

    let app = App {
        narrator: build_narrator(&config),
        evaluator: PolicyEvaluator::new(config.policy.clone()),
        config,
        cwd,
    };

    match cli.command {
        Command::ValidateCommit => validate_commit(&app).await,
        Command::ValidatePush { remote, url } => {
            tracing::debug!(?remote, ?url, "pre-push");
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read ref updates from stdin")?;
            validate_push(&app, &input).await
        }
        Command::Check { source, target } => check(&app, &source, &target).await,
        Command::SuggestFix { name, yes } => suggest_fix(&app, name.as_deref(), yes).await,
        Command::Install { force } => install(&app.cwd, force).await,
    }
}

fn build_narrator(config: &GitsafeConfig) -> Option<Arc<dyn Narrator>> {
    let narration = config.narration.as_ref()?;
    match OpenAiNarrator::new(
        &narration.api_key,
        &narration.base_url,
        &narration.model,
        narration.max_tokens,
    ) {
        Ok(narrator) => Some(Arc::new(narrator)),
        Err(e) => {
            tracing::warn!("narration disabled: {e}");
            None
        }
    }
}

fn exit_code(blocked: bool) -> ExitCode {
    if blocked {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

impl App {
    /// Print a narration for `violation` if a narrator is configured and answers in time.
    async fn narrate(&self, violation: Option<String>) {
        let (Some(narrator), Some(violation), Some(narration)) =
            (&self.narrator, violation, &self.config.narration)
        else {
            return;
        };
        let timeout = Duration::from_millis(narration.timeout_ms);
        if let Some(text) = narrate_best_effort(narrator.as_ref(), &violation, timeout).await {
            report::print_narration(&text);
        }
    }
}

async fn validate_commit(app: &App) -> Result<ExitCode> {
    let branch = gitsafe_git::current_branch(&app.cwd).await;
    let identity = gitsafe_git::configured_identity(&app.cwd).await;

    let decision = match app.evaluator.evaluate_commit_context(&branch, &identity) {
        CommitOutcome::Decided(decision) => decision,
        CommitOutcome::Indeterminate { reason } => {
            report::print_warning(&format!("cannot check this commit: {reason}"));
            return Ok(exit_code(app.config.strict_context));
        }
    };

    let branch = branch.known().map(String::as_str).unwrap_or_default();
    eprintln!("{}", report::commit_line(branch, &decision));

    if decision.kind() == Some(BlockKind::Protected) {
        eprintln!(
            "  Run `gitsafe suggest-fix` to move your changes to a correctly named branch."
        );
    }
    app.narrate(describe_commit_violation(branch, &decision)).await;

    Ok(exit_code(decision.is_blocked()))
}

async fn validate_push(app: &App, input: &str) -> Result<ExitCode> {
    let updates = parse_ref_updates(input).context("Invalid ref update on stdin")?;
    if updates.is_empty() {
        tracing::debug!("no ref updates, nothing to check");
        return Ok(ExitCode::SUCCESS);
    }

    let report = app
        .evaluator
        .evaluate_push(updates.iter().map(|update| update.edge()));
    report::print_push_report(&report);

    if let Some(first) = report.blocked().next() {
        app.narrate(describe_push_violation(&first.edge, &first.decision))
            .await;
    }

    Ok(exit_code(report.is_blocked()))
}

async fn check(app: &App, source: &str, target: &str) -> Result<ExitCode> {
    let edge = PushEdge::new(source, target);
    let decision = app.evaluator.evaluate_edge(&edge);
    eprintln!("{}", report::edge_line(&edge, &decision));
    app.narrate(describe_push_violation(&edge, &decision)).await;
    Ok(exit_code(decision.is_blocked()))
}

async fn suggest_fix(app: &App, hint: Option<&str>, yes: bool) -> Result<ExitCode> {
    let branch = gitsafe_git::current_branch(&app.cwd).await;
    let identity = gitsafe_git::configured_identity(&app.cwd).await;

    let decision = match app.evaluator.evaluate_commit_context(&branch, &identity) {
        CommitOutcome::Decided(decision) => decision,
        CommitOutcome::Indeterminate { reason } => {
            report::print_warning(&format!("cannot check this repository: {reason}"));
            return Ok(ExitCode::FAILURE);
        }
    };
    let current = branch.known().map(String::as_str).unwrap_or_default();

    let proposed = match (&decision, suggest_fix_branch(current, hint)) {
        (
            Decision::Block {
                kind: BlockKind::Protected,
                ..
            },
            Some(proposed),
        ) => proposed,
        _ => {
            eprintln!("{}", report::commit_line(current, &decision));
            eprintln!("  Nothing to fix: '{current}' is not a protected branch.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let response = if yes {
        FixResponse::Accept
    } else {
        let terminal = prompt::TerminalFixPrompt;
        let handler = io::stdin()
            .is_terminal()
            .then_some(&terminal as &dyn FixPrompt);
        confirm_fix(handler, current, &proposed).await
    };

    if response == FixResponse::Decline {
        eprintln!("  Left '{current}' untouched.");
        return Ok(ExitCode::FAILURE);
    }

    gitsafe_git::create_and_switch(&app.cwd, &proposed)
        .await
        .with_context(|| format!("Failed to create branch '{proposed}'"))?;
    eprintln!(
        "{} Switched to new branch '{proposed}'. Commit there and open a pull request.",
        style::success("✓")
    );
    Ok(ExitCode::SUCCESS)
}

async fn install(cwd: &Path, force: bool) -> Result<ExitCode> {
    let written = gitsafe_git::install_hooks(cwd, force)
        .await
        .context("Failed to install hooks")?;
    for path in written {
        eprintln!("{} {}", style::success("installed"), path.display());
    }
    Ok(ExitCode::SUCCESS)
}
