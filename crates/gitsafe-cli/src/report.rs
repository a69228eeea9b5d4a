//! Human-readable verdict lines, written to stderr.

use crate::style;
use gitsafe_policy::{Decision, EdgeVerdict, PushEdge, PushReport};

/// `ALLOWED` or `BLOCKED`, coloured.
fn tag(decision: &Decision) -> String {
    if decision.is_blocked() {
        style::error("BLOCKED")
    } else {
        style::success("ALLOWED")
    }
}

/// One line for a push edge, e.g. `BLOCKED  feature/x -> main  [BLOCK-promotion] ...`.
pub fn edge_line(edge: &PushEdge, decision: &Decision) -> String {
    let mut line = format!("{}  {} -> {}", tag(decision), edge.source, edge.target);
    if edge.deletion {
        line.push_str(&style::dim(" (delete)"));
    }
    if let Some(reason) = decision.reason() {
        line.push_str(&format!("  [{}] {reason}", decision.label()));
    }
    line
}

/// One line for a commit check.
pub fn commit_line(branch: &str, decision: &Decision) -> String {
    let mut line = format!("{}  commit on {branch}", tag(decision));
    if let Some(reason) = decision.reason() {
        line.push_str(&format!("  [{}] {reason}", decision.label()));
    }
    line
}

pub fn print_push_report(report: &PushReport) {
    for EdgeVerdict { edge, decision } in &report.verdicts {
        eprintln!("{}", edge_line(edge, decision));
    }
}

pub fn print_narration(text: &str) {
    for line in text.lines() {
        eprintln!("  {}", style::dim(line));
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{} {message}", style::warning("warning:"));
}
