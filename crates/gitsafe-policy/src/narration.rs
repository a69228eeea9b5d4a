//! Violation descriptions handed to a narrator.

use crate::types::{BlockKind, Decision, PushEdge};

/// Describe a blocked commit for narration. `None` when the decision allows.
pub fn describe_commit_violation(branch: &str, decision: &Decision) -> Option<String> {
    let Decision::Block { kind, reason } = decision else {
        return None;
    };
    let text = match kind {
        BlockKind::Protected => format!(
            "Developer tried to commit directly to the {branch} branch. This bypasses code review and can break the {} environment. {reason}.",
            branch.to_uppercase()
        ),
        _ => format!("Developer tried to commit on branch '{branch}'. {reason}."),
    };
    Some(text)
}

/// Describe a blocked push edge for narration. `None` when the decision allows.
pub fn describe_push_violation(edge: &PushEdge, decision: &Decision) -> Option<String> {
    let Decision::Block { kind, reason } = decision else {
        return None;
    };
    let target = edge.target.name();
    let text = match kind {
        BlockKind::Protected | BlockKind::Direct => format!(
            "Developer tried to push directly to the {target} branch. This bypasses code review and can break the {} environment. {reason}.",
            target.to_uppercase()
        ),
        _ => format!(
            "Developer tried to push '{}' to '{target}'. {reason}.",
            edge.source.name()
        ),
    };
    Some(text)
}
