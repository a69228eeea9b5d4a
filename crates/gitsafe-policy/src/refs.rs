//! Parsing of the ref-update lines git writes to a pre-push hook's stdin.

use crate::classify::branch_from_ref;
use crate::types::{Branch, PushEdge};
use gitsafe_types::RefUpdateError;

/// Local ref git reports when a push deletes the remote ref.
const DELETE_MARKER: &str = "(delete)";

/// One `<local_ref> <local_oid> <remote_ref> <remote_oid>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub local_ref: String,
    pub local_oid: String,
    pub remote_ref: String,
    pub remote_oid: String,
}

impl RefUpdate {
    /// Whether this update deletes the remote ref.
    pub fn is_deletion(&self) -> bool {
        self.local_ref == DELETE_MARKER || is_null_oid(&self.local_oid)
    }

    /// The `(source, target)` edge with `refs/heads/` stripped from both sides.
    pub fn edge(&self) -> PushEdge {
        PushEdge {
            source: Branch::new(branch_from_ref(&self.local_ref)),
            target: Branch::new(branch_from_ref(&self.remote_ref)),
            deletion: self.is_deletion(),
        }
    }
}

fn is_null_oid(oid: &str) -> bool {
    !oid.is_empty() && oid.bytes().all(|b| b == b'0')
}

/// Parse the full stdin of a pre-push hook. Blank lines are skipped.
pub fn parse_ref_updates(input: &str) -> Result<Vec<RefUpdate>, RefUpdateError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> Result<RefUpdate, RefUpdateError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [local_ref, local_oid, remote_ref, remote_oid] = fields.as_slice() else {
        return Err(RefUpdateError::WrongFieldCount {
            line: line_no,
            fields: fields.len(),
        });
    };
    Ok(RefUpdate {
        local_ref: local_ref.to_string(),
        local_oid: local_oid.to_string(),
        remote_ref: remote_ref.to_string(),
        remote_oid: remote_oid.to_string(),
    })
}
