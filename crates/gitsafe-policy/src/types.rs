//! Core types for the branch policy.

use crate::classify::classify;
use std::fmt;

/// The category a branch name falls into. Computed once per name by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCategory {
    /// `main`, the production branch.
    Main,
    /// `master`, the historical production name. Protected for commits only,
    /// unless `treat_master_as_main` is set.
    Master,
    /// `uat`, the staging integration branch.
    Uat,
    /// `dev`, the development integration branch.
    Dev,
    /// `feature/<name>`
    Feature,
    /// `release/<name>`
    Release,
    /// `hotfix/<name>`
    Hotfix,
    /// `bugfix/<name>`
    Bugfix,
    Unrecognized,
}

impl BranchCategory {
    /// All categories, in classification priority order.
    pub const ALL: [BranchCategory; 9] = [
        BranchCategory::Main,
        BranchCategory::Master,
        BranchCategory::Uat,
        BranchCategory::Dev,
        BranchCategory::Feature,
        BranchCategory::Release,
        BranchCategory::Hotfix,
        BranchCategory::Bugfix,
        BranchCategory::Unrecognized,
    ];

    /// Whether direct commits to this category are forbidden.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            BranchCategory::Main | BranchCategory::Master | BranchCategory::Uat | BranchCategory::Dev
        )
    }

    /// Whether commits may be made on this category.
    pub fn accepts_commits(self) -> bool {
        matches!(
            self,
            BranchCategory::Feature | BranchCategory::Release | BranchCategory::Hotfix
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BranchCategory::Main => "main",
            BranchCategory::Master => "master",
            BranchCategory::Uat => "uat",
            BranchCategory::Dev => "dev",
            BranchCategory::Feature => "feature",
            BranchCategory::Release => "release",
            BranchCategory::Hotfix => "hotfix",
            BranchCategory::Bugfix => "bugfix",
            BranchCategory::Unrecognized => "unrecognized",
        }
    }
}

/// A branch name together with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: String,
    category: BranchCategory,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let category = classify(&name);
        Self { name, category }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> BranchCategory {
        self.category
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Why an operation was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Commit or self-push on a protected branch.
    Protected,
    /// Branch name outside the accepted prefixes.
    Naming,
    /// Committer email is not an email address.
    Identity,
    /// A feature branch skipped the release stage.
    Promotion,
    /// A non-release branch targeted main.
    Direct,
    /// A push to main matched no promotion rule.
    Unknown,
}

impl BlockKind {
    /// Stable label used in reports and logs.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Protected => "BLOCK-protected",
            BlockKind::Naming => "BLOCK-naming",
            BlockKind::Identity => "BLOCK-identity",
            BlockKind::Promotion => "BLOCK-promotion",
            BlockKind::Direct => "BLOCK-direct",
            BlockKind::Unknown => "BLOCK-unknown",
        }
    }
}

/// The result of evaluating a commit or a push edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Allow,
    /// The operation is rejected.
    Block { kind: BlockKind, reason: String },
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Block { kind, .. } => kind.label(),
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Decision::Allow => None,
            Decision::Block { kind, .. } => Some(*kind),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Block { reason, .. } => Some(reason),
        }
    }
}

/// A value read from the repository, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context<T> {
    Known(T),
    Indeterminate { reason: String },
}

impl<T> Context<T> {
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Context::Indeterminate {
            reason: reason.into(),
        }
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Context::Known(value) => Some(value),
            Context::Indeterminate { .. } => None,
        }
    }
}

/// Outcome of a commit check when the inputs come from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Decided(Decision),
    /// Branch or identity could not be determined; no decision was made.
    Indeterminate { reason: String },
}

/// One `(source, target)` pair from a ref-update line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEdge {
    pub source: Branch,
    pub target: Branch,
    /// The remote ref is being deleted rather than updated.
    pub deletion: bool,
}

impl PushEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Branch::new(source),
            target: Branch::new(target),
            deletion: false,
        }
    }

    pub fn is_self_update(&self) -> bool {
        self.source.name() == self.target.name()
    }
}

/// An edge together with its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeVerdict {
    pub edge: PushEdge,
    pub decision: Decision,
}

/// Decisions for every edge of a single push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    pub verdicts: Vec<EdgeVerdict>,
}

impl PushReport {
    /// A push is rejected iff at least one edge is blocked.
    pub fn is_blocked(&self) -> bool {
        self.verdicts.iter().any(|v| v.decision.is_blocked())
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn blocked(&self) -> impl Iterator<Item = &EdgeVerdict> {
        self.verdicts.iter().filter(|v| v.decision.is_blocked())
    }
}

/// Knobs for the evaluator. Passed in explicitly at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySettings {
    /// Evaluate `master` exactly like `main` in push rules.
    pub treat_master_as_main: bool,
    /// Block a push whose source and target are the same protected branch.
    pub block_protected_self_push: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            treat_master_as_main: false,
            block_protected_self_push: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_set() {
        let protected: Vec<_> = BranchCategory::ALL
            .into_iter()
            .filter(|c| c.is_protected())
            .collect();
        assert_eq!(
            protected,
            vec![
                BranchCategory::Main,
                BranchCategory::Master,
                BranchCategory::Uat,
                BranchCategory::Dev
            ]
        );
    }

    #[test]
    fn bugfix_does_not_accept_commits() {
        assert!(!BranchCategory::Bugfix.accepts_commits());
        assert!(BranchCategory::Hotfix.accepts_commits());
    }

    #[test]
    fn decision_accessors() {
        let d = Decision::Block {
            kind: BlockKind::Direct,
            reason: "nope".into(),
        };
        assert!(d.is_blocked());
        assert_eq!(d.label(), "BLOCK-direct");
        assert_eq!(d.reason(), Some("nope"));
        assert_eq!(Decision::Allow.label(), "ALLOW");
        assert_eq!(Decision::Allow.kind(), None);
    }

    #[test]
    fn push_report_or_reduces() {
        let allow = EdgeVerdict {
            edge: PushEdge::new("feature/a", "release/b"),
            decision: Decision::Allow,
        };
        let block = EdgeVerdict {
            edge: PushEdge::new("feature/c", "main"),
            decision: Decision::Block {
                kind: BlockKind::Promotion,
                reason: String::new(),
            },
        };
        let report = PushReport {
            verdicts: vec![allow.clone()],
        };
        assert!(!report.is_blocked());

        let report = PushReport {
            verdicts: vec![allow, block],
        };
        assert!(report.is_blocked());
        assert_eq!(report.blocked().count(), 1);
    }

    #[test]
    fn empty_report_is_not_blocked() {
        let report = PushReport::default();
        assert!(report.is_empty());
        assert!(!report.is_blocked());
    }
}
