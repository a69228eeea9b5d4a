//! The push decision table.
//!
//! Rows are evaluated top to bottom and the first matching row wins, so the
//! order is part of the policy: `feature -> main` must hit the promotion row
//! before the generic "target is main" rows.

use crate::types::{BlockKind, BranchCategory};

/// Matcher for one side of an edge.
#[derive(Debug, Clone, Copy)]
pub enum Side {
    Any,
    Is(BranchCategory),
    IsNot(BranchCategory),
    OneOf(&'static [BranchCategory]),
}

impl Side {
    pub fn matches(self, category: BranchCategory) -> bool {
        match self {
            Side::Any => true,
            Side::Is(c) => c == category,
            Side::IsNot(c) => c != category,
            Side::OneOf(cs) => cs.contains(&category),
        }
    }
}

/// What a row decides.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Allow,
    Block(BlockKind, &'static str),
}

/// Condition under which a row is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// Active only with `PolicySettings::block_protected_self_push`.
    ProtectedSelfPush,
}

/// One row of the push table.
#[derive(Debug, Clone, Copy)]
pub struct PushRule {
    pub name: &'static str,
    pub source: Side,
    pub target: Side,
    /// Row applies only when source and target are the same branch name.
    pub same_branch: bool,
    pub guard: Guard,
    pub outcome: Outcome,
}

impl PushRule {
    pub fn matches(&self, source: BranchCategory, target: BranchCategory, same_branch: bool) -> bool {
        (!self.same_branch || same_branch) && self.source.matches(source) && self.target.matches(target)
    }
}

use BranchCategory::*;

/// The push table. Anything that falls through every row is allowed: only
/// the path into main (and same-branch pushes to protected branches) is gated.
pub const PUSH_RULES: &[PushRule] = &[
    PushRule {
        name: "feature-to-main",
        source: Side::Is(Feature),
        target: Side::Is(Main),
        same_branch: false,
        guard: Guard::Always,
        outcome: Outcome::Block(
            BlockKind::Promotion,
            "feature branches must go through a release/* branch first",
        ),
    },
    PushRule {
        name: "non-release-to-main",
        source: Side::IsNot(Release),
        target: Side::Is(Main),
        same_branch: false,
        guard: Guard::Always,
        outcome: Outcome::Block(BlockKind::Direct, "only release/* branches may reach main"),
    },
    PushRule {
        name: "release-to-main",
        source: Side::Is(Release),
        target: Side::Is(Main),
        same_branch: false,
        guard: Guard::Always,
        outcome: Outcome::Allow,
    },
    PushRule {
        name: "feature-to-release",
        source: Side::Is(Feature),
        target: Side::Is(Release),
        same_branch: false,
        guard: Guard::Always,
        outcome: Outcome::Allow,
    },
    PushRule {
        name: "work-branch-self-update",
        source: Side::OneOf(&[Feature, Bugfix]),
        target: Side::Any,
        same_branch: true,
        guard: Guard::Always,
        outcome: Outcome::Allow,
    },
    PushRule {
        name: "protected-self-push",
        source: Side::OneOf(&[Main, Uat, Dev]),
        target: Side::Any,
        same_branch: true,
        guard: Guard::ProtectedSelfPush,
        outcome: Outcome::Block(
            BlockKind::Protected,
            "direct pushes to a protected branch bypass code review; push a feature/* or release/* branch and open a pull request",
        ),
    },
    PushRule {
        name: "main-catch-all",
        source: Side::Any,
        target: Side::Is(Main),
        same_branch: false,
        guard: Guard::Always,
        outcome: Outcome::Block(BlockKind::Unknown, "push to main matched no promotion rule"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(source: BranchCategory, target: BranchCategory, same: bool) -> Option<&'static str> {
        PUSH_RULES
            .iter()
            .find(|r| r.matches(source, target, same))
            .map(|r| r.name)
    }

    #[test]
    fn test_row_order_promotion_before_direct() {
        assert_eq!(first_match(Feature, Main, false), Some("feature-to-main"));
        assert_eq!(first_match(Hotfix, Main, false), Some("non-release-to-main"));
        assert_eq!(first_match(Release, Main, false), Some("release-to-main"));
    }

    #[test]
    fn test_same_branch_rows_need_same_branch() {
        assert_eq!(first_match(Bugfix, Bugfix, false), None);
        assert_eq!(first_match(Bugfix, Bugfix, true), Some("work-branch-self-update"));
        assert_eq!(first_match(Uat, Uat, true), Some("protected-self-push"));
    }

    #[test]
    fn test_every_main_target_is_matched() {
        for source in BranchCategory::ALL {
            assert!(
                first_match(source, Main, false).is_some(),
                "{source:?} -> main fell through the table"
            );
        }
    }

    #[test]
    fn test_side_matchers() {
        assert!(Side::Any.matches(Unrecognized));
        assert!(Side::IsNot(Release).matches(Hotfix));
        assert!(!Side::IsNot(Release).matches(Release));
        assert!(Side::OneOf(&[Feature, Bugfix]).matches(Bugfix));
        assert!(!Side::OneOf(&[Feature, Bugfix]).matches(Hotfix));
    }
}
