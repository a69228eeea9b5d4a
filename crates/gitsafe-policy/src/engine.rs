//! Policy evaluator: the main entry point for commit and push checks.

use crate::rules::{Guard, Outcome, PUSH_RULES};
use crate::types::*;

/// Evaluates commits and push edges against the branch-promotion policy.
///
/// Pure: no I/O, no interior state. The same inputs always give the same decision.
#[derive(Debug, Clone, Default)]
pub struct PolicyEvaluator {
    settings: PolicySettings,
}

impl PolicyEvaluator {
    pub fn new(settings: PolicySettings) -> Self {
        Self { settings }
    }

    /// Check whether a commit on `branch` by `identity` is allowed.
    ///
    /// Evaluation order, first match wins:
    /// 1. Protected branch → `Protected`.
    /// 2. Not `feature/*`, `release/*` or `hotfix/*` → `Naming`.
    /// 3. Identity without `@` → `Identity`.
    /// 4. Allow.
    pub fn evaluate_commit(&self, branch: &str, identity: &str) -> Decision {
        let branch = Branch::new(branch);
        let category = branch.category();

        if category.is_protected() {
            let workflow = match category {
                BranchCategory::Dev => "create a feature/* branch",
                _ => "create a release/* branch",
            };
            return Decision::Block {
                kind: BlockKind::Protected,
                reason: format!(
                    "Direct commits to '{branch}' are not allowed; {workflow} and open a pull request"
                ),
            };
        }

        if !category.accepts_commits() {
            return Decision::Block {
                kind: BlockKind::Naming,
                reason: format!(
                    "Branch '{branch}' does not follow the naming convention; use feature/<name>, release/<name> or hotfix/<name>"
                ),
            };
        }

        if !identity.contains('@') {
            return Decision::Block {
                kind: BlockKind::Identity,
                reason: format!("git config user.email '{identity}' is not a valid email address"),
            };
        }

        Decision::Allow
    }

    /// Commit check over values read from the repository.
    ///
    /// An unreadable branch or identity yields `Indeterminate` instead of a
    /// decision; the caller picks the fallback.
    pub fn evaluate_commit_context(
        &self,
        branch: &Context<String>,
        identity: &Context<String>,
    ) -> CommitOutcome {
        match (branch, identity) {
            (Context::Known(branch), Context::Known(identity)) => {
                CommitOutcome::Decided(self.evaluate_commit(branch, identity))
            }
            (Context::Indeterminate { reason }, _) | (_, Context::Indeterminate { reason }) => {
                CommitOutcome::Indeterminate {
                    reason: reason.clone(),
                }
            }
        }
    }

    /// Check a single push edge by branch names.
    pub fn evaluate_push_edge(&self, source: &str, target: &str) -> Decision {
        self.evaluate_edge(&PushEdge::new(source, target))
    }

    /// Check a single push edge against the push table.
    pub fn evaluate_edge(&self, edge: &PushEdge) -> Decision {
        let source = self.effective(edge.source.category());
        let target = self.effective(edge.target.category());
        let same_branch = edge.is_self_update();

        let row = PUSH_RULES.iter().find(|rule| {
            self.guard_active(rule.guard) && rule.matches(source, target, same_branch)
        });

        let Some(rule) = row else {
            tracing::debug!(source = %edge.source, target = %edge.target, "no push rule matched, allowing");
            return Decision::Allow;
        };
        tracing::debug!(source = %edge.source, target = %edge.target, rule = rule.name, "push rule matched");

        match rule.outcome {
            Outcome::Allow => Decision::Allow,
            Outcome::Block(kind, why) => Decision::Block {
                kind,
                reason: format!("'{}' -> '{}': {why}", edge.source, edge.target),
            },
        }
    }

    /// Evaluate every edge of a push. Never short-circuits, so every
    /// violation can be reported in one pass.
    pub fn evaluate_push(&self, edges: impl IntoIterator<Item = PushEdge>) -> PushReport {
        let verdicts = edges
            .into_iter()
            .map(|edge| {
                let decision = self.evaluate_edge(&edge);
                EdgeVerdict { edge, decision }
            })
            .collect();
        PushReport { verdicts }
    }

    fn effective(&self, category: BranchCategory) -> BranchCategory {
        if self.settings.treat_master_as_main && category == BranchCategory::Master {
            BranchCategory::Main
        } else {
            category
        }
    }

    fn guard_active(&self, guard: Guard) -> bool {
        match guard {
            Guard::Always => true,
            Guard::ProtectedSelfPush => self.settings.block_protected_self_push,
        }
    }
}
