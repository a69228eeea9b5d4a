//! Branch classification: maps a branch name to its [`BranchCategory`].

use crate::types::BranchCategory;

const PREFIXES: [(&str, BranchCategory); 4] = [
    ("feature/", BranchCategory::Feature),
    ("release/", BranchCategory::Release),
    ("hotfix/", BranchCategory::Hotfix),
    ("bugfix/", BranchCategory::Bugfix),
];

/// Classify a branch name.
///
/// Exact names are checked before prefixes. Matching is case-sensitive and a
/// prefix only counts when something follows it (`feature/` alone is
/// unrecognized).
pub fn classify(name: &str) -> BranchCategory {
    match name {
        "main" => return BranchCategory::Main,
        "master" => return BranchCategory::Master,
        "uat" => return BranchCategory::Uat,
        "dev" => return BranchCategory::Dev,
        _ => {}
    }

    PREFIXES
        .iter()
        .find_map(|(prefix, category)| match name.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => Some(*category),
            _ => None,
        })
        .unwrap_or(BranchCategory::Unrecognized)
}

/// Strip `refs/heads/` from a ref, leaving other refs untouched.
pub fn branch_from_ref(reference: &str) -> &str {
    reference.strip_prefix("refs/heads/").unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names() {
        assert_eq!(classify("main"), BranchCategory::Main);
        assert_eq!(classify("master"), BranchCategory::Master);
        assert_eq!(classify("uat"), BranchCategory::Uat);
        assert_eq!(classify("dev"), BranchCategory::Dev);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(classify("feature/login"), BranchCategory::Feature);
        assert_eq!(classify("release/1.2.0"), BranchCategory::Release);
        assert_eq!(classify("hotfix/crash"), BranchCategory::Hotfix);
        assert_eq!(classify("bugfix/typo"), BranchCategory::Bugfix);
        assert_eq!(classify("feature/nested/path"), BranchCategory::Feature);
    }

    #[test]
    fn test_bare_prefix_is_unrecognized() {
        assert_eq!(classify("feature/"), BranchCategory::Unrecognized);
        assert_eq!(classify("release/"), BranchCategory::Unrecognized);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(classify("Main"), BranchCategory::Unrecognized);
        assert_eq!(classify("Feature/x"), BranchCategory::Unrecognized);
    }

    #[test]
    fn test_near_misses() {
        assert_eq!(classify("randomname"), BranchCategory::Unrecognized);
        assert_eq!(classify("features/x"), BranchCategory::Unrecognized);
        assert_eq!(classify("main2"), BranchCategory::Unrecognized);
        assert_eq!(classify("development"), BranchCategory::Unrecognized);
        assert_eq!(classify(""), BranchCategory::Unrecognized);
    }

    #[test]
    fn test_branch_from_ref() {
        assert_eq!(branch_from_ref("refs/heads/feature/x"), "feature/x");
        assert_eq!(branch_from_ref("refs/tags/v1.0"), "refs/tags/v1.0");
        assert_eq!(branch_from_ref("main"), "main");
    }
}
