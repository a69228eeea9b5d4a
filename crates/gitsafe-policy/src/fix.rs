//! Fix-branch suggestions for commits attempted on protected branches.

use crate::classify::classify;
use crate::types::BranchCategory;

/// Propose a correctly named branch to move work off a protected branch.
///
/// `main`, `master` and `uat` get a `release/*` branch, `dev` gets a
/// `feature/*` branch. `hint` becomes the slug after sanitizing; without a
/// usable hint the slug is `wip-<local timestamp>`. Returns `None` when the
/// branch is not protected.
pub fn suggest_fix_branch(branch: &str, hint: Option<&str>) -> Option<String> {
    let prefix = match classify(branch) {
        BranchCategory::Main | BranchCategory::Master | BranchCategory::Uat => "release",
        BranchCategory::Dev => "feature",
        _ => return None,
    };

    let slug = hint
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("wip-{}", chrono::Local::now().format("%Y%m%d-%H%M%S")));

    Some(format!("{prefix}/{slug}"))
}

/// Lowercase, collapse anything outside `[a-z0-9._-]` into single dashes,
/// collapse runs of dots, trim leading/trailing separators.
///
/// The result is always a valid ref component: no `..` and no `.lock` suffix.
pub fn slugify(hint: &str) -> String {
    let mut slug = String::with_capacity(hint.len());
    for c in hint.chars().flat_map(char::to_lowercase) {
        if c == '.' {
            if !slug.ends_with('.') {
                slug.push('.');
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let is_separator = |c: char| c == '-' || c == '.';
    let mut slug = slug.trim_matches(is_separator);
    while let Some(stripped) = slug.strip_suffix(".lock") {
        slug = stripped.trim_end_matches(is_separator);
    }
    slug.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_gets_feature_branch() {
        assert_eq!(
            suggest_fix_branch("dev", Some("Login Page")),
            Some("feature/login-page".to_string())
        );
    }

    #[test]
    fn test_main_uat_master_get_release_branch() {
        for branch in ["main", "master", "uat"] {
            assert_eq!(
                suggest_fix_branch(branch, Some("v2")),
                Some("release/v2".to_string()),
                "{branch}"
            );
        }
    }

    #[test]
    fn test_not_protected_returns_none() {
        assert_eq!(suggest_fix_branch("feature/x", Some("y")), None);
        assert_eq!(suggest_fix_branch("randomname", None), None);
    }

    #[test]
    fn test_missing_hint_uses_timestamp() {
        let name = suggest_fix_branch("dev", None).unwrap();
        assert!(name.starts_with("feature/wip-"), "{name}");
        assert_eq!(classify(&name), BranchCategory::Feature);
    }

    #[test]
    fn test_unusable_hint_falls_back() {
        let name = suggest_fix_branch("main", Some("///")).unwrap();
        assert!(name.starts_with("release/wip-"), "{name}");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fix  the Bug!!"), "fix-the-bug");
        assert_eq!(slugify("--v1.2.3--"), "v1.2.3");
        assert_eq!(slugify("snake_case-ok"), "snake_case-ok");
        assert_eq!(slugify("Über straße"), "ber-stra-e");
    }

    #[test]
    fn test_slugify_yields_valid_ref_component() {
        assert_eq!(slugify("v1..2"), "v1.2");
        assert_eq!(slugify("a...b"), "a.b");
        assert_eq!(slugify("config.lock"), "config");
        assert_eq!(slugify("x.lock.lock"), "x");
        assert_eq!(slugify(".lock"), "lock");
        assert_eq!(slugify("unlocked"), "unlocked");
    }

    #[test]
    fn test_dotted_hint_gives_switchable_branch() {
        assert_eq!(
            suggest_fix_branch("main", Some("v1..2")),
            Some("release/v1.2".to_string())
        );
        let name = suggest_fix_branch("dev", Some("cache.lock")).unwrap();
        assert_eq!(name, "feature/cache");
    }
}
