//! Mapping of arbitrary source paths to filesystem-safe artifact paths.
//!
//! Source paths come from the instrumentation engine and may be absolute or
//! carry relative-traversal prefixes. Stripping the leading run of `.`, `/`
//! and `\` keeps every artifact under the output directory and away from
//! the index page.

use std::sync::LazyLock;

use regex::Regex;

/// Leading path separators and traversal dots.
static LEADING_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[./\\]+").unwrap());

/// Strip the leading run of `.`, `/` and `\` from a source path.
///
/// Idempotent and pure. Interior `..` segments are left alone and two
/// inputs differing only in a stripped prefix collide (`./a/b` and `a/b`
/// both yield `a/b`); the caller must not rely on injectivity across such
/// inputs.
#[must_use]
pub fn sanitize(source_path: &str) -> &str {
    match LEADING_SEPARATORS.find(source_path) {
        Some(m) => &source_path[m.end()..],
        None => source_path,
    }
}

/// The artifact path for a source file, relative to the output directory:
/// the sanitized path with an `.html` suffix so arbitrary same-named inputs
/// can't shadow the index page.
#[must_use]
pub fn artifact_path(source_path: &str) -> String {
    format!("{}.html", sanitize(source_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_path() {
        assert_eq!(sanitize("src/main.rs"), "src/main.rs");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize("../../etc/evil"), "etc/evil");
        assert_eq!(sanitize("./src/lib.rs"), "src/lib.rs");
        assert_eq!(sanitize("/abs/path.rs"), "abs/path.rs");
    }

    #[test]
    fn test_sanitize_strips_backslashes() {
        assert_eq!(sanitize("..\\..\\src\\main.cs"), "src\\main.cs");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("../a/b.rs");
        assert_eq!(sanitize(once), once);
    }

    #[test]
    fn test_sanitize_mixed_prefix() {
        assert_eq!(sanitize(".././\\a"), "a");
    }

    #[test]
    fn test_artifact_path_appends_suffix() {
        assert_eq!(artifact_path("../../etc/evil"), "etc/evil.html");
        assert_eq!(artifact_path("src/main.rs"), "src/main.rs.html");
    }
}
