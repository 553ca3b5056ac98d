//! Logical path normalization, tokenizing, and canonicalization.
//!
//! Game data refers to assets by logical paths whose casing, separators, and
//! `.`/`..` segments cannot be trusted. This module turns such paths into a
//! canonical, comparison-safe form:
//!
//! - [`normalize`] produces the case-folded key used by every lookup table.
//! - [`split`] tokenizes a path on both the universal `/` separator and a
//!   per-project escape symbol (a historical alternate separator some games
//!   embed inside asset names).
//! - [`canonicalize`] resolves `.` and `..` segments against a caller-supplied
//!   depth budget, clamping anything that would climb above the sandboxed
//!   root instead of letting it escape.
//!
//! All functions here are pure; no filesystem access happens in this module.

use tracing::debug;

/// Per-project path conventions.
///
/// The only configurable piece is the *escape symbol*: an alternate separator
/// (usually `\`) that some game assets use instead of `/`. Games authored
/// with a different system locale may carry a different symbol, so it travels
/// with the session rather than being a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRules {
    escape: String,
}

impl PathRules {
    /// Create rules with the given escape symbol. An empty symbol disables
    /// escape handling entirely.
    pub fn new(escape_symbol: impl Into<String>) -> Self {
        Self {
            escape: escape_symbol.into(),
        }
    }

    /// The active escape symbol (may be empty).
    pub fn escape_symbol(&self) -> &str {
        &self.escape
    }
}

impl Default for PathRules {
    /// The backslash is by far the most common alternate separator.
    fn default() -> Self {
        Self::new("\\")
    }
}

/// Produce the canonical comparison key for a name or path.
///
/// Keys are case-folded with Unicode simple lowercasing; two names that
/// differ only by case map to the same key. Separators are left untouched.
///
/// # Examples
///
/// ```
/// use rtpfinder::path::normalize;
///
/// assert_eq!(normalize("CharSet"), "charset");
/// assert_eq!(normalize("Picture/HERO"), "picture/hero");
/// ```
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Join two logical path fragments with the universal separator.
///
/// An empty `dir` yields `name` unchanged, so the function can fold a
/// segment list without producing a leading separator.
///
/// # Examples
///
/// ```
/// use rtpfinder::path::join;
///
/// assert_eq!(join("Picture", "Hero"), "Picture/Hero");
/// assert_eq!(join("", "Hero"), "Hero");
/// ```
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Tokenize a path into segments.
///
/// Both `/` and the rules' escape symbol act as delimiters. Consecutive or
/// trailing delimiters produce no empty segments.
///
/// # Examples
///
/// ```
/// use rtpfinder::path::{split, PathRules};
///
/// let rules = PathRules::default();
/// assert_eq!(split("Music/Town", &rules), vec!["Music", "Town"]);
/// assert_eq!(split("Music\\Town", &rules), vec!["Music", "Town"]);
/// assert_eq!(split("a//b/", &rules), vec!["a", "b"]);
/// ```
pub fn split(path: &str, rules: &PathRules) -> Vec<String> {
    let unified = if rules.escape.is_empty() || rules.escape == "/" {
        path.to_string()
    } else {
        path.replace(&rules.escape, "/")
    };

    unified
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `.` and `..` segments in a logical path.
///
/// `initial_depth` is the number of `..` segments the caller is willing to
/// absorb before the path would climb above the sandboxed root. Excess `..`
/// segments are dropped with a debug log instead of escaping: a hostile or
/// malformed asset name must never address files outside the project.
///
/// The result always uses `/` as its separator and never starts with `..`.
///
/// # Examples
///
/// ```
/// use rtpfinder::path::{canonicalize, PathRules};
///
/// let rules = PathRules::default();
/// assert_eq!(canonicalize("a/./b/../c", 0, &rules), "a/c");
/// assert_eq!(canonicalize("../../Picture/Hero", 1, &rules), "Picture/Hero");
/// ```
pub fn canonicalize(path: &str, initial_depth: u32, rules: &PathRules) -> String {
    let mut budget = initial_depth;
    let mut resolved: Vec<String> = Vec::new();

    for segment in split(path, rules) {
        if segment == ".." {
            if !resolved.is_empty() {
                resolved.pop();
            } else if budget > 0 {
                budget -= 1;
            } else {
                debug!(path, "path traversal points outside the sandboxed root");
            }
        } else if segment == "." {
            // No-op segment.
        } else {
            resolved.push(segment);
        }
    }

    resolved.join("/")
}

/// Strip a root prefix from a physical path string.
///
/// Returns `path` unchanged when it does not start with `root`; otherwise the
/// remainder with any leading separator (either convention) removed.
///
/// # Examples
///
/// ```
/// use rtpfinder::path::path_inside;
///
/// assert_eq!(path_inside("/games/quest", "/games/quest/Music/Town.ogg"), "Music/Town.ogg");
/// assert_eq!(path_inside("/games/quest", "/elsewhere/file"), "/elsewhere/file");
/// ```
pub fn path_inside(root: &str, path: &str) -> String {
    match path.strip_prefix(root) {
        None => path.to_string(),
        Some(rest) => rest
            .strip_prefix('/')
            .or_else(|| rest.strip_prefix('\\'))
            .unwrap_or(rest)
            .to_string(),
    }
}
