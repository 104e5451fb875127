//! Slug validation and generation.
//!
//! A slug is the URL-safe identifier substituted for `{slug}` in path
//! templates. Discovery usually supplies one; [`slugify`] derives one from a
//! title when it does not.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters allowed in a slug: letters and digits of any script, plus
/// the RFC 3986 unreserved punctuation `-`, `.`, `_`, `~`.
static RE_URL_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}._~-]+$").unwrap());

/// Why a slug was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugProblem {
    Empty,
    DotSegment,
    UnsafeChar(char),
}

impl std::fmt::Display for SlugProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("slug is empty"),
            Self::DotSegment => f.write_str("slug is a relative path segment"),
            Self::UnsafeChar(c) => write!(f, "character {c:?} is not URL-safe"),
        }
    }
}

/// Check that `slug` can be substituted into a path template verbatim.
pub fn check_slug(slug: &str) -> Result<(), SlugProblem> {
    if slug.is_empty() {
        return Err(SlugProblem::Empty);
    }
    if slug == "." || slug == ".." {
        return Err(SlugProblem::DotSegment);
    }
    if RE_URL_SAFE.is_match(slug) {
        return Ok(());
    }
    let bad = slug
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '.' | '_' | '~' | '-')))
        .unwrap_or(' ');
    Err(SlugProblem::UnsafeChar(bad))
}

/// Slug generation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Transliterate Unicode to ASCII (default).
    #[default]
    Ascii,
    /// Keep Unicode letters, drop everything else that is not URL-safe.
    Safe,
}

/// Derive a slug from a title.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-`, and trims separators from both ends.
///
/// ```ignore
/// assert_eq!(slugify("Hello, World!", SlugMode::Ascii), "hello-world");
/// assert_eq!(slugify("Über uns", SlugMode::Ascii), "uber-uns");
/// assert_eq!(slugify("Über uns", SlugMode::Safe), "über-uns");
/// ```
pub fn slugify(title: &str, mode: SlugMode) -> String {
    let source = match mode {
        SlugMode::Ascii => deunicode::deunicode(title),
        SlugMode::Safe => title.to_string(),
    };

    let mut slug = String::with_capacity(source.len());
    let mut pending_sep = false;
    for c in source.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_slug_accepts_url_safe() {
        assert!(check_slug("hello").is_ok());
        assert!(check_slug("hello-world_2.0~x").is_ok());
        assert!(check_slug("über").is_ok());
    }

    #[test]
    fn test_check_slug_rejects() {
        assert_eq!(check_slug(""), Err(SlugProblem::Empty));
        assert_eq!(check_slug(".."), Err(SlugProblem::DotSegment));
        assert_eq!(check_slug("a/b"), Err(SlugProblem::UnsafeChar('/')));
        assert_eq!(check_slug("a b"), Err(SlugProblem::UnsafeChar(' ')));
        assert_eq!(check_slug("a?b"), Err(SlugProblem::UnsafeChar('?')));
    }

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Hello, World!", SlugMode::Ascii), "hello-world");
        assert_eq!(slugify("Über uns", SlugMode::Ascii), "uber-uns");
        assert_eq!(slugify("  --Rust  2024-- ", SlugMode::Ascii), "rust-2024");
    }

    #[test]
    fn test_slugify_safe_keeps_unicode() {
        assert_eq!(slugify("Über uns", SlugMode::Safe), "über-uns");
    }

    #[test]
    fn test_slugify_output_is_valid_slug() {
        let slug = slugify("Was ist los? (Teil 2)", SlugMode::Ascii);
        assert_eq!(slug, "was-ist-los-teil-2");
        assert!(check_slug(&slug).is_ok());
    }
}
