//! Content item descriptors supplied by content discovery.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Locale;
use super::slug::{SlugMode, SlugProblem, check_slug, slugify};

/// Syndication feed variants, one `FEED_ENABLED` toggle each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedKind {
    /// Every article of the locale.
    All,
    /// Articles of one category (slug = category slug).
    Category,
    /// Every translation in one language.
    Translation,
    /// Articles of one author, Atom format.
    AuthorAtom,
    /// Articles of one author, RSS format.
    AuthorRss,
}

impl FeedKind {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Category,
        Self::Translation,
        Self::AuthorAtom,
        Self::AuthorRss,
    ];

    /// Name used as the key inside `[FEED_ENABLED]` / `[FEED_SAVE_AS]`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category => "category",
            Self::Translation => "translation",
            Self::AuthorAtom => "author-atom",
            Self::AuthorRss => "author-rss",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeedKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(())
    }
}

/// What a content item is, which decides the templates used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "feed")]
pub enum ContentKind {
    Article,
    Page,
    Index,
    Feed(FeedKind),
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => f.write_str("article"),
            Self::Page => f.write_str("page"),
            Self::Index => f.write_str("index"),
            Self::Feed(kind) => write!(f, "feed:{kind}"),
        }
    }
}

/// Rejected content item.
#[derive(Debug, Clone, Error)]
pub enum ItemError {
    #[error("invalid slug {slug:?} for {kind} in locale {locale}: {problem}")]
    InvalidSlug {
        slug: String,
        kind: ContentKind,
        locale: Locale,
        problem: SlugProblem,
    },
}

/// One discovered content item.
///
/// Two items are the same item when kind, slug, locale and source all
/// agree; only distinct items can collide on an output path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawContentItem")]
pub struct ContentItem {
    kind: ContentKind,
    slug: String,
    locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
}

/// Unchecked wire form of [`ContentItem`].
#[derive(Deserialize)]
struct RawContentItem {
    kind: ContentKind,
    slug: String,
    locale: Locale,
    #[serde(default)]
    source: Option<PathBuf>,
}

impl TryFrom<RawContentItem> for ContentItem {
    type Error = ItemError;

    fn try_from(raw: RawContentItem) -> Result<Self, Self::Error> {
        let item = Self::new(raw.kind, raw.slug, raw.locale)?;
        Ok(match raw.source {
            Some(source) => item.with_source(source),
            None => item,
        })
    }
}

impl ContentItem {
    /// Create an item, validating the slug.
    pub fn new(
        kind: ContentKind,
        slug: impl Into<String>,
        locale: impl Into<Locale>,
    ) -> Result<Self, ItemError> {
        let slug = slug.into();
        let locale = locale.into();
        if let Err(problem) = check_slug(&slug) {
            return Err(ItemError::InvalidSlug {
                slug,
                kind,
                locale,
                problem,
            });
        }
        Ok(Self {
            kind,
            slug,
            locale,
            source: None,
        })
    }

    /// Create an item whose slug is derived from `title`.
    pub fn from_title(
        kind: ContentKind,
        title: &str,
        locale: impl Into<Locale>,
        mode: SlugMode,
    ) -> Result<Self, ItemError> {
        Self::new(kind, slugify(title, mode), locale)
    }

    pub fn article(slug: impl Into<String>, locale: impl Into<Locale>) -> Result<Self, ItemError> {
        Self::new(ContentKind::Article, slug, locale)
    }

    pub fn page(slug: impl Into<String>, locale: impl Into<Locale>) -> Result<Self, ItemError> {
        Self::new(ContentKind::Page, slug, locale)
    }

    /// The locale's article index.
    pub fn index(locale: impl Into<Locale>) -> Self {
        Self {
            kind: ContentKind::Index,
            slug: "index".to_string(),
            locale: locale.into(),
            source: None,
        }
    }

    pub fn feed(
        kind: FeedKind,
        slug: impl Into<String>,
        locale: impl Into<Locale>,
    ) -> Result<Self, ItemError> {
        Self::new(ContentKind::Feed(kind), slug, locale)
    }

    /// Attach the source document this item was discovered from.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[inline]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    #[inline]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[inline]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    #[inline]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Display for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` ({})", self.kind, self.slug, self.locale)?;
        if let Some(source) = &self.source {
            write!(f, " from {}", source.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_kind_names_round_trip() {
        for kind in FeedKind::ALL {
            assert_eq!(kind.name().parse::<FeedKind>(), Ok(kind));
        }
        assert!("atom".parse::<FeedKind>().is_err());
    }

    #[test]
    fn test_invalid_slug_rejected() {
        let err = ContentItem::article("hello world", "de").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("hello world"));
        assert!(msg.contains("article"));
        assert!(msg.contains("de"));
    }

    #[test]
    fn test_source_distinguishes_items() {
        let a = ContentItem::article("hello", "").unwrap().with_source("content/a.md");
        let b = ContentItem::article("hello", "").unwrap().with_source("content/b.md");
        assert_ne!(a, b);
        assert_eq!(a.source(), Some(Path::new("content/a.md")));
    }

    #[test]
    fn test_from_title() {
        let item = ContentItem::from_title(ContentKind::Page, "Über uns", "de", SlugMode::Ascii)
            .unwrap();
        assert_eq!(item.slug(), "uber-uns");
        assert_eq!(item.locale().as_str(), "de");

        let safe = ContentItem::from_title(ContentKind::Page, "Über uns", "de", SlugMode::Safe)
            .unwrap();
        assert_eq!(safe.slug(), "über-uns");

        let err = ContentItem::from_title(ContentKind::Article, "?!", "", SlugMode::Ascii)
            .unwrap_err();
        assert!(matches!(
            err,
            ItemError::InvalidSlug { problem: SlugProblem::Empty, .. }
        ));
    }

    #[test]
    fn test_deserialize_validates_slug() {
        let empty = r#"{"kind":{"kind":"article"},"slug":"","locale":""}"#;
        assert!(serde_json::from_str::<ContentItem>(empty).is_err());

        let nested = r#"{"kind":{"kind":"article"},"slug":"a/b","locale":"de"}"#;
        let err = serde_json::from_str::<ContentItem>(nested).unwrap_err();
        assert!(err.to_string().contains("a/b"), "{err}");
    }

    #[test]
    fn test_deserialize_valid_item() {
        let json = r#"{"kind":{"kind":"feed","feed":"category"},"slug":"rust","locale":" de ","source":"content/rust.md"}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item,
            ContentItem::feed(FeedKind::Category, "rust", "de")
                .unwrap()
                .with_source("content/rust.md")
        );
        let back: ContentItem = serde_json::from_str(&serde_json::to_string(&item).unwrap()).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_display() {
        let item = ContentItem::feed(FeedKind::Category, "rust", "de").unwrap();
        assert_eq!(item.to_string(), "feed:category `rust` (de)");
        assert_eq!(ContentItem::index("").to_string(), "index `index` (<default>)");
    }
}
