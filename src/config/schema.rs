//! Recognized configuration keys, their types and defaults.
//!
//! The schema is a fixed table: [`ConfigKey::ALL`] enumerates every key,
//! [`type_of`] gives the value type the resolver validates against, and
//! [`default_for`] reads the process-wide default settings.
//!
//! # TOML names
//!
//! | Key                                | TOML                               |
//! |------------------------------------|------------------------------------|
//! | `SiteName`                         | `SITE_NAME`                        |
//! | `ArticleUrlTemplate`               | `ARTICLE_URL_TEMPLATE`             |
//! | `FeedEnabled(FeedKind::All)`       | `[FEED_ENABLED]` `all = ...`       |
//! | `FeedSaveAs(FeedKind::AuthorRss)`  | `[FEED_SAVE_AS]` `author-rss = ...`|

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::config::{ConfigError, ConfigValue, Settings};
use crate::core::{FeedKind, Locale};

/// Section holding one `FEED_ENABLED` toggle per feed kind.
pub const FEED_ENABLED_SECTION: &str = "FEED_ENABLED";
/// Section holding one `FEED_SAVE_AS` template per feed kind.
pub const FEED_SAVE_AS_SECTION: &str = "FEED_SAVE_AS";

/// Identifier of one configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    SiteName,
    Author,
    SiteBaseUrl,
    Timezone,
    DefaultLang,
    OutputSubdir,
    ArticleUrlTemplate,
    ArticleSaveAsTemplate,
    PageUrlTemplate,
    PageSaveAsTemplate,
    IndexSaveAsTemplate,
    PaginationSize,
    FeedEnabled(FeedKind),
    FeedSaveAs(FeedKind),
    StaticPaths,
    MenuItems,
    DisplayCategoriesOnMenu,
}

impl ConfigKey {
    pub const ALL: [Self; 25] = [
        Self::SiteName,
        Self::Author,
        Self::SiteBaseUrl,
        Self::Timezone,
        Self::DefaultLang,
        Self::OutputSubdir,
        Self::ArticleUrlTemplate,
        Self::ArticleSaveAsTemplate,
        Self::PageUrlTemplate,
        Self::PageSaveAsTemplate,
        Self::IndexSaveAsTemplate,
        Self::PaginationSize,
        Self::FeedEnabled(FeedKind::All),
        Self::FeedEnabled(FeedKind::Category),
        Self::FeedEnabled(FeedKind::Translation),
        Self::FeedEnabled(FeedKind::AuthorAtom),
        Self::FeedEnabled(FeedKind::AuthorRss),
        Self::FeedSaveAs(FeedKind::All),
        Self::FeedSaveAs(FeedKind::Category),
        Self::FeedSaveAs(FeedKind::Translation),
        Self::FeedSaveAs(FeedKind::AuthorAtom),
        Self::FeedSaveAs(FeedKind::AuthorRss),
        Self::StaticPaths,
        Self::MenuItems,
        Self::DisplayCategoriesOnMenu,
    ];

    /// Top-level TOML name, or the section name for per-feed keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SiteName => "SITE_NAME",
            Self::Author => "AUTHOR",
            Self::SiteBaseUrl => "SITE_BASE_URL",
            Self::Timezone => "TIMEZONE",
            Self::DefaultLang => "DEFAULT_LANG",
            Self::OutputSubdir => "OUTPUT_SUBDIR",
            Self::ArticleUrlTemplate => "ARTICLE_URL_TEMPLATE",
            Self::ArticleSaveAsTemplate => "ARTICLE_SAVE_AS_TEMPLATE",
            Self::PageUrlTemplate => "PAGE_URL_TEMPLATE",
            Self::PageSaveAsTemplate => "PAGE_SAVE_AS_TEMPLATE",
            Self::IndexSaveAsTemplate => "INDEX_SAVE_AS_TEMPLATE",
            Self::PaginationSize => "PAGINATION_SIZE",
            Self::FeedEnabled(_) => FEED_ENABLED_SECTION,
            Self::FeedSaveAs(_) => FEED_SAVE_AS_SECTION,
            Self::StaticPaths => "STATIC_PATHS",
            Self::MenuItems => "MENU_ITEMS",
            Self::DisplayCategoriesOnMenu => "DISPLAY_CATEGORIES_ON_MENU",
        }
    }

    /// Look up a top-level (non-sectioned) key by its TOML name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.feed_kind().is_none() && key.name() == name)
    }

    /// Look up a per-feed key inside `[FEED_ENABLED]` / `[FEED_SAVE_AS]`.
    pub fn parse_in(section: &str, name: &str) -> Option<Self> {
        let kind = name.parse::<FeedKind>().ok()?;
        match section {
            FEED_ENABLED_SECTION => Some(Self::FeedEnabled(kind)),
            FEED_SAVE_AS_SECTION => Some(Self::FeedSaveAs(kind)),
            _ => None,
        }
    }

    /// Whether `name` is a section of per-feed keys rather than a key.
    pub fn is_section(name: &str) -> bool {
        matches!(name, FEED_ENABLED_SECTION | FEED_SAVE_AS_SECTION)
    }

    #[inline]
    pub const fn feed_kind(self) -> Option<FeedKind> {
        match self {
            Self::FeedEnabled(kind) | Self::FeedSaveAs(kind) => Some(kind),
            _ => None,
        }
    }

    /// Closest recognized key for a misspelled name.
    ///
    /// Compares with `_` and `.` stripped, so Pelican spellings like
    /// `MENUITEMS` or `ARTICLE_URL` still find their key.
    pub fn suggest(name: &str) -> Option<Self> {
        fn squash(s: &str) -> String {
            s.chars()
                .filter(|c| !matches!(c, '_' | '.' | '-'))
                .map(|c| c.to_ascii_uppercase())
                .collect()
        }

        let wanted = squash(name);
        if wanted.is_empty() {
            return None;
        }
        let keyed: Vec<_> = Self::ALL
            .into_iter()
            .map(|key| (key, squash(&key.to_string())))
            .collect();

        keyed
            .iter()
            .find(|(_, squashed)| *squashed == wanted)
            .or_else(|| keyed.iter().find(|(_, squashed)| squashed.starts_with(&wanted)))
            .map(|(key, _)| *key)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feed_kind() {
            Some(kind) => write!(f, "{}.{}", self.name(), kind),
            None => f.write_str(self.name()),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    /// Parse a key from its display form (`SITE_NAME`, `FEED_ENABLED.all`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.split_once('.') {
            Some((section, name)) => Self::parse_in(section, name),
            None => Self::parse(s),
        };
        parsed.ok_or_else(|| ConfigError::UnknownKey {
            name: s.to_string(),
            locale: Locale::default(),
        })
    }
}

// ============================================================================
// value types
// ============================================================================

/// Declared type of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Free text, including URL/path templates.
    Text,
    /// Positive integer or `"disabled"`.
    Pagination,
    /// Feed switch (`true` / `false`).
    Toggle,
    /// Plain boolean.
    Flag,
    /// Ordered relative directories.
    PathList,
    /// Ordered `(label, path)` pairs.
    MenuList,
}

impl ValueType {
    /// Short name, in the vocabulary of `toml::Value::type_str`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Pagination => "pagination",
            Self::Toggle => "toggle",
            Self::Flag => "boolean",
            Self::PathList => "array",
            Self::MenuList => "menu",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "string",
            Self::Pagination => "positive integer or \"disabled\"",
            Self::Toggle | Self::Flag => "boolean",
            Self::PathList => "array of strings",
            Self::MenuList => "array of (label, path) pairs",
        })
    }
}

/// Declared type of `key`.
pub const fn type_of(key: ConfigKey) -> ValueType {
    match key {
        ConfigKey::SiteName
        | ConfigKey::Author
        | ConfigKey::SiteBaseUrl
        | ConfigKey::Timezone
        | ConfigKey::DefaultLang
        | ConfigKey::OutputSubdir
        | ConfigKey::ArticleUrlTemplate
        | ConfigKey::ArticleSaveAsTemplate
        | ConfigKey::PageUrlTemplate
        | ConfigKey::PageSaveAsTemplate
        | ConfigKey::IndexSaveAsTemplate
        | ConfigKey::FeedSaveAs(_) => ValueType::Text,
        ConfigKey::PaginationSize => ValueType::Pagination,
        ConfigKey::FeedEnabled(_) => ValueType::Toggle,
        ConfigKey::StaticPaths => ValueType::PathList,
        ConfigKey::MenuItems => ValueType::MenuList,
        ConfigKey::DisplayCategoriesOnMenu => ValueType::Flag,
    }
}

// ============================================================================
// defaults
// ============================================================================

static DEFAULTS: LazyLock<Settings> = LazyLock::new(Settings::default);

/// Settings with every key at its schema default.
#[inline]
pub fn defaults() -> &'static Settings {
    &DEFAULTS
}

/// Default value of `key`.
pub fn default_for(key: ConfigKey) -> ConfigValue {
    DEFAULTS.get(key)
}

/// Default value of the key named `name` (display form).
pub fn default_for_name(name: &str) -> Result<ConfigValue, ConfigError> {
    name.parse().map(default_for)
}
