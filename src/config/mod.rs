//! Site configuration: schema, base values, locale overrides and resolution.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── schema       # ConfigKey, ValueType, defaults
//! ├── value        # ConfigValue + TOML coercion
//! ├── overrides    # BaseConfig, LocaleOverride, LocaleOverrideStore
//! ├── effective    # Settings, EffectiveConfig
//! ├── resolve      # ConfigResolver (two-level merge)
//! ├── types/       # ConfigError, Diagnostic
//! └── mod.rs       # ConfigFile loader (this file)
//! ```
//!
//! # File format
//!
//! ```toml
//! SITE_NAME = "Andreas Dewes"
//! ARTICLE_URL_TEMPLATE = "blog/{slug}.html"
//! PAGINATION_SIZE = 10                 # or "disabled"
//! MENU_ITEMS = [["Blog", "/blog"]]
//!
//! [FEED_ENABLED]
//! all = false
//!
//! [locales.de]
//! SITE_NAME = "Andreas Dewes"
//! OUTPUT_SUBDIR = "de"
//! ```

mod effective;
mod overrides;
mod resolve;
mod schema;
pub mod types;
mod value;

pub use effective::{EffectiveConfig, FeedTable, Settings};
pub use overrides::{BaseConfig, LocaleOverride, LocaleOverrideStore};
pub use resolve::{ConfigResolver, SUBSITE_KEYS, resolve, resolve_all};
pub use schema::{
    ConfigKey, FEED_ENABLED_SECTION, FEED_SAVE_AS_SECTION, ValueType, default_for,
    default_for_name, defaults, type_of,
};
pub use types::{ConfigError, Diagnostic};
pub use value::{ConfigValue, FeedToggle, MenuItem, Pagination};

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Locale;
use crate::log;

/// Table holding one override table per locale.
pub const LOCALES_TABLE: &str = "locales";

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

// ============================================================================
// ConfigFile
// ============================================================================

/// A loaded configuration file: the base plus every locale's overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Path the file was read from (`None` when parsed from a string).
    pub path: Option<PathBuf>,

    /// Site-wide values.
    pub base: BaseConfig,

    /// `[locales.<code>]` tables.
    pub overrides: LocaleOverrideStore,
}

impl ConfigFile {
    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_table(table)
    }

    /// Load configuration from a file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::parse(&content)?;
        config.path = Some(path.to_path_buf());

        log!("config"; "loaded {} ({} locale table{})",
            path.display(), config.overrides.len(), crate::utils::plural_s(config.overrides.len()));
        Ok(config)
    }

    /// Split a parsed table into the base and the locale overrides.
    pub fn from_table(mut table: toml::Table) -> Result<Self, ConfigError> {
        let locales = match table.remove(LOCALES_TABLE) {
            Some(toml::Value::Table(locales)) => locales,
            Some(_) => {
                return Err(ConfigError::ExpectedTable {
                    name: LOCALES_TABLE.to_string(),
                    locale: Locale::default(),
                });
            }
            None => toml::Table::new(),
        };

        let base = BaseConfig::from_table(&table)?;

        let mut overrides = LocaleOverrideStore::new();
        for (code, value) in locales {
            let locale = Locale::new(&code);
            let Some(entries) = value.as_table() else {
                return Err(ConfigError::ExpectedTable {
                    name: format!("{LOCALES_TABLE}.{code}"),
                    locale,
                });
            };
            overrides.register(locale.clone(), LocaleOverride::from_table(&locale, entries)?)?;
        }

        Ok(Self {
            path: None,
            base,
            overrides,
        })
    }

    /// Resolver over this file's base and overrides.
    pub fn resolver(&self) -> ConfigResolver<'_> {
        ConfigResolver::new(&self.base, &self.overrides)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config fixture, panicking on any error.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ConfigFile {
    match ConfigFile::parse(content) {
        Ok(config) => config,
        Err(err) => panic!("test config is invalid: {err}"),
    }
}

/// A two-locale blog whose `de` subsite only renames the site.
#[cfg(test)]
pub const PELICAN_FIXTURE: &str = r#"
AUTHOR = "Andreas Dewes"
SITE_NAME = "Andreas Dewes"
SITE_BASE_URL = ""
TIMEZONE = "Europe/Paris"
DISPLAY_CATEGORIES_ON_MENU = false
MENU_ITEMS = [["Blog", "/blog"]]
ARTICLE_URL_TEMPLATE = "blog/{slug}.html"
ARTICLE_SAVE_AS_TEMPLATE = "blog/{slug}.html"
PAGE_URL_TEMPLATE = "{slug}.html"
PAGE_SAVE_AS_TEMPLATE = "{slug}.html"
INDEX_SAVE_AS_TEMPLATE = "blog/index.html"
STATIC_PATHS = ["images", "scripts", "downloads", "pages/scripts"]
PAGINATION_SIZE = 10

[FEED_ENABLED]
all = false
category = false
translation = false
author-atom = false
author-rss = false

[locales.de]
SITE_NAME = "Andreas Dewes"
"#;

// ============================================================================
// tests
// ============================================================================
