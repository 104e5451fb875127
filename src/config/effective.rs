//! Fully resolved, typed settings of one locale.

use serde::Serialize;

use crate::config::{ConfigKey, ConfigValue, FeedToggle, MenuItem, Pagination, ValueType};
use crate::core::{FeedKind, Locale};

/// One value per feed kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedTable<T> {
    pub all: T,
    pub category: T,
    pub translation: T,
    pub author_atom: T,
    pub author_rss: T,
}

impl<T> FeedTable<T> {
    pub const fn get(&self, kind: FeedKind) -> &T {
        match kind {
            FeedKind::All => &self.all,
            FeedKind::Category => &self.category,
            FeedKind::Translation => &self.translation,
            FeedKind::AuthorAtom => &self.author_atom,
            FeedKind::AuthorRss => &self.author_rss,
        }
    }

    pub fn get_mut(&mut self, kind: FeedKind) -> &mut T {
        match kind {
            FeedKind::All => &mut self.all,
            FeedKind::Category => &mut self.category,
            FeedKind::Translation => &mut self.translation,
            FeedKind::AuthorAtom => &mut self.author_atom,
            FeedKind::AuthorRss => &mut self.author_rss,
        }
    }

    /// Convert every entry, stopping at the first error.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<FeedTable<U>, E> {
        Ok(FeedTable {
            all: f(&self.all)?,
            category: f(&self.category)?,
            translation: f(&self.translation)?,
            author_atom: f(&self.author_atom)?,
            author_rss: f(&self.author_rss)?,
        })
    }
}

/// A value for every [`ConfigKey`].
///
/// `Settings::default()` is the schema's default table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub site_name: String,
    pub author: String,
    pub site_base_url: String,
    pub timezone: String,
    pub default_lang: String,
    pub output_subdir: String,
    pub article_url: String,
    pub article_save_as: String,
    pub page_url: String,
    pub page_save_as: String,
    pub index_save_as: String,
    pub pagination: Pagination,
    pub feed_enabled: FeedTable<FeedToggle>,
    pub feed_save_as: FeedTable<String>,
    pub static_paths: Vec<String>,
    pub menu_items: Vec<MenuItem>,
    pub display_categories_on_menu: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_name: "A Pelican Blog".into(),
            author: String::new(),
            site_base_url: String::new(),
            timezone: "UTC".into(),
            default_lang: "en".into(),
            output_subdir: String::new(),
            article_url: "{slug}.html".into(),
            article_save_as: "{slug}.html".into(),
            page_url: "pages/{slug}.html".into(),
            page_save_as: "pages/{slug}.html".into(),
            index_save_as: "index.html".into(),
            pagination: Pagination::Disabled,
            feed_enabled: FeedTable {
                all: FeedToggle::Enabled,
                category: FeedToggle::Enabled,
                translation: FeedToggle::Enabled,
                author_atom: FeedToggle::Enabled,
                author_rss: FeedToggle::Enabled,
            },
            feed_save_as: FeedTable {
                all: "feeds/all.atom.xml".into(),
                category: "feeds/{slug}.atom.xml".into(),
                translation: "feeds/all-{lang}.atom.xml".into(),
                author_atom: "feeds/author/{slug}.atom.xml".into(),
                author_rss: "feeds/author/{slug}.rss.xml".into(),
            },
            static_paths: vec!["images".into()],
            menu_items: Vec::new(),
            display_categories_on_menu: true,
        }
    }
}

impl Settings {
    /// Current value of `key`.
    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        match key {
            ConfigKey::PaginationSize => ConfigValue::Pagination(self.pagination),
            ConfigKey::FeedEnabled(kind) => ConfigValue::Toggle(*self.feed_enabled.get(kind)),
            ConfigKey::StaticPaths => ConfigValue::PathList(self.static_paths.clone()),
            ConfigKey::MenuItems => ConfigValue::MenuList(self.menu_items.clone()),
            ConfigKey::DisplayCategoriesOnMenu => {
                ConfigValue::Flag(self.display_categories_on_menu)
            }
            text => ConfigValue::Text(self.text(text).unwrap_or_default().to_string()),
        }
    }

    /// Replace the value of `key`.
    ///
    /// Returns the type of `value` when it is not the declared type of `key`.
    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) -> Result<(), ValueType> {
        let found = value.value_type();
        match (key, value) {
            (ConfigKey::PaginationSize, ConfigValue::Pagination(v)) => self.pagination = v,
            (ConfigKey::FeedEnabled(kind), ConfigValue::Toggle(v)) => {
                *self.feed_enabled.get_mut(kind) = v;
            }
            (ConfigKey::StaticPaths, ConfigValue::PathList(v)) => self.static_paths = v,
            (ConfigKey::MenuItems, ConfigValue::MenuList(v)) => self.menu_items = v,
            (ConfigKey::DisplayCategoriesOnMenu, ConfigValue::Flag(v)) => {
                self.display_categories_on_menu = v;
            }
            (key, ConfigValue::Text(v)) => *self.text_mut(key).ok_or(found)? = v,
            _ => return Err(found),
        }
        Ok(())
    }

    /// Text-typed value of `key`, `None` for keys of other types.
    pub fn text(&self, key: ConfigKey) -> Option<&str> {
        let value = match key {
            ConfigKey::SiteName => &self.site_name,
            ConfigKey::Author => &self.author,
            ConfigKey::SiteBaseUrl => &self.site_base_url,
            ConfigKey::Timezone => &self.timezone,
            ConfigKey::DefaultLang => &self.default_lang,
            ConfigKey::OutputSubdir => &self.output_subdir,
            ConfigKey::ArticleUrlTemplate => &self.article_url,
            ConfigKey::ArticleSaveAsTemplate => &self.article_save_as,
            ConfigKey::PageUrlTemplate => &self.page_url,
            ConfigKey::PageSaveAsTemplate => &self.page_save_as,
            ConfigKey::IndexSaveAsTemplate => &self.index_save_as,
            ConfigKey::FeedSaveAs(kind) => self.feed_save_as.get(kind),
            _ => return None,
        };
        Some(value)
    }

    pub(crate) fn text_mut(&mut self, key: ConfigKey) -> Option<&mut String> {
        let slot = match key {
            ConfigKey::SiteName => &mut self.site_name,
            ConfigKey::Author => &mut self.author,
            ConfigKey::SiteBaseUrl => &mut self.site_base_url,
            ConfigKey::Timezone => &mut self.timezone,
            ConfigKey::DefaultLang => &mut self.default_lang,
            ConfigKey::OutputSubdir => &mut self.output_subdir,
            ConfigKey::ArticleUrlTemplate => &mut self.article_url,
            ConfigKey::ArticleSaveAsTemplate => &mut self.article_save_as,
            ConfigKey::PageUrlTemplate => &mut self.page_url,
            ConfigKey::PageSaveAsTemplate => &mut self.page_save_as,
            ConfigKey::IndexSaveAsTemplate => &mut self.index_save_as,
            ConfigKey::FeedSaveAs(kind) => self.feed_save_as.get_mut(kind),
            _ => return None,
        };
        Some(slot)
    }
}

/// Effective configuration of one locale.
///
/// Produced only by the resolver; a change to the inputs produces a new
/// value rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    locale: Locale,
    settings: Settings,
}

impl EffectiveConfig {
    pub(crate) const fn new(locale: Locale, settings: Settings) -> Self {
        Self { locale, settings }
    }

    #[inline]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    #[inline]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Value of `key` for this locale.
    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        self.settings.get(key)
    }

    /// Language substituted for `{lang}`: the locale code, or
    /// `DEFAULT_LANG` for the default locale.
    pub fn lang(&self) -> &str {
        if self.locale.is_default() {
            &self.settings.default_lang
        } else {
            self.locale.as_str()
        }
    }

    #[inline]
    pub fn feed_enabled(&self, kind: FeedKind) -> bool {
        self.settings.feed_enabled.get(kind).is_enabled()
    }
}
