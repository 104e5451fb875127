//! Typed configuration values and their serde decoding from TOML.

use std::num::NonZeroUsize;
use std::path::{Component, Path};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigKey, ValueType, type_of};
use crate::core::Locale;

/// Index pagination setting.
///
/// Written as a positive page size or `"disabled"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawPagination")]
pub enum Pagination {
    /// One index page holding every article.
    #[default]
    Disabled,
    /// At most N articles per index page.
    PerPage(NonZeroUsize),
}

impl Pagination {
    /// Literal accepted for [`Pagination::Disabled`].
    pub const DISABLED: &'static str = "disabled";

    /// Number of index pages for `items` articles.
    ///
    /// Always at least one: an empty locale still gets its index page.
    pub fn page_count(self, items: usize) -> usize {
        match self {
            Self::Disabled => 1,
            Self::PerPage(size) => items.div_ceil(size.get()).max(1),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPagination {
    Size(i64),
    Keyword(String),
}

impl TryFrom<RawPagination> for Pagination {
    type Error = String;

    fn try_from(raw: RawPagination) -> Result<Self, Self::Error> {
        match raw {
            RawPagination::Size(n) => usize::try_from(n)
                .ok()
                .and_then(NonZeroUsize::new)
                .map(Self::PerPage)
                .ok_or_else(|| format!("page size must be positive, got {n}")),
            RawPagination::Keyword(s) if s == Self::DISABLED => Ok(Self::Disabled),
            RawPagination::Keyword(s) => Err(format!(
                "expected a positive integer or \"{}\", got {s:?}",
                Self::DISABLED
            )),
        }
    }
}

/// Explicit feed switch, written as a TOML boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "bool")]
pub enum FeedToggle {
    #[default]
    Enabled,
    Disabled,
}

impl FeedToggle {
    #[inline]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<bool> for FeedToggle {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// One navigation menu entry.
///
/// Written as `["Blog", "/blog"]` or `{ label = "Blog", path = "/blog" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMenuItem")]
pub struct MenuItem {
    pub label: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMenuItem {
    Pair(String, String),
    Entry(MenuEntry),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MenuEntry {
    label: String,
    path: String,
}

impl From<RawMenuItem> for MenuItem {
    fn from(raw: RawMenuItem) -> Self {
        match raw {
            RawMenuItem::Pair(label, path) | RawMenuItem::Entry(MenuEntry { label, path }) => {
                Self { label, path }
            }
        }
    }
}

/// A configuration value of one of the schema's [`ValueType`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Pagination(Pagination),
    Toggle(FeedToggle),
    Flag(bool),
    PathList(Vec<String>),
    MenuList(Vec<MenuItem>),
}

impl ConfigValue {
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Pagination(_) => ValueType::Pagination,
            Self::Toggle(_) => ValueType::Toggle,
            Self::Flag(_) => ValueType::Flag,
            Self::PathList(_) => ValueType::PathList,
            Self::MenuList(_) => ValueType::MenuList,
        }
    }

    /// Deserialize a raw TOML value as the declared type of `key`.
    ///
    /// A value of the wrong TOML type is a `TypeMismatch`; a value of the
    /// right type that the key still rejects is an `InvalidValue`.
    /// `locale` only labels errors.
    pub fn coerce(key: ConfigKey, raw: &toml::Value, locale: &Locale) -> Result<Self, ConfigError> {
        let expected = type_of(key);
        let mismatch = |found: &'static str| ConfigError::TypeMismatch {
            key,
            locale: locale.clone(),
            expected,
            found,
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key,
            locale: locale.clone(),
            message,
        };

        let accepted = match expected {
            ValueType::Text => raw.is_str(),
            ValueType::Pagination => raw.is_integer() || raw.is_str(),
            ValueType::Toggle | ValueType::Flag => raw.is_bool(),
            ValueType::PathList | ValueType::MenuList => raw.is_array(),
        };
        if !accepted {
            return Err(mismatch(raw.type_str()));
        }

        let value = match expected {
            ValueType::Text => decode(raw).map(Self::Text).map_err(invalid)?,
            ValueType::Pagination => decode(raw).map(Self::Pagination).map_err(invalid)?,
            ValueType::Toggle => decode(raw).map(Self::Toggle).map_err(invalid)?,
            ValueType::Flag => decode(raw).map(Self::Flag).map_err(invalid)?,
            ValueType::PathList => decode(raw)
                .map(Self::PathList)
                .map_err(|_| mismatch("array with non-string items"))?,
            ValueType::MenuList => decode(raw)
                .map(Self::MenuList)
                .map_err(|_| mismatch("array with malformed menu items"))?,
        };

        validate(key, &value).map_err(invalid)?;
        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(raw: &toml::Value) -> Result<T, String> {
    raw.clone()
        .try_into()
        .map_err(|err: toml::de::Error| err.message().to_string())
}

/// Key-specific checks on a well-typed value.
fn validate(key: ConfigKey, value: &ConfigValue) -> Result<(), String> {
    match (key, value) {
        (ConfigKey::SiteBaseUrl, ConfigValue::Text(url)) => validate_base_url(url),
        (ConfigKey::DefaultLang, ConfigValue::Text(lang)) => {
            if Locale::is_valid_code(lang) {
                Ok(())
            } else {
                Err(format!("{lang:?} is not a language code"))
            }
        }
        (ConfigKey::OutputSubdir, ConfigValue::Text(dir)) => {
            if dir.is_empty() {
                Ok(())
            } else {
                validate_relative(dir)
            }
        }
        (ConfigKey::StaticPaths, ConfigValue::PathList(paths)) => {
            paths.iter().try_for_each(|path| validate_relative(path))
        }
        _ => Ok(()),
    }
}

/// Relative base URLs (`""`, `/blog`) pass through; absolute ones must be
/// http(s) with a host.
fn validate_base_url(url: &str) -> Result<(), String> {
    if !url.contains("://") {
        return Ok(());
    }
    let parsed = url::Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "scheme '{}' not supported, must be http or https",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none() {
        return Err("URL must have a valid host".to_string());
    }
    Ok(())
}

/// Paths must stay inside the site: relative, no `..`.
fn validate_relative(path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if p.is_absolute() || path.starts_with('/') {
        return Err(format!("{path:?} must be a relative path"));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(format!("{path:?} must not contain `..`"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FeedKind;

    fn coerce(key: ConfigKey, raw: toml::Value) -> Result<ConfigValue, ConfigError> {
        ConfigValue::coerce(key, &raw, &Locale::new("de"))
    }

    #[test]
    fn test_page_count() {
        let ten = Pagination::PerPage(NonZeroUsize::new(10).unwrap());
        assert_eq!(ten.page_count(25), 3);
        assert_eq!(ten.page_count(20), 2);
        assert_eq!(ten.page_count(0), 1);
        assert_eq!(Pagination::Disabled.page_count(1000), 1);
    }

    #[test]
    fn test_coerce_pagination() {
        assert_eq!(
            coerce(ConfigKey::PaginationSize, toml::Value::Integer(10)).unwrap(),
            ConfigValue::Pagination(Pagination::PerPage(NonZeroUsize::new(10).unwrap()))
        );
        assert_eq!(
            coerce(ConfigKey::PaginationSize, "disabled".into()).unwrap(),
            ConfigValue::Pagination(Pagination::Disabled)
        );
        assert!(matches!(
            coerce(ConfigKey::PaginationSize, toml::Value::Integer(0)),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            coerce(ConfigKey::PaginationSize, "off".into()),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            coerce(ConfigKey::PaginationSize, toml::Value::Boolean(false)),
            Err(ConfigError::TypeMismatch { found: "boolean", .. })
        ));
    }

    #[test]
    fn test_coerce_toggle() {
        assert_eq!(
            coerce(ConfigKey::FeedEnabled(FeedKind::All), false.into()).unwrap(),
            ConfigValue::Toggle(FeedToggle::Disabled)
        );
        let err = coerce(ConfigKey::FeedEnabled(FeedKind::All), "none".into()).unwrap_err();
        match err {
            ConfigError::TypeMismatch { key, locale, found, .. } => {
                assert_eq!(key, ConfigKey::FeedEnabled(FeedKind::All));
                assert_eq!(locale.as_str(), "de");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_coerce_menu_items_both_forms() {
        let table: toml::Table = toml::from_str(
            r#"items = [["Blog", "/blog"], { label = "About", path = "/about.html" }]"#,
        )
        .unwrap();
        let raw = table.get("items").unwrap().clone();
        assert_eq!(
            coerce(ConfigKey::MenuItems, raw).unwrap(),
            ConfigValue::MenuList(vec![
                MenuItem::new("Blog", "/blog"),
                MenuItem::new("About", "/about.html"),
            ])
        );

        let bad = toml::Value::Array(vec![toml::Value::Array(vec!["Blog".into()])]);
        assert!(matches!(
            coerce(ConfigKey::MenuItems, bad),
            Err(ConfigError::TypeMismatch { .. })
        ));

        let extra: toml::Table =
            toml::from_str(r#"items = [{ label = "Blog", path = "/blog", icon = "x" }]"#).unwrap();
        assert!(matches!(
            coerce(ConfigKey::MenuItems, extra["items"].clone()),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_values_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            pagination: Pagination,
            toggle: FeedToggle,
            menu: Vec<MenuItem>,
        }

        let section: Section = toml::from_str(
            r#"
pagination = "disabled"
toggle = false
menu = [["Blog", "/blog"]]
"#,
        )
        .unwrap();
        assert_eq!(section.pagination, Pagination::Disabled);
        assert_eq!(section.toggle, FeedToggle::Disabled);
        assert_eq!(section.menu, vec![MenuItem::new("Blog", "/blog")]);

        let err = toml::from_str::<Section>("pagination = -3
toggle = true
menu = []")
            .err()
            .unwrap();
        assert!(err.to_string().contains("page size must be positive"), "{err}");
    }

    #[test]
    fn test_coerce_static_paths() {
        let raw = toml::Value::Array(vec!["images".into(), "pages/scripts".into()]);
        assert_eq!(
            coerce(ConfigKey::StaticPaths, raw).unwrap(),
            ConfigValue::PathList(vec!["images".into(), "pages/scripts".into()])
        );

        let escaping = toml::Value::Array(vec!["../secrets".into()]);
        assert!(matches!(
            coerce(ConfigKey::StaticPaths, escaping),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mixed = toml::Value::Array(vec!["images".into(), toml::Value::Integer(1)]);
        assert!(matches!(
            coerce(ConfigKey::StaticPaths, mixed),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(coerce(ConfigKey::SiteBaseUrl, "".into()).is_ok());
        assert!(coerce(ConfigKey::SiteBaseUrl, "/blog".into()).is_ok());
        assert!(coerce(ConfigKey::SiteBaseUrl, "https://example.com/de".into()).is_ok());
        assert!(matches!(
            coerce(ConfigKey::SiteBaseUrl, "ftp://example.com".into()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_default_lang_validation() {
        assert!(coerce(ConfigKey::DefaultLang, "en".into()).is_ok());
        assert!(coerce(ConfigKey::DefaultLang, "".into()).is_err());
    }
}
