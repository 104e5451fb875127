//! Base configuration and per-locale override maps.
//!
//! Both are built from TOML tables whose keys are checked against the
//! schema up front. Base values are also type-checked on load; override
//! values stay raw until the resolver coerces them for their locale.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ConfigError, ConfigKey, ConfigValue};
use crate::core::Locale;

/// Walk a TOML table and map every entry to a schema key.
///
/// `[FEED_ENABLED]` / `[FEED_SAVE_AS]` sub-tables expand to one key per
/// feed kind.
fn for_each_key(
    table: &toml::Table,
    locale: &Locale,
    mut f: impl FnMut(ConfigKey, &toml::Value) -> Result<(), ConfigError>,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        if ConfigKey::is_section(name) {
            let section = value.as_table().ok_or_else(|| ConfigError::ExpectedTable {
                name: name.clone(),
                locale: locale.clone(),
            })?;
            for (kind, value) in section {
                let key = ConfigKey::parse_in(name, kind).ok_or_else(|| ConfigError::UnknownKey {
                    name: format!("{name}.{kind}"),
                    locale: locale.clone(),
                })?;
                f(key, value)?;
            }
        } else {
            let key = ConfigKey::parse(name).ok_or_else(|| ConfigError::UnknownKey {
                name: name.clone(),
                locale: locale.clone(),
            })?;
            f(key, value)?;
        }
    }
    Ok(())
}

// ============================================================================
// BaseConfig
// ============================================================================

/// Site-wide configuration: the explicitly set keys, already typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseConfig {
    entries: BTreeMap<ConfigKey, ConfigValue>,
}

impl BaseConfig {
    /// Build from the top-level table of a config file (without `locales`).
    pub fn from_table(table: &toml::Table) -> Result<Self, ConfigError> {
        let locale = Locale::default();
        let mut entries = BTreeMap::new();
        for_each_key(table, &locale, |key, raw| {
            entries.insert(key, ConfigValue::coerce(key, raw, &locale)?);
            Ok(())
        })?;
        Ok(Self { entries })
    }

    /// Build from already typed values.
    pub fn from_values(
        values: impl IntoIterator<Item = (ConfigKey, ConfigValue)>,
    ) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (key, value) in values {
            let expected = crate::config::type_of(key);
            if value.value_type() != expected {
                return Err(ConfigError::TypeMismatch {
                    key,
                    locale: Locale::default(),
                    expected,
                    found: value.value_type().name(),
                });
            }
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    #[inline]
    pub fn get(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.entries.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigKey, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// LocaleOverride
// ============================================================================

/// Partial configuration taking precedence over the base for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleOverride {
    entries: BTreeMap<ConfigKey, toml::Value>,
}

/// Returned by [`LocaleOverrideStore::get`] for unregistered locales.
static EMPTY_OVERRIDE: LocaleOverride = LocaleOverride::new();

impl LocaleOverride {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build from a `[locales.<code>]` table; every key must be known.
    pub fn from_table(locale: &Locale, table: &toml::Table) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for_each_key(table, locale, |key, raw| {
            entries.insert(key, raw.clone());
            Ok(())
        })?;
        Ok(Self { entries })
    }

    /// Set one raw value.
    pub fn with(mut self, key: ConfigKey, raw: impl Into<toml::Value>) -> Self {
        self.entries.insert(key, raw.into());
        self
    }

    #[inline]
    pub fn get(&self, key: ConfigKey) -> Option<&toml::Value> {
        self.entries.get(&key)
    }

    #[inline]
    pub fn contains(&self, key: ConfigKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigKey, &toml::Value)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// LocaleOverrideStore
// ============================================================================

/// Override maps of every registered locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleOverrideStore {
    overrides: BTreeMap<Locale, LocaleOverride>,
}

impl LocaleOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the override map of `locale`.
    ///
    /// The default locale cannot be registered: it is the base itself.
    pub fn register(
        &mut self,
        locale: impl Into<Locale>,
        overrides: LocaleOverride,
    ) -> Result<(), ConfigError> {
        let locale = locale.into();
        if !Locale::is_valid_code(locale.as_str()) {
            return Err(ConfigError::InvalidLocale(locale.as_str().to_string()));
        }
        if self.overrides.contains_key(&locale) {
            return Err(ConfigError::DuplicateLocale(locale));
        }
        self.overrides.insert(locale, overrides);
        Ok(())
    }

    /// Override map of `locale`; empty if it was never registered.
    pub fn get(&self, locale: &Locale) -> &LocaleOverride {
        self.overrides.get(locale).unwrap_or(&EMPTY_OVERRIDE)
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.overrides.contains_key(locale)
    }

    /// Registered locale codes.
    pub fn locales(&self) -> BTreeSet<Locale> {
        self.overrides.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
