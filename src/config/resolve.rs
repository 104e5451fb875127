//! Two-level merge of base configuration and locale overrides.
//!
//! ```text
//! EffectiveConfig[L][K] = LocaleOverride[L][K]   if present
//!                       | BaseConfig[K]          if present
//!                       | default_for(K)
//! ```
//!
//! Resolution of a locale reads only that locale's override map.
//!
//! A registered locale is a subsite of the main site: unless its override
//! sets them, [`SUBSITE_KEYS`] inherit the base value with the locale code
//! appended (`""` becomes `de`, `https://example.org` becomes
//! `https://example.org/de`).

use std::collections::BTreeMap;

use crate::config::{
    BaseConfig, ConfigError, ConfigKey, ConfigValue, EffectiveConfig, LocaleOverrideStore,
    Settings, defaults, type_of,
};
use crate::core::Locale;
use crate::debug;

/// Keys a registered locale nests under its own code.
pub const SUBSITE_KEYS: [ConfigKey; 2] = [ConfigKey::OutputSubdir, ConfigKey::SiteBaseUrl];

/// Resolves effective configurations from one base and one override store.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    base: &'a BaseConfig,
    store: &'a LocaleOverrideStore,
}

impl<'a> ConfigResolver<'a> {
    pub const fn new(base: &'a BaseConfig, store: &'a LocaleOverrideStore) -> Self {
        Self { base, store }
    }

    /// Effective configuration of `locale`.
    ///
    /// Unregistered locales resolve to the base configuration.
    pub fn resolve(&self, locale: &Locale) -> Result<EffectiveConfig, ConfigError> {
        resolve(self.base, self.store, locale)
    }

    /// Effective configuration of the default locale and every registered one.
    pub fn resolve_all(&self) -> Result<BTreeMap<Locale, EffectiveConfig>, ConfigError> {
        resolve_all(self.base, self.store)
    }
}

/// Effective configuration of `locale`.
pub fn resolve(
    base: &BaseConfig,
    store: &LocaleOverrideStore,
    locale: &Locale,
) -> Result<EffectiveConfig, ConfigError> {
    let mut settings = defaults().clone();

    for (key, value) in base.iter() {
        apply(&mut settings, key, value.clone(), &Locale::default())?;
    }

    let overrides = store.get(locale);
    if !locale.is_default() && store.contains(locale) {
        for key in SUBSITE_KEYS.into_iter().filter(|&key| !overrides.contains(key)) {
            nest_under(&mut settings, key, locale);
        }
    }
    for (key, raw) in overrides.iter() {
        let value = ConfigValue::coerce(key, raw, locale)?;
        apply(&mut settings, key, value, locale)?;
    }

    debug!("resolve"; "{}: {} base key(s), {} override(s)", locale, base.len(), overrides.len());
    Ok(EffectiveConfig::new(locale.clone(), settings))
}

/// Effective configuration of the default locale and every registered one.
pub fn resolve_all(
    base: &BaseConfig,
    store: &LocaleOverrideStore,
) -> Result<BTreeMap<Locale, EffectiveConfig>, ConfigError> {
    std::iter::once(Locale::default())
        .chain(store.locales())
        .map(|locale| resolve(base, store, &locale).map(|config| (locale, config)))
        .collect()
}

/// Append the locale code to an inherited subdir or base URL.
fn nest_under(settings: &mut Settings, key: ConfigKey, locale: &Locale) {
    let Some(value) = settings.text_mut(key) else {
        return;
    };
    let parent = value.trim_end_matches('/');
    *value = match key {
        ConfigKey::OutputSubdir if parent.is_empty() => locale.as_str().to_string(),
        _ => format!("{parent}/{}", locale.as_str()),
    };
}

fn apply(
    settings: &mut Settings,
    key: ConfigKey,
    value: ConfigValue,
    locale: &Locale,
) -> Result<(), ConfigError> {
    settings
        .set(key, value)
        .map_err(|found| ConfigError::TypeMismatch {
            key,
            locale: locale.clone(),
            expected: type_of(key),
            found: found.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedToggle, LocaleOverride, Pagination, default_for, test_parse_config};
    use crate::core::FeedKind;
    use std::num::NonZeroUsize;

    const TWO_LOCALES: &str = r#"
SITE_NAME = "Andreas Dewes"
AUTHOR = "Andreas Dewes"
TIMEZONE = "Europe/Paris"
ARTICLE_URL_TEMPLATE = "articles/{slug}.html"
ARTICLE_SAVE_AS_TEMPLATE = "articles/{slug}.html"
PAGINATION_SIZE = 10

[FEED_ENABLED]
all = false
category = false

[locales.de]
SITE_NAME = "Andreas Dewes (de)"
ARTICLE_URL_TEMPLATE = "artikel/{slug}.html"

[locales.de.FEED_ENABLED]
all = true
"#;

    #[test]
    fn test_precedence_for_every_key() {
        let file = test_parse_config(TWO_LOCALES);
        let resolver = ConfigResolver::new(&file.base, &file.overrides);

        for (locale, config) in resolver.resolve_all().unwrap() {
            let overrides = file.overrides.get(&locale);
            for key in ConfigKey::ALL {
                let nested = !locale.is_default() && !overrides.contains(key);
                if nested && SUBSITE_KEYS.contains(&key) {
                    continue;
                }
                let expected = match overrides.get(key) {
                    Some(raw) => ConfigValue::coerce(key, raw, &locale).unwrap(),
                    None => match file.base.get(key) {
                        Some(value) => value.clone(),
                        None => default_for(key),
                    },
                };
                assert_eq!(config.get(key), expected, "{locale} {key}");
            }
        }
    }

    #[test]
    fn test_override_beats_base_beats_default() {
        let file = test_parse_config(TWO_LOCALES);
        let de = resolve(&file.base, &file.overrides, &Locale::new("de")).unwrap();

        assert_eq!(de.settings().site_name, "Andreas Dewes (de)");
        assert_eq!(de.settings().article_url, "artikel/{slug}.html");
        // base
        assert_eq!(de.settings().article_save_as, "articles/{slug}.html");
        assert_eq!(de.settings().timezone, "Europe/Paris");
        // default
        assert_eq!(de.settings().page_url, "pages/{slug}.html");

        assert_eq!(*de.settings().feed_enabled.get(FeedKind::All), FeedToggle::Enabled);
        assert_eq!(
            *de.settings().feed_enabled.get(FeedKind::Category),
            FeedToggle::Disabled
        );
        assert_eq!(
            de.settings().pagination,
            Pagination::PerPage(NonZeroUsize::new(10).unwrap())
        );
    }

    #[test]
    fn test_registering_locale_does_not_change_default_locale() {
        let file = test_parse_config(TWO_LOCALES);
        let before = resolve(&file.base, &LocaleOverrideStore::new(), &Locale::default()).unwrap();

        let mut store = file.overrides.clone();
        store
            .register(
                "fr",
                LocaleOverride::new()
                    .with(ConfigKey::SiteName, "Site")
                    .with(ConfigKey::PaginationSize, 3i64),
            )
            .unwrap();

        let after = resolve(&file.base, &store, &Locale::default()).unwrap();
        assert_eq!(before, after);

        let de_before = resolve(&file.base, &file.overrides, &Locale::new("de")).unwrap();
        let de_after = resolve(&file.base, &store, &Locale::new("de")).unwrap();
        assert_eq!(de_before, de_after);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let file = test_parse_config(TWO_LOCALES);
        let resolver = ConfigResolver::new(&file.base, &file.overrides);
        let de = Locale::new("de");
        assert_eq!(resolver.resolve(&de).unwrap(), resolver.resolve(&de).unwrap());
        assert_eq!(resolver.resolve_all().unwrap(), resolver.resolve_all().unwrap());
    }

    #[test]
    fn test_unregistered_locale_resolves_to_base() {
        let file = test_parse_config(TWO_LOCALES);
        let fr = resolve(&file.base, &file.overrides, &Locale::new("fr")).unwrap();
        let base = resolve(&file.base, &file.overrides, &Locale::default()).unwrap();
        assert_eq!(fr.settings(), base.settings());
        assert_eq!(fr.locale().as_str(), "fr");
    }

    #[test]
    fn test_resolve_all_contains_default_and_registered() {
        let file = test_parse_config(TWO_LOCALES);
        let all = resolve_all(&file.base, &file.overrides).unwrap();
        let locales: Vec<_> = all.keys().map(Locale::as_str).collect();
        assert_eq!(locales, vec!["", "de"]);
    }

    #[test]
    fn test_registered_locale_nests_under_its_code() {
        let file = test_parse_config(TWO_LOCALES);
        let all = resolve_all(&file.base, &file.overrides).unwrap();

        let main = all[&Locale::default()].settings();
        assert_eq!(main.output_subdir, "");
        assert_eq!(main.site_base_url, "");

        let de = all[&Locale::new("de")].settings();
        assert_eq!(de.output_subdir, "de");
        assert_eq!(de.site_base_url, "/de");
    }

    #[test]
    fn test_nesting_keeps_base_prefix() {
        let file = test_parse_config(
            r#"
SITE_BASE_URL = "https://example.org/site/"
OUTPUT_SUBDIR = "public"

[locales.de]
SITE_NAME = "de"
"#,
        );
        let de = resolve(&file.base, &file.overrides, &Locale::new("de")).unwrap();
        assert_eq!(de.settings().output_subdir, "public/de");
        assert_eq!(de.settings().site_base_url, "https://example.org/site/de");
    }

    #[test]
    fn test_override_replaces_nested_subdir() {
        let file = test_parse_config(
            r#"
SITE_BASE_URL = "https://example.org"

[locales.de]
OUTPUT_SUBDIR = ""
SITE_BASE_URL = "https://example.de"
"#,
        );
        let de = resolve(&file.base, &file.overrides, &Locale::new("de")).unwrap();
        assert_eq!(de.settings().output_subdir, "");
        assert_eq!(de.settings().site_base_url, "https://example.de");
    }

    #[test]
    fn test_type_mismatch_reports_key_and_locale() {
        let file = test_parse_config(
            "[locales.de]\nPAGINATION_SIZE = true\n\n[locales.fr]\nSITE_NAME = \"ok\"",
        );
        let err = resolve(&file.base, &file.overrides, &Locale::new("de")).unwrap_err();
        match err {
            ConfigError::TypeMismatch { key, locale, found, .. } => {
                assert_eq!(key, ConfigKey::PaginationSize);
                assert_eq!(locale.as_str(), "de");
                assert_eq!(found, "boolean");
            }
            other => panic!("unexpected error: {other}"),
        }

        // fr is isolated from de's bad override
        assert!(resolve(&file.base, &file.overrides, &Locale::new("fr")).is_ok());
        assert!(resolve_all(&file.base, &file.overrides).is_err());
    }
}
