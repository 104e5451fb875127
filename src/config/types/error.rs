//! Configuration error types.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigKey, ValueType};
use crate::core::Locale;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors.
///
/// Every variant names the locale it was found in; errors in the base
/// configuration are reported against the default locale.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("unknown config key `{name}` in {locale}")]
    UnknownKey { name: String, locale: Locale },

    #[error("`{name}` in {locale} must be a table")]
    ExpectedTable { name: String, locale: Locale },

    #[error("locale `{0}` is registered twice")]
    DuplicateLocale(Locale),

    #[error("invalid locale code {0:?}")]
    InvalidLocale(String),

    #[error("type mismatch for `{key}` in {locale}: expected {expected}, found {found}")]
    TypeMismatch {
        key: ConfigKey,
        locale: Locale,
        expected: ValueType,
        found: &'static str,
    },

    #[error("invalid value for `{key}` in {locale}: {message}")]
    InvalidValue {
        key: ConfigKey,
        locale: Locale,
        message: String,
    },
}

impl ConfigError {
    /// Config field the error points at, if any.
    pub fn field(&self) -> Option<String> {
        match self {
            Self::UnknownKey { name, .. } | Self::ExpectedTable { name, .. } => Some(name.clone()),
            Self::TypeMismatch { key, .. } | Self::InvalidValue { key, .. } => Some(key.to_string()),
            Self::DuplicateLocale(locale) => Some(format!("locales.{}", locale.as_str())),
            Self::InvalidLocale(code) => Some(format!("locales.{code}")),
            Self::Io(..) | Self::Toml(_) => None,
        }
    }

    /// Fix hint shown under the error.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::UnknownKey { name, .. } => Some(match ConfigKey::suggest(name) {
                Some(key) => format!("did you mean `{key}`?"),
                None => "remove this key; see ConfigKey::ALL for recognized keys".to_string(),
            }),
            Self::ExpectedTable { name, .. } if name.starts_with("locales") => {
                Some("use one `[locales.<code>]` table per locale".into())
            }
            Self::ExpectedTable { name, .. } => Some(format!(
                "use e.g. `[{name}]` with `all = false` / `category = true`"
            )),
            Self::TypeMismatch { expected, .. } => Some(format!("use a {expected}")),
            Self::InvalidLocale(_) => {
                Some("use a code like \"de\" or \"pt-BR\"; the default locale needs no table".into())
            }
            _ => None,
        }
    }

    /// Colored, multi-line rendering for terminal reports.
    pub fn diagnostic(&self) -> Diagnostic<'_> {
        Diagnostic(self)
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// Terminal rendering of a [`ConfigError`].
///
/// ```text
/// [locales.de.PAGINATION_SIZE]
/// → type mismatch for `PAGINATION_SIZE` in de: expected ..., found boolean
///   hint: use a ...
/// ```
pub struct Diagnostic<'a>(&'a ConfigError);

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = self.0.field() {
            writeln!(f, "{}{}{}", "[".dimmed(), field.cyan(), "]".dimmed())?;
        }
        write!(f, "{} {}", "→".red(), self.0)?;
        if let Some(hint) = self.0.hint() {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("site.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("site.toml"));

        let err = ConfigError::TypeMismatch {
            key: ConfigKey::PaginationSize,
            locale: Locale::new("de"),
            expected: ValueType::Pagination,
            found: "boolean",
        };
        let display = format!("{err}");
        assert!(display.contains("PAGINATION_SIZE"));
        assert!(display.contains("de"));
        assert!(display.contains("boolean"));
    }

    #[test]
    fn test_unknown_key_hint_suggests_close_match() {
        let err = ConfigError::UnknownKey {
            name: "ARTICLE_URL".into(),
            locale: Locale::default(),
        };
        let hint = err.hint().unwrap();
        assert!(hint.contains("ARTICLE_URL_TEMPLATE"), "{hint}");
    }

    #[test]
    fn test_diagnostic_contains_field_and_hint() {
        let err = ConfigError::InvalidLocale("d e".into());
        let rendered = err.diagnostic().to_string();
        assert!(rendered.contains("locales.d e"));
        assert!(rendered.contains("hint:"));
    }
}
