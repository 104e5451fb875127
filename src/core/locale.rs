//! Locale identifier.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// Short language/region code identifying a subsite (e.g. `"de"`).
///
/// The empty code is the default locale: it resolves with no override map
/// and always participates in a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct Locale(Arc<str>);

impl Locale {
    /// The default (unoverridden) locale.
    pub fn default_locale() -> Self {
        Self(Arc::from(""))
    }

    pub fn new(code: impl AsRef<str>) -> Self {
        Self(Arc::from(code.as_ref().trim()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that a code is usable as a registered locale.
    ///
    /// Accepts BCP 47-ish codes: ASCII alphanumerics separated by `-` or `_`
    /// (`de`, `pt-BR`, `zh_Hans`).
    pub fn is_valid_code(code: &str) -> bool {
        !code.is_empty()
            && !code.starts_with(['-', '_'])
            && !code.ends_with(['-', '_'])
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("<default>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Locale {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
