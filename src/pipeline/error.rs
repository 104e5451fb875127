//! Build failures, tagged with the stage that produced them.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::address::{CollisionError, PathError};
use crate::config::ConfigError;
use crate::core::{ContentItem, Locale};

/// Stage of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
    Load,
    Resolve,
    Generate,
    Check,
    Commit,
}

impl BuildStage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resolve => "resolve",
            Self::Generate => "generate",
            Self::Check => "check",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What went wrong inside a stage.
#[derive(Debug, Error)]
pub enum BuildFailure {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Collision(#[from] CollisionError),

    #[error("{item} belongs to locale {locale}, which has no configuration")]
    UnknownLocale {
        item: Box<ContentItem>,
        locale: Locale,
    },

    #[error("failed to write {what}")]
    Write {
        what: String,
        #[source]
        source: io::Error,
    },
}

/// A failed build.
#[derive(Debug, Error)]
#[error("build failed at {stage} stage: {source}")]
pub struct BuildError {
    pub stage: BuildStage,
    pub source: BuildFailure,
}

impl BuildError {
    pub fn new(stage: BuildStage, source: impl Into<BuildFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_stage() {
        let err = BuildError::new(
            BuildStage::Generate,
            BuildFailure::UnknownLocale {
                item: Box::new(ContentItem::article("x", "fr").unwrap()),
                locale: Locale::new("fr"),
            },
        );
        let msg = err.to_string();
        assert!(msg.starts_with("build failed at generate stage"));
        assert!(msg.contains("article `x` (fr)"));
    }
}
