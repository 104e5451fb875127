//! Build pipeline: configuration in, checked output plan out.
//!
//! # Stages
//!
//! ```text
//! Loaded ──resolve()──> Resolved ──generate(items)──> PathsGenerated
//!                                                          │
//!            Vec<OutputRecord> <──commit(writer)── Checked <┘ check()
//! ```
//!
//! Each transition consumes the previous stage, so a plan can only reach a
//! writer after every locale's paths passed the collision check. Path
//! generation runs on rayon; collecting its results is the one barrier
//! before the check.

mod error;
mod output;

pub use error::{BuildError, BuildFailure, BuildStage};
pub use output::{JsonManifest, OutputRecord, OutputWriter};

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::address::{self, PathGenerator, ResolvedPath, print_collisions};
use crate::config::{BaseConfig, ConfigFile, EffectiveConfig, LocaleOverrideStore, resolve_all};
use crate::core::{ContentItem, ContentKind, Locale};
use crate::utils::{plural_count, plural_s};
use crate::{debug, log};

// =============================================================================
// Loaded
// =============================================================================

/// Base configuration and overrides, not yet resolved.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    base: BaseConfig,
    overrides: LocaleOverrideStore,
}

impl Loaded {
    pub fn new(base: BaseConfig, overrides: LocaleOverrideStore) -> Self {
        Self { base, overrides }
    }

    pub fn from_config_file(file: ConfigFile) -> Self {
        Self::new(file.base, file.overrides)
    }

    /// Read and parse a config file.
    pub fn from_path(path: &Path) -> Result<Self, BuildError> {
        ConfigFile::from_path(path)
            .map(Self::from_config_file)
            .map_err(|err| BuildError::new(BuildStage::Load, err))
    }

    /// Resolve the default locale and every registered locale.
    pub fn resolve(self) -> Result<Resolved, BuildError> {
        let configs = resolve_all(&self.base, &self.overrides)
            .map_err(|err| BuildError::new(BuildStage::Resolve, err))?;

        log!("resolve"; "{} ({})", plural_count(configs.len(), "locale"),
            configs.keys().map(ToString::to_string).collect::<Vec<_>>().join(", "));
        Ok(Resolved { configs })
    }
}

// =============================================================================
// Resolved
// =============================================================================

/// One effective configuration per known locale.
#[derive(Debug, Clone)]
pub struct Resolved {
    configs: BTreeMap<Locale, EffectiveConfig>,
}

impl Resolved {
    pub fn configs(&self) -> &BTreeMap<Locale, EffectiveConfig> {
        &self.configs
    }

    pub fn config(&self, locale: &Locale) -> Option<&EffectiveConfig> {
        self.configs.get(locale)
    }

    /// Place every item under its locale's configuration.
    ///
    /// Indices paginate over the number of articles in their locale.
    /// Disabled feeds produce no path. Output order follows `items`.
    pub fn generate(self, items: &[ContentItem]) -> Result<PathsGenerated, BuildError> {
        let paths = generate_paths(&self.configs, items)
            .map_err(|err| BuildError::new(BuildStage::Generate, err))?;

        log!("generate"; "{} from {}",
            plural_count(paths.len(), "output path"), plural_count(items.len(), "item"));
        Ok(PathsGenerated {
            configs: self.configs,
            paths,
        })
    }
}

fn generate_paths(
    configs: &BTreeMap<Locale, EffectiveConfig>,
    items: &[ContentItem],
) -> Result<Vec<ResolvedPath>, BuildFailure> {
    let generators = configs
        .iter()
        .map(|(locale, config)| Ok((locale, PathGenerator::new(config)?)))
        .collect::<Result<FxHashMap<_, _>, address::PathError>>()?;

    let mut articles: FxHashMap<&Locale, usize> = FxHashMap::default();
    for item in items.iter().filter(|item| item.kind() == ContentKind::Article) {
        *articles.entry(item.locale()).or_default() += 1;
    }

    let per_item = items
        .par_iter()
        .map(|item| {
            let generator =
                generators
                    .get(item.locale())
                    .ok_or_else(|| BuildFailure::UnknownLocale {
                        item: Box::new(item.clone()),
                        locale: item.locale().clone(),
                    })?;
            let count = articles.get(item.locale()).copied().unwrap_or(0);
            let paths = generator.paginate(item, count)?;
            debug!("generate"; "{} -> {} path{}", item, paths.len(), plural_s(paths.len()));
            Ok(paths)
        })
        .collect::<Result<Vec<_>, BuildFailure>>()?;

    Ok(per_item.into_iter().flatten().collect())
}

// =============================================================================
// PathsGenerated
// =============================================================================

/// Every output path of the build, not yet checked.
#[derive(Debug, Clone)]
pub struct PathsGenerated {
    configs: BTreeMap<Locale, EffectiveConfig>,
    paths: Vec<ResolvedPath>,
}

impl PathsGenerated {
    pub fn paths(&self) -> &[ResolvedPath] {
        &self.paths
    }

    pub fn configs(&self) -> &BTreeMap<Locale, EffectiveConfig> {
        &self.configs
    }

    /// Fail if two distinct items write the same output file.
    pub fn check(self) -> Result<Checked, BuildError> {
        if let Err(err) = address::check(&self.paths) {
            print_collisions(&err.0);
            return Err(BuildError::new(BuildStage::Check, err));
        }
        Ok(Checked {
            configs: self.configs,
            paths: self.paths,
        })
    }
}

// =============================================================================
// Checked
// =============================================================================

/// A collision-free build plan.
#[derive(Debug, Clone)]
pub struct Checked {
    configs: BTreeMap<Locale, EffectiveConfig>,
    paths: Vec<ResolvedPath>,
}

impl Checked {
    pub fn paths(&self) -> &[ResolvedPath] {
        &self.paths
    }

    pub fn configs(&self) -> &BTreeMap<Locale, EffectiveConfig> {
        &self.configs
    }

    pub fn records(&self) -> Vec<OutputRecord> {
        self.paths.iter().map(OutputRecord::from).collect()
    }

    /// Hand every record to `writer`, in generation order.
    pub fn commit(self, writer: &mut impl OutputWriter) -> Result<Vec<OutputRecord>, BuildError> {
        let records = self.records();
        let write_err = |what: String| {
            move |source: std::io::Error| {
                BuildError::new(BuildStage::Commit, BuildFailure::Write { what, source })
            }
        };

        for record in &records {
            writer
                .write(record)
                .map_err(write_err(record.output_path.clone()))?;
        }
        writer.finish().map_err(write_err("build plan".to_string()))?;

        log!("commit"; "{}", plural_count(records.len(), "output"));
        Ok(records)
    }
}

// =============================================================================
// Convenience
// =============================================================================

/// Load `config_path` and plan `items` up to the collision check.
pub fn plan(config_path: &Path, items: &[ContentItem]) -> Result<Checked> {
    let checked = Loaded::from_path(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?
        .resolve()?
        .generate(items)?
        .check()?;
    Ok(checked)
}
