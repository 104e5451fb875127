//! Subsite - locale-aware site configuration and output path planning.
//!
//! A site is configured once (`site.toml`) with per-locale override tables.
//! Each locale resolves to its own [`EffectiveConfig`](config::EffectiveConfig),
//! which places articles, pages, indices and feeds under that locale.
//!
//! ```ignore
//! use subsite::pipeline::{JsonManifest, Loaded};
//!
//! let records = Loaded::from_path("site.toml".as_ref())?
//!     .resolve()?
//!     .generate(&items)?
//!     .check()?
//!     .commit(&mut JsonManifest::new(std::io::stdout()))?;
//! ```

pub mod address;
pub mod config;
pub mod core;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use address::{PathGenerator, ResolvedPath};
pub use config::{ConfigFile, ConfigResolver, EffectiveConfig, LocaleOverrideStore};
pub use crate::core::{ContentItem, ContentKind, FeedKind, Locale};
pub use pipeline::{BuildError, OutputRecord, OutputWriter, plan};
