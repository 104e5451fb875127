//! Output address space: where each content item is written and served.
//!
//! # Architecture
//!
//! ```text
//! EffectiveConfig[L] ──┐
//!                      ├─> PathGenerator ──> ResolvedPath ──┐
//! ContentItem (L)   ───┘                                    │
//!                                                           v
//!                      every locale's paths ──> CollisionChecker
//! ```
//!
//! # Module Structure
//!
//! - [`template`]: `{name}` placeholder templates
//! - [`generate`]: per-locale path generation and pagination
//! - [`conflict`]: output path collision detection

pub mod conflict;
pub mod generate;
pub mod template;

pub use conflict::{
    CollisionError, NearMiss, OutputSourceMap, PathCollision, check, collect_output_sources,
    detect_collisions, detect_near_misses, format_collisions, print_collisions,
};
pub use generate::{PathError, PathGenerator, ResolvedPath, display_path};
pub use template::{TemplateError, UrlTemplate};
