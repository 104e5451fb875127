//! Core types - pure abstractions shared across the codebase.

mod item;
mod locale;
pub mod slug;

pub use item::{ContentItem, ContentKind, FeedKind, ItemError};
pub use locale::Locale;
pub use slug::{SlugMode, slugify};
