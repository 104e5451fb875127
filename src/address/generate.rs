//! Output paths and URLs of content items under one locale.
//!
//! # Mapping
//!
//! | Kind       | Output path                    | URL                   |
//! |------------|--------------------------------|-----------------------|
//! | article    | `ARTICLE_SAVE_AS_TEMPLATE`     | `ARTICLE_URL_TEMPLATE`|
//! | page       | `PAGE_SAVE_AS_TEMPLATE`        | `PAGE_URL_TEMPLATE`   |
//! | index      | `INDEX_SAVE_AS_TEMPLATE`       | output path           |
//! | feed(kind) | `FEED_SAVE_AS.<kind>`          | output path           |
//!
//! Every output path lives under the locale's `OUTPUT_SUBDIR`. URLs do not
//! carry the subdir; the public URL is `SITE_BASE_URL` joined with the
//! percent-encoded URL.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::template::{TemplateError, UrlTemplate};
use crate::config::{EffectiveConfig, FeedTable, Pagination};
use crate::core::{ContentItem, ContentKind, Locale};
use crate::debug;

/// Characters escaped in URL segments: everything but RFC 3986 unreserved.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Failure to place an item.
#[derive(Debug, Error)]
pub enum PathError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Item handed to the generator of another locale.
    #[error("{item} cannot be placed with the configuration of locale {locale}")]
    LocaleMismatch {
        item: Box<ContentItem>,
        locale: Locale,
    },

    /// Rendered output path leaves the output root.
    #[error("output path `{path}` of {item} escapes the output root")]
    EscapesRoot {
        path: String,
        item: Box<ContentItem>,
    },

    #[error("invalid SITE_BASE_URL `{url}` for locale {locale}")]
    BaseUrl {
        url: String,
        locale: Locale,
        #[source]
        source: url::ParseError,
    },
}

// ============================================================================
// ResolvedPath
// ============================================================================

/// Where one page of a content item is written and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub item: ContentItem,
    /// 1-based page number; always 1 except for paginated indices.
    pub page: usize,
    /// Output path relative to the build output directory.
    pub output: PathBuf,
    /// Site-relative URL.
    pub url: String,
    /// `SITE_BASE_URL` + encoded URL.
    pub public_url: String,
}

// ============================================================================
// PathGenerator
// ============================================================================

/// Parsed templates of one effective configuration.
#[derive(Debug, Clone)]
pub struct PathGenerator<'a> {
    config: &'a EffectiveConfig,
    article_url: UrlTemplate,
    article_save_as: UrlTemplate,
    page_url: UrlTemplate,
    page_save_as: UrlTemplate,
    index_save_as: UrlTemplate,
    feed_save_as: FeedTable<UrlTemplate>,
    base_url: BaseUrl,
}

#[derive(Debug, Clone)]
enum BaseUrl {
    /// Empty or path-only base, kept without its trailing slash.
    Relative(String),
    /// Absolute base whose path ends with `/`.
    Absolute(Url),
}

impl<'a> PathGenerator<'a> {
    /// Parse every template of `config`.
    pub fn new(config: &'a EffectiveConfig) -> Result<Self, PathError> {
        let settings = config.settings();
        Ok(Self {
            config,
            article_url: UrlTemplate::parse(&settings.article_url)?,
            article_save_as: UrlTemplate::parse(&settings.article_save_as)?,
            page_url: UrlTemplate::parse(&settings.page_url)?,
            page_save_as: UrlTemplate::parse(&settings.page_save_as)?,
            index_save_as: UrlTemplate::parse(&settings.index_save_as)?,
            feed_save_as: settings.feed_save_as.try_map(|t| UrlTemplate::parse(t))?,
            base_url: BaseUrl::parse(&settings.site_base_url, config.locale())?,
        })
    }

    #[inline]
    pub const fn config(&self) -> &'a EffectiveConfig {
        self.config
    }

    /// Place `item`; `None` for a feed whose `FEED_ENABLED` is off.
    ///
    /// Indices are placed as their first page.
    pub fn generate(&self, item: &ContentItem) -> Result<Option<ResolvedPath>, PathError> {
        self.check_locale(item)?;
        let lang = self.config.lang();
        let slug_vars = [("slug", item.slug()), ("lang", lang)];

        let (save_as, url) = match item.kind() {
            ContentKind::Article => (
                self.article_save_as.render(&slug_vars, item)?,
                Some(self.article_url.render(&slug_vars, item)?),
            ),
            ContentKind::Page => (
                self.page_save_as.render(&slug_vars, item)?,
                Some(self.page_url.render(&slug_vars, item)?),
            ),
            ContentKind::Index => (self.index_save_as.render(&[("lang", lang)], item)?, None),
            ContentKind::Feed(kind) => {
                if !self.config.feed_enabled(kind) {
                    debug!("path"; "skipping {} (FEED_ENABLED.{} is off)", item, kind);
                    return Ok(None);
                }
                (self.feed_save_as.get(kind).render(&slug_vars, item)?, None)
            }
        };

        let save_as = save_as.trim_start_matches('/').to_string();
        let url = url.unwrap_or_else(|| save_as.clone());
        self.place(item, 1, save_as, url).map(Some)
    }

    /// Every page of `item`, given the number of entries it lists.
    ///
    /// Only indices paginate; other kinds yield at most one path.
    pub fn paginate(
        &self,
        item: &ContentItem,
        item_count: usize,
    ) -> Result<Vec<ResolvedPath>, PathError> {
        let Some(first) = self.generate(item)? else {
            return Ok(Vec::new());
        };
        if item.kind() != ContentKind::Index {
            return Ok(vec![first]);
        }

        let pages = self.config.settings().pagination.page_count(item_count);
        if let Pagination::PerPage(size) = self.config.settings().pagination {
            debug!("path"; "{}: {} entr{} at {} per page -> {} page{}",
                item, item_count, if item_count == 1 { "y" } else { "ies" },
                size, pages, crate::utils::plural_s(pages));
        }

        let mut paths = Vec::with_capacity(pages);
        let base = first.url.clone();
        paths.push(first);
        for page in 2..=pages {
            let save_as = page_suffixed(&base, page);
            paths.push(self.place(item, page, save_as.clone(), save_as)?);
        }
        Ok(paths)
    }

    fn check_locale(&self, item: &ContentItem) -> Result<(), PathError> {
        if item.locale() == self.config.locale() {
            Ok(())
        } else {
            Err(PathError::LocaleMismatch {
                item: Box::new(item.clone()),
                locale: self.config.locale().clone(),
            })
        }
    }

    fn place(
        &self,
        item: &ContentItem,
        page: usize,
        save_as: String,
        url: String,
    ) -> Result<ResolvedPath, PathError> {
        let output = self.output_path(item, &save_as)?;
        let public_url = self.base_url.join(&url);
        Ok(ResolvedPath {
            item: item.clone(),
            page,
            output,
            url,
            public_url,
        })
    }

    fn output_path(&self, item: &ContentItem, save_as: &str) -> Result<PathBuf, PathError> {
        let mut output = PathBuf::new();
        for part in self.config.settings().output_subdir.split('/').chain(save_as.split('/')) {
            if !part.is_empty() && part != "." {
                output.push(part);
            }
        }
        let escapes = output
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || output.as_os_str().is_empty() {
            return Err(PathError::EscapesRoot {
                path: save_as.to_string(),
                item: Box::new(item.clone()),
            });
        }
        Ok(output)
    }
}

impl BaseUrl {
    fn parse(base: &str, locale: &Locale) -> Result<Self, PathError> {
        let base = base.trim();
        if !base.contains("://") {
            return Ok(Self::Relative(base.trim_end_matches('/').to_string()));
        }

        let with_slash = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        Url::parse(&with_slash)
            .map(Self::Absolute)
            .map_err(|source| PathError::BaseUrl {
                url: base.to_string(),
                locale: locale.clone(),
                source,
            })
    }

    fn join(&self, url: &str) -> String {
        let encoded = encode_path(url.trim_start_matches('/'));
        match self {
            Self::Relative(prefix) if prefix.is_empty() => encoded,
            Self::Relative(prefix) => format!("{prefix}/{encoded}"),
            Self::Absolute(base) => match base.join(&encoded) {
                Ok(joined) => joined.to_string(),
                Err(_) => format!("{base}{encoded}"),
            },
        }
    }
}

/// Percent-encode each `/`-separated segment.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Insert the page number before the file extension of the last segment.
///
/// `blog/index.html` -> `blog/index2.html`, `feeds/all` -> `feeds/all2`.
fn page_suffixed(path: &str, page: usize) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, path),
    };
    let file = match file.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{page}{}", &file[..dot], &file[dot..]),
        _ => format!("{file}{page}"),
    };
    match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file,
    }
}

/// Output path as a `/`-separated string, for display and case folding.
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
