//! Output path collision detection across every locale of a build.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::generate::{ResolvedPath, display_path};
use crate::core::ContentItem;
use crate::log;
use crate::utils::plural_s;

/// Output path -> items claiming it.
pub type OutputSourceMap = FxHashMap<PathBuf, Vec<ContentItem>>;

/// Several distinct items write the same output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    /// The shared output path (including the locale's output subdir)
    pub path: PathBuf,
    /// Every distinct item claiming it, sorted
    pub items: Vec<ContentItem>,
}

/// Output paths that differ only in ASCII case.
///
/// Harmless on case-sensitive filesystems, an overwrite on others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearMiss {
    pub paths: Vec<PathBuf>,
}

/// The build would overwrite output files.
#[derive(Debug, Clone, Error)]
#[error("{} output path collision{}:\n{}", .0.len(), plural_s(.0.len()), format_collisions(.0))]
pub struct CollisionError(pub Vec<PathCollision>);

/// Group resolved paths by output path.
pub fn collect_output_sources<'a>(
    paths: impl IntoIterator<Item = &'a ResolvedPath>,
) -> OutputSourceMap {
    let mut sources = OutputSourceMap::default();
    for path in paths {
        sources
            .entry(path.output.clone())
            .or_default()
            .push(path.item.clone());
    }
    sources
}

/// Output paths claimed by more than one distinct item, sorted by path.
///
/// The same item listed twice is not a collision.
pub fn detect_collisions(sources: &OutputSourceMap) -> Vec<PathCollision> {
    let mut collisions: Vec<_> = sources
        .iter()
        .filter_map(|(path, items)| {
            let mut items = items.clone();
            items.sort();
            items.dedup();
            (items.len() > 1).then(|| PathCollision {
                path: path.clone(),
                items,
            })
        })
        .collect();
    collisions.sort_by(|a, b| a.path.cmp(&b.path));
    collisions
}

/// Groups of output paths equal under ASCII case folding.
pub fn detect_near_misses(sources: &OutputSourceMap) -> Vec<NearMiss> {
    let mut folded: FxHashMap<String, Vec<PathBuf>> = FxHashMap::default();
    for path in sources.keys() {
        folded
            .entry(display_path(path).to_ascii_lowercase())
            .or_default()
            .push(path.clone());
    }

    let mut misses: Vec<_> = folded
        .into_values()
        .filter(|paths| paths.len() > 1)
        .map(|mut paths| {
            paths.sort();
            NearMiss { paths }
        })
        .collect();
    misses.sort_by(|a, b| a.paths.cmp(&b.paths));
    misses
}

/// Check a full build's paths: warn on near misses, fail on collisions.
pub fn check<'a>(paths: impl IntoIterator<Item = &'a ResolvedPath>) -> Result<(), CollisionError> {
    let sources = collect_output_sources(paths);

    let misses = detect_near_misses(&sources);
    print_near_misses(&misses);

    let collisions = detect_collisions(&sources);
    if collisions.is_empty() {
        Ok(())
    } else {
        Err(CollisionError(collisions))
    }
}

/// Print collisions using the standard log format.
///
/// Output format:
/// ```text
/// [error] output path collisions (1 path, 2 items)
/// [path] de/blog/hello.html (2 items)
///   - article `hello` (de) from content/a.md
///   - article `hello` (de) from content/b.md
/// ```
pub fn print_collisions(collisions: &[PathCollision]) {
    if collisions.is_empty() {
        return;
    }

    let total_items: usize = collisions.iter().map(|c| c.items.len()).sum();
    log!("error"; "output path collisions ({} path{}, {} item{})",
        collisions.len(), plural_s(collisions.len()),
        total_items, plural_s(total_items));

    for collision in collisions {
        eprintln!();
        log!("path"; "{} ({} item{})",
            display_path(&collision.path), collision.items.len(), plural_s(collision.items.len()));
        for item in &collision.items {
            eprintln!("  - {item}");
        }
    }
}

fn print_near_misses(misses: &[NearMiss]) {
    for miss in misses {
        let paths: Vec<_> = miss.paths.iter().map(|p| display_path(p)).collect();
        log!("warn"; "output paths differ only in case: {}", paths.join(", "));
    }
}

/// Format collisions as a string (for error messages).
pub fn format_collisions(collisions: &[PathCollision]) -> String {
    collisions
        .iter()
        .map(format_single_collision)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_single_collision(collision: &PathCollision) -> String {
    let mut lines = vec![format!(
        "{} ({})",
        display_path(&collision.path),
        collision.items.len()
    )];
    for item in &collision.items {
        lines.push(format!("  - {item}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(item: ContentItem, output: &str) -> ResolvedPath {
        ResolvedPath {
            item,
            page: 1,
            output: PathBuf::from(output),
            url: output.to_string(),
            public_url: output.to_string(),
        }
    }

    fn article(slug: &str, locale: &str, source: &str) -> ContentItem {
        ContentItem::article(slug, locale).unwrap().with_source(source)
    }

    #[test]
    fn test_no_collisions() {
        let paths = vec![
            resolved(article("a", "", "content/a.md"), "a.html"),
            resolved(article("b", "", "content/b.md"), "b.html"),
            resolved(article("a", "de", "content/a.de.md"), "de/a.html"),
        ];
        assert!(detect_collisions(&collect_output_sources(&paths)).is_empty());
        assert!(check(&paths).is_ok());
    }

    #[test]
    fn test_same_slug_kind_locale_collides() {
        let paths = vec![
            resolved(article("hello", "", "content/a.md"), "hello.html"),
            resolved(article("hello", "", "content/b.md"), "hello.html"),
            resolved(article("other", "", "content/c.md"), "other.html"),
        ];
        let collisions = detect_collisions(&collect_output_sources(&paths));
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].path, PathBuf::from("hello.html"));
        assert_eq!(collisions[0].items.len(), 2);
    }

    #[test]
    fn test_duplicate_item_is_not_a_collision() {
        let item = article("hello", "", "content/a.md");
        let paths = vec![
            resolved(item.clone(), "hello.html"),
            resolved(item, "hello.html"),
        ];
        assert!(check(&paths).is_ok());
    }

    #[test]
    fn test_cross_locale_collision() {
        // two locales sharing an output root
        let paths = vec![
            resolved(article("hello", "", "content/hello.md"), "hello.html"),
            resolved(article("hello", "de", "content/hello.de.md"), "hello.html"),
        ];
        let err = check(&paths).unwrap_err();
        assert_eq!(err.0.len(), 1);
        let locales: Vec<_> = err.0[0].items.iter().map(|i| i.locale().as_str()).collect();
        assert_eq!(locales, ["", "de"]);
    }

    #[test]
    fn test_three_way_collision() {
        let paths = vec![
            resolved(article("x", "", "a.md"), "x.html"),
            resolved(ContentItem::page("x", "").unwrap(), "x.html"),
            resolved(ContentItem::index(""), "x.html"),
        ];
        let collisions = detect_collisions(&collect_output_sources(&paths));
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].items.len(), 3);
    }

    #[test]
    fn test_collisions_sorted_by_path() {
        let paths = vec![
            resolved(article("z", "", "1.md"), "z.html"),
            resolved(article("z", "", "2.md"), "z.html"),
            resolved(article("a", "", "3.md"), "a.html"),
            resolved(article("a", "", "4.md"), "a.html"),
        ];
        let collisions = detect_collisions(&collect_output_sources(&paths));
        let paths: Vec<_> = collisions.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, [PathBuf::from("a.html"), PathBuf::from("z.html")]);
    }

    #[test]
    fn test_near_miss_warns_only() {
        let paths = vec![
            resolved(article("Hello", "", "a.md"), "Hello.html"),
            resolved(article("hello", "", "b.md"), "hello.html"),
        ];
        let sources = collect_output_sources(&paths);
        let misses = detect_near_misses(&sources);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].paths.len(), 2);
        assert!(check(&paths).is_ok());
    }

    #[test]
    fn test_error_names_path_and_items() {
        let paths = vec![
            resolved(article("hello", "de", "content/a.md"), "de/hello.html"),
            resolved(article("hello", "de", "content/b.md"), "de/hello.html"),
        ];
        let msg = check(&paths).unwrap_err().to_string();
        assert!(msg.starts_with("1 output path collision:"));
        assert!(msg.contains("de/hello.html (2)"));
        assert!(msg.contains("article `hello` (de) from content/a.md"));
        assert!(msg.contains("article `hello` (de) from content/b.md"));
    }
}
