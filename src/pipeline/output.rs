//! Build plan records and the writers that receive them.

use std::io::{self, Write};

use serde::{Serialize, Serializer};

use crate::address::{ResolvedPath, display_path};
use crate::core::{ContentKind, Locale};

/// One file the build will write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub locale: Locale,
    #[serde(serialize_with = "serialize_display")]
    pub kind: ContentKind,
    pub slug: String,
    pub page: usize,
    /// `/`-separated, relative to the output directory.
    pub output_path: String,
    pub url: String,
    pub public_url: String,
}

impl From<&ResolvedPath> for OutputRecord {
    fn from(path: &ResolvedPath) -> Self {
        Self {
            locale: path.item.locale().clone(),
            kind: path.item.kind(),
            slug: path.item.slug().to_string(),
            page: path.page,
            output_path: display_path(&path.output),
            url: path.url.clone(),
            public_url: path.public_url.clone(),
        }
    }
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Receiver of a checked build plan.
pub trait OutputWriter {
    fn write(&mut self, record: &OutputRecord) -> io::Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OutputWriter for Vec<OutputRecord> {
    fn write(&mut self, record: &OutputRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes every record as one pretty-printed JSON array.
#[derive(Debug)]
pub struct JsonManifest<W: Write> {
    out: W,
    records: Vec<OutputRecord>,
}

impl<W: Write> JsonManifest<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputWriter for JsonManifest<W> {
    fn write(&mut self, record: &OutputRecord) -> io::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &self.records)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContentItem, FeedKind};
    use std::path::PathBuf;

    fn record() -> OutputRecord {
        OutputRecord::from(&ResolvedPath {
            item: ContentItem::feed(FeedKind::Category, "rust", "de").unwrap(),
            page: 1,
            output: PathBuf::from("de").join("feeds").join("rust.atom.xml"),
            url: "feeds/rust.atom.xml".into(),
            public_url: "https://example.org/de/feeds/rust.atom.xml".into(),
        })
    }

    #[test]
    fn test_record_from_resolved_path() {
        let record = record();
        assert_eq!(record.locale.as_str(), "de");
        assert_eq!(record.output_path, "de/feeds/rust.atom.xml");
    }

    #[test]
    fn test_json_manifest() {
        let mut manifest = JsonManifest::new(Vec::new());
        manifest.write(&record()).unwrap();
        manifest.finish().unwrap();

        let json: serde_json::Value = serde_json::from_slice(&manifest.into_inner()).unwrap();
        let first = &json[0];
        assert_eq!(first["locale"], "de");
        assert_eq!(first["kind"], "feed:category");
        assert_eq!(first["slug"], "rust");
        assert_eq!(first["page"], 1);
        assert_eq!(first["output_path"], "de/feeds/rust.atom.xml");
    }
}
