//! Serialized layout dumps.
//!
//! A `*.layout.json` file holds one [`DocumentLayout`] as produced by any
//! span-level extractor (size, bit-encoded flags, packed color, bbox as
//! `[x0, y0, x1, y1]`):
//!
//! ```json
//! {
//!   "name": "guide.pdf",
//!   "title": "South of France",
//!   "pages": [
//!     {"number": 1, "width": 612, "height": 792, "blocks": [
//!       {"bbox": [72, 80, 400, 104], "lines": [
//!         {"spans": [{"text": "Cities", "size": 20, "flags": 16, "color": 0, "bbox": [72, 80, 160, 104]}]}
//!       ]}
//!     ]}
//!   ],
//!   "bookmarks": []
//! }
//! ```

use crate::error::{Error, Result};
use crate::layout::DocumentLayout;
use crate::source::LayoutSource;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads `*.layout.json` dumps.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayoutSource;

impl JsonLayoutSource {
    /// Create the source.
    pub fn new() -> Self {
        Self
    }

    /// Write a layout dump next to other inputs.
    pub fn save(layout: &DocumentLayout, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, layout)?;
        Ok(())
    }
}

impl LayoutSource for JsonLayoutSource {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["layout.json"]
    }

    fn load(&self, path: &Path) -> Result<DocumentLayout> {
        let file = File::open(path).map_err(|e| Error::document_open(path, e))?;
        let mut layout: DocumentLayout =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::document_open(path, e))?;

        if layout.name.trim().is_empty() {
            layout.name = self.document_name(path);
        }
        Ok(layout)
    }

    /// `guide.pdf` resolves to `guide.pdf` when that is itself a dump, else
    /// `guide.pdf.layout.json`, else `guide.layout.json`.
    fn locate(&self, dir: &Path, file_name: &str) -> PathBuf {
        let direct = dir.join(file_name);
        if self.accepts(&direct) {
            return direct;
        }
        let appended = dir.join(format!("{}.layout.json", file_name));
        if appended.exists() {
            return appended;
        }
        let replaced = direct.with_extension("layout.json");
        if replaced.exists() {
            return replaced;
        }
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::layout::{FontFlags, LayoutBlock, LayoutLine, PageLayout, TextSpan};

    #[test]
    fn test_parse_documented_format() {
        let json = r#"{
            "name": "guide.pdf",
            "title": "South of France",
            "pages": [
                {"number": 1, "width": 612, "height": 792, "blocks": [
                    {"bbox": [72, 80, 400, 104], "lines": [
                        {"spans": [{"text": "Cities", "size": 20, "flags": 16, "color": 0, "bbox": [72, 80, 160, 104]}]}
                    ]}
                ]}
            ]
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.layout.json");
        std::fs::write(&path, json).unwrap();

        let layout = JsonLayoutSource::new().load(&path).unwrap();
        assert_eq!(layout.name, "guide.pdf");
        assert_eq!(layout.title.as_deref(), Some("South of France"));
        let span = &layout.pages[0].blocks[0].lines[0].spans[0];
        assert!(span.is_bold());
        assert_eq!(span.bbox, Rect::from_points(72.0, 80.0, 160.0, 104.0));
        assert!(layout.bookmarks.is_empty());
    }

    #[test]
    fn test_save_load_and_default_name() {
        let mut layout = DocumentLayout::new("");
        let mut page = PageLayout::new(1);
        let bbox = Rect::new(72.0, 100.0, 200.0, 12.0);
        page.blocks.push(LayoutBlock {
            bbox,
            lines: vec![LayoutLine {
                spans: vec![TextSpan::new("Hello", 12.0, FontFlags::ITALIC, bbox)],
            }],
        });
        layout.pages.push(page);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.pdf.layout.json");
        JsonLayoutSource::save(&layout, &path).unwrap();

        let loaded = JsonLayoutSource::new().load(&path).unwrap();
        assert_eq!(loaded.name, "memo.pdf");
        assert_eq!(loaded.pages, layout.pages);
    }

    #[test]
    fn test_malformed_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.layout.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let source = JsonLayoutSource::new();
        assert!(matches!(source.load(&bad), Err(Error::DocumentOpen { .. })));
        assert!(matches!(
            source.load(&dir.path().join("missing.layout.json")),
            Err(Error::DocumentOpen { .. })
        ));
    }

    #[test]
    fn test_locate_variants() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonLayoutSource::new();

        assert_eq!(source.locate(dir.path(), "a.layout.json"), dir.path().join("a.layout.json"));
        assert_eq!(source.locate(dir.path(), "b.pdf"), dir.path().join("b.pdf.layout.json"));

        std::fs::write(dir.path().join("c.layout.json"), "{}").unwrap();
        assert_eq!(source.locate(dir.path(), "c.pdf"), dir.path().join("c.layout.json"));
    }
}
