//! Layout sources: where [`DocumentLayout`]s come from.
//!
//! The heading classifier and chunker never touch file formats directly; a
//! [`LayoutSource`] turns a path into the span/line/block model. Sources:
//!
//! - [`JsonLayoutSource`]: serialized layout dumps (`*.layout.json`), always
//!   available and used by the test suite.
//! - [`pdfium::PdfiumLayoutSource`] (feature `pdfium`): reads PDFs through
//!   the pdfium library.

pub mod json;
#[cfg(feature = "pdfium")]
#[cfg_attr(docsrs, doc(cfg(feature = "pdfium")))]
pub mod pdfium;

pub use json::JsonLayoutSource;

use crate::error::{Error, Result};
use crate::layout::DocumentLayout;
use std::path::{Path, PathBuf};

/// Produces document layouts from files.
pub trait LayoutSource: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Lower-case file suffixes this source reads (without the leading dot).
    fn extensions(&self) -> &[&str];

    /// Load a document.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentOpen`] when the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<DocumentLayout>;

    /// Whether `path` has one of [`LayoutSource::extensions`].
    fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name() else {
            return false;
        };
        let file_name = file_name.to_string_lossy().to_lowercase();
        self.extensions()
            .iter()
            .any(|ext| file_name.len() > ext.len() + 1 && file_name.ends_with(&format!(".{}", ext)))
    }

    /// Location of the file backing `file_name` inside `dir`.
    fn locate(&self, dir: &Path, file_name: &str) -> PathBuf {
        dir.join(file_name)
    }

    /// Document name for a path: its file name with the source suffix removed
    /// when that leaves a name behind.
    fn document_name(&self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let lower = file_name.to_lowercase();
        for ext in self.extensions() {
            let suffix = format!(".{}", ext);
            if lower.ends_with(&suffix) && lower.len() > suffix.len() {
                return file_name[..file_name.len() - suffix.len()].to_string();
            }
        }
        file_name
    }
}

/// All files in `dir` accepted by `source`, sorted by name.
pub fn list_documents(source: &dyn LayoutSource, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!("{} is not a directory", dir.display())));
    }
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && source.accepts(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Layout source selected by name ("json" or "pdfium").
pub fn source_by_name(name: &str) -> Result<Box<dyn LayoutSource>> {
    match name.to_ascii_lowercase().as_str() {
        "json" => Ok(Box::new(JsonLayoutSource::new())),
        #[cfg(feature = "pdfium")]
        "pdfium" | "pdf" => Ok(Box::new(pdfium::PdfiumLayoutSource::new())),
        #[cfg(not(feature = "pdfium"))]
        "pdfium" | "pdf" => Err(Error::UnsupportedSource(
            "PDF input requires building with --features pdfium".to_string(),
        )),
        other => Err(Error::UnsupportedSource(format!("unknown layout source '{}'", other))),
    }
}
