// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # Outline Oxide
//!
//! Document structure inference from text-layout signals, and persona-aware
//! passage ranking on top of it.
//!
//! ## Core Features
//!
//! ### Outline extraction
//! - **Font statistics**: modal body size and σ thresholds per document
//! - **Heading classification**: an ordered table of weighted rules plus
//!   pluggable level strategies (statistical thresholds or title-relative)
//! - **Outline assembly**: dedupe, title lifting, (page, y) ordering, caps,
//!   and a native-bookmark fast path
//!
//! ### Passage ranking
//! - **Chunking**: section-anchored paragraphs with header/footer removal
//! - **Persona queries**: lexicon-driven query expansion
//! - **Hybrid scoring**: embedding cosine similarity fused with generic-title
//!   penalties and persona keyword boosts
//! - **Diversity**: per-document caps and a global top-N
//!
//! ## Architecture
//! - **Layout sources** ([`source::LayoutSource`]): JSON layout dumps, or PDF
//!   files via pdfium (feature `pdfium`)
//! - **Embedders** ([`embedding::Embedder`]): ONNX sentence transformers via
//!   tract (feature `ml`), or a deterministic hashing embedder
//! - **Parallelism**: documents are processed on the rayon pool
//!
//! ## Quick Start
//!
//! ```
//! use outline_oxide::geometry::Rect;
//! use outline_oxide::layout::{DocumentLayout, FontFlags, LayoutBlock, LayoutLine, PageLayout, TextSpan};
//! use outline_oxide::outline::{OutlineBuilder, OutlineConfig};
//!
//! fn block(text: &str, size: f32, flags: FontFlags, y: f32) -> LayoutBlock {
//!     let bbox = Rect::new(72.0, y, 400.0, size);
//!     LayoutBlock { bbox, lines: vec![LayoutLine { spans: vec![TextSpan::new(text, size, flags, bbox)] }] }
//! }
//!
//! let mut page = PageLayout::new(1);
//! page.blocks = vec![
//!     block("Riviera Guide", 24.0, FontFlags::BOLD, 60.0),
//!     block("1. Getting There", 16.0, FontFlags::BOLD, 120.0),
//!     block("Trains run hourly from Marseille to Nice along the coast", 11.0, FontFlags::empty(), 150.0),
//!     block("Buses connect the smaller villages in the hills above", 11.0, FontFlags::empty(), 170.0),
//!     block("Ferries serve the islands during the summer season only", 11.0, FontFlags::empty(), 190.0),
//! ];
//! let mut layout = DocumentLayout::new("riviera.pdf");
//! layout.pages.push(page);
//!
//! let outline = OutlineBuilder::new(OutlineConfig::default()).build(&layout);
//! assert_eq!(outline.title, "Riviera Guide");
//! assert_eq!(outline.entries[0].text, "Getting There");
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Layout model and analysis
pub mod geometry;
pub mod layout;
pub mod text;

// Layout sources (JSON dumps, pdfium)
pub mod source;

// Outline extraction
pub mod outline;

// Chunking
pub mod extractors;

// Persona lexicons and query expansion
pub mod persona;

// Embeddings
pub mod embedding;

// Hybrid ranking
pub mod ranking;

// End-to-end runs
pub mod pipeline;

// Configuration
pub mod config;

// Re-exports
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use outline::{Outline, OutlineBuilder, OutlineEntry};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
