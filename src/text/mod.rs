//! Text normalization shared by the outline and chunking paths.

pub mod cleaning;

pub use cleaning::{clean_text, collapse_whitespace, is_all_caps, strip_serial};
