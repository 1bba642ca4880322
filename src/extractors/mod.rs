//! Content extraction from analyzed layouts.
//!
//! Provides section-anchored paragraph chunking for relevance ranking.

pub mod chunker;

pub use chunker::{Chunk, ChunkerConfig, DocumentChunker};
