//! Configuration for outline extraction and passage ranking.
//!
//! Every field has a default, so a JSON config file only needs the keys it
//! changes:
//!
//! ```json
//! { "outline": { "max_pages": 20, "profile": "title-relative" },
//!   "ranking": { "top_n": 10 } }
//! ```

use crate::embedding::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::extractors::ChunkerConfig;
use crate::layout::StrategyProfile;
use crate::outline::OutlineConfig;
use crate::ranking::DiversityFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whole-pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Outline extraction
    pub outline: OutlineConfig,
    /// Chunking
    pub chunker: ChunkerConfig,
    /// Diversity and top-N limits
    pub ranking: DiversityFilter,
    /// Embedding backend
    pub embedding: EmbeddingConfig,
}

impl PipelineConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidInput(format!("config {}: {}", path.display(), e)))
    }

    /// Replace the outline settings.
    pub fn with_outline(mut self, outline: OutlineConfig) -> Self {
        self.outline = outline;
        self
    }

    /// Replace the chunker settings.
    pub fn with_chunker(mut self, chunker: ChunkerConfig) -> Self {
        self.chunker = chunker;
        self
    }

    /// Replace the diversity settings.
    pub fn with_ranking(mut self, ranking: DiversityFilter) -> Self {
        self.ranking = ranking;
        self
    }

    /// Replace the embedding settings.
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }

    /// Limit outline analysis to the first `pages` pages.
    pub fn with_max_pages(mut self, pages: Option<usize>) -> Self {
        self.outline.max_pages = pages;
        self
    }

    /// Select the heading strategy profile.
    pub fn with_profile(mut self, profile: StrategyProfile) -> Self {
        self.outline.profile = profile;
        self
    }
}
