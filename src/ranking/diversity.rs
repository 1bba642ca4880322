//! Per-document diversity and global top-N filtering.

use crate::ranking::ScoredChunk;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Diversity settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityFilter {
    /// Maximum results from one source document
    pub per_document_cap: usize,
    /// Maximum results overall
    pub top_n: usize,
}

impl Default for DiversityFilter {
    fn default() -> Self {
        Self {
            per_document_cap: 3,
            top_n: 20,
        }
    }
}

/// Filtered ranking output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingResult {
    /// Kept chunks with ranks reassigned 1..=N
    pub chunks: Vec<ScoredChunk>,
    /// Number of ranked chunks the filter received
    pub considered: usize,
}

impl RankingResult {
    /// Number of kept chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing was kept.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl DiversityFilter {
    /// Create a filter.
    pub fn new(per_document_cap: usize, top_n: usize) -> Self {
        Self {
            per_document_cap,
            top_n,
        }
    }

    /// Walk ranked chunks in order, keeping each whose text is new and whose
    /// document is under the cap, until `top_n` are kept.
    pub fn apply(&self, ranked: Vec<ScoredChunk>) -> RankingResult {
        let considered = ranked.len();
        let mut seen_texts: HashSet<String> = HashSet::new();
        let mut per_document: HashMap<String, usize> = HashMap::new();
        let mut kept = Vec::with_capacity(self.top_n.min(considered));

        for mut chunk in ranked {
            if kept.len() >= self.top_n {
                break;
            }
            let count = per_document.entry(chunk.chunk.document.clone()).or_insert(0);
            if *count >= self.per_document_cap || seen_texts.contains(&chunk.chunk.text) {
                continue;
            }
            *count += 1;
            seen_texts.insert(chunk.chunk.text.clone());
            chunk.importance_rank = kept.len() + 1;
            kept.push(chunk);
        }

        RankingResult {
            chunks: kept,
            considered,
        }
    }
}
