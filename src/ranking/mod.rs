//! Hybrid semantic + rule-based passage ranking.
//!
//! Chunks are scored by cosine similarity to a persona query, adjusted by
//! [`ScoreAdjuster`], stably sorted by final score and finally thinned by a
//! [`DiversityFilter`].

pub mod diversity;
pub mod rules;

pub use diversity::{DiversityFilter, RankingResult};
pub use rules::{Adjustment, GENERIC_TITLE_PENALTY, PENALIZED_TITLES, ScoreAdjuster};

use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{Error, Result};
use crate::extractors::Chunk;
use crate::utils::safe_float_cmp;
use log::{debug, info};

/// A chunk paired with its scores and rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The underlying chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query
    pub base_similarity: f32,
    /// Score after persona adjustments
    pub final_score: f32,
    /// 1-based rank
    pub importance_rank: usize,
}

/// Ranks chunks against a query with a given embedder.
#[derive(Debug)]
pub struct SemanticRanker<E> {
    embedder: E,
    adjuster: ScoreAdjuster,
}

impl<E: Embedder> SemanticRanker<E> {
    /// Create a ranker.
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            adjuster: ScoreAdjuster::new(),
        }
    }

    /// Access the embedder.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Score and sort chunks, best first. Ties keep input order.
    ///
    /// An empty chunk list returns an empty result without embedding.
    pub fn rank(&self, query: &str, chunks: Vec<Chunk>, persona: &str) -> Result<Vec<ScoredChunk>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed(query)?;
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != chunks.len() {
            return Err(Error::Model(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                chunks.len()
            )));
        }
        info!("Embedded query and {} chunks with {}", chunks.len(), self.embedder.name());

        let mut scored: Vec<ScoredChunk> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, v)| {
                let base = cosine_similarity(&query_vec, &v);
                let final_score = self.adjuster.adjust(base, &chunk.section_title, persona);
                ScoredChunk {
                    chunk,
                    base_similarity: base,
                    final_score,
                    importance_rank: 0,
                }
            })
            .collect();

        scored.sort_by(|a, b| safe_float_cmp(b.final_score, a.final_score));
        for (i, s) in scored.iter_mut().enumerate() {
            s.importance_rank = i + 1;
            debug!(
                "#{} {:.4} (base {:.4}) {} / {}",
                s.importance_rank, s.final_score, s.base_similarity, s.chunk.document, s.chunk.section_title
            );
        }
        Ok(scored)
    }
}
