//! End-to-end processing: outline directories and ranking collections.
//!
//! Documents are independent units of work and run in parallel on the rayon
//! pool. A document that fails to open is logged once and contributes an
//! empty outline or no chunks; siblings are unaffected. Only a missing or
//! broken embedding model aborts a ranking run.

pub mod artifacts;

pub use artifacts::{
    ChallengeInfo, CollectionInput, DOCUMENTS_DIR, DocumentRef, ExtractedSection, INPUT_FILE,
    JobToBeDone, OUTPUT_FILE, Persona, RankingArtifact, RankingMetadata, SubsectionAnalysis,
};

use crate::config::PipelineConfig;
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::extractors::{Chunk, DocumentChunker};
use crate::layout::DocumentLayout;
use crate::outline::{Outline, OutlineBuilder, OutlineConfig};
use crate::persona::generate_query;
use crate::ranking::SemanticRanker;
use crate::source::{LayoutSource, list_documents};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Outline of an already-loaded layout.
pub fn extract_outline(layout: &DocumentLayout, config: &OutlineConfig) -> Outline {
    OutlineBuilder::new(config.clone()).build(layout)
}

/// File stem used for a document's outline artifact.
fn output_stem(source: &dyn LayoutSource, path: &Path) -> String {
    let name = source.document_name(path);
    Path::new(&name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

/// Load and outline one document; open failures yield an empty outline
/// titled with the file stem.
pub fn outline_for_path(source: &dyn LayoutSource, path: &Path, config: &OutlineConfig) -> Outline {
    outline_or_failure(source, path, config).0
}

fn outline_or_failure(source: &dyn LayoutSource, path: &Path, config: &OutlineConfig) -> (Outline, bool) {
    match source.load(path) {
        Ok(layout) => (extract_outline(&layout, config), false),
        Err(e) => {
            error!("{}", e);
            (Outline::empty(output_stem(source, path)), true)
        },
    }
}

/// Counts from an outline directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineSummary {
    /// Outline artifacts written
    pub written: usize,
    /// Documents that failed to open (an empty outline was still written)
    pub failed: usize,
}

/// Outline every document `source` accepts in `input_dir`, writing
/// `<stem>.json` for each into `output_dir`.
pub fn process_outline_dir(
    source: &dyn LayoutSource,
    input_dir: &Path,
    output_dir: &Path,
    config: &OutlineConfig,
) -> Result<OutlineSummary> {
    let documents = list_documents(source, input_dir)?;
    std::fs::create_dir_all(output_dir)?;
    info!(
        "Outlining {} documents from {} with {}",
        documents.len(),
        input_dir.display(),
        source.name()
    );

    let results: Vec<Result<bool>> = documents
        .par_iter()
        .map(|path| -> Result<bool> {
            let (outline, failed) = outline_or_failure(source, path, config);
            let out_path = output_dir.join(format!("{}.json", output_stem(source, path)));
            let file = File::create(&out_path)?;
            serde_json::to_writer_pretty(file, &outline)?;
            info!(
                "{} -> {} ({} entries)",
                path.display(),
                out_path.display(),
                outline.entries.len()
            );
            Ok(failed)
        })
        .collect();

    let mut summary = OutlineSummary::default();
    for result in results {
        if result? {
            summary.failed += 1;
        }
        summary.written += 1;
    }
    Ok(summary)
}

/// Read `challenge1b_input.json` from a collection directory.
pub fn read_collection_input(collection_dir: &Path) -> Result<CollectionInput> {
    let path = collection_dir.join(INPUT_FILE);
    let file = File::open(&path)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))
}

/// Chunk the input documents in parallel, merged in input order.
///
/// Missing files are warned about and skipped; unreadable ones are logged
/// and contribute nothing.
pub fn collect_chunks(
    source: &dyn LayoutSource,
    documents_dir: &Path,
    documents: &[DocumentRef],
    chunker: &DocumentChunker,
) -> Vec<Chunk> {
    documents
        .par_iter()
        .map(|doc| {
            let path: PathBuf = source.locate(documents_dir, &doc.filename);
            if !path.exists() {
                warn!("Could not find {} in {}. Skipping.", doc.filename, documents_dir.display());
                return Vec::new();
            }
            match source.load(&path) {
                Ok(layout) => {
                    let chunks = chunker.chunk(&layout, &doc.filename);
                    info!("Extracted {} chunks from {}", chunks.len(), doc.filename);
                    chunks
                },
                Err(e) => {
                    error!("{}", e);
                    Vec::new()
                },
            }
        })
        .collect::<Vec<Vec<Chunk>>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Rank the passages of a document collection for its persona and task,
/// writing `challenge1b_output.json` into the collection directory.
///
/// The embedder must already be loaded; zero extracted chunks still yields a
/// well-formed artifact.
pub fn run_collection<E: Embedder>(
    source: &dyn LayoutSource,
    embedder: E,
    collection_dir: &Path,
    config: &PipelineConfig,
) -> Result<RankingArtifact> {
    let input = read_collection_input(collection_dir)?;
    let persona = input.persona.role.as_str();
    let query = generate_query(persona, &input.job_to_be_done.task);
    info!("Generated query: '{}'", query);

    let chunker = DocumentChunker::new(config.chunker.clone());
    let chunks = collect_chunks(
        source,
        &collection_dir.join(DOCUMENTS_DIR),
        &input.documents,
        &chunker,
    );
    if chunks.is_empty() {
        warn!("No text could be extracted from any document in {}", collection_dir.display());
    }

    let ranker = SemanticRanker::new(embedder);
    debug!("Ranking {} chunks with the {} embedder", chunks.len(), ranker.embedder().name());
    let ranked = ranker.rank(&query, chunks, persona)?;
    let result = config.ranking.apply(ranked);
    info!("Kept {} of {} ranked chunks", result.len(), result.considered);

    let artifact = RankingArtifact::new(&input, query, &result, chrono::Utc::now());
    let out_path = collection_dir.join(OUTPUT_FILE);
    let file = File::create(&out_path)?;
    serde_json::to_writer_pretty(file, &artifact)?;
    info!("Output written to {}", out_path.display());

    Ok(artifact)
}
