//! Command-line entry point.
//!
//! Usage:
//!   outline_oxide outline --input input/ --output output/
//!   outline_oxide rank --collection "Collection 1" --embedder hashing
//!
//! Set `RUST_LOG` (or pass `--verbose`) to control log output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use outline_oxide::config::PipelineConfig;
use outline_oxide::embedding::{EmbedderKind, load_embedder};
use outline_oxide::layout::StrategyProfile;
use outline_oxide::pipeline::{process_outline_dir, run_collection};
use outline_oxide::source::source_by_name;
use std::path::PathBuf;
use std::time::Instant;

#[cfg(feature = "pdfium")]
const DEFAULT_SOURCE: &str = "pdfium";
#[cfg(not(feature = "pdfium"))]
const DEFAULT_SOURCE: &str = "json";

#[derive(Parser)]
#[command(
    name = "outline_oxide",
    about = "Document outlines from layout signals and persona-aware passage ranking",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (missing keys keep their defaults)
    #[arg(long, global = true, env = "OUTLINE_OXIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Layout source: pdfium (PDF files) or json (*.layout.json dumps)
    #[arg(long, global = true, default_value = DEFAULT_SOURCE)]
    source: String,

    /// Only analyze the first N pages of each document
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// Heading level strategy: auto, statistical, title-relative
    #[arg(long, global = true)]
    profile: Option<StrategyProfile>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a `<stem>.json` outline for every document in a directory
    Outline {
        /// Directory of input documents
        #[arg(short, long, default_value = "input")]
        input: PathBuf,

        /// Directory for outline artifacts
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Rank the passages of a collection for its persona and task
    Rank {
        /// Collection directory holding challenge1b_input.json and PDFs/
        #[arg(short, long)]
        collection: PathBuf,

        /// Embedding backend: onnx or hashing
        #[arg(short, long)]
        embedder: Option<EmbedderKind>,

        /// Extra model directory searched before the defaults
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if cli.max_pages.is_some() {
        config = config.with_max_pages(cli.max_pages);
    }
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }

    let source = source_by_name(&cli.source)?;
    let start = Instant::now();

    match cli.command {
        Commands::Outline { input, output } => {
            let summary = process_outline_dir(source.as_ref(), &input, &output, &config.outline)
                .with_context(|| format!("outlining {}", input.display()))?;
            info!(
                "Wrote {} outlines ({} failed to open) in {:.2?}",
                summary.written,
                summary.failed,
                start.elapsed()
            );
        },

        Commands::Rank {
            collection,
            embedder,
            model_dir,
        } => {
            let mut embedding = config.embedding.clone();
            if let Some(kind) = embedder {
                embedding = embedding.with_backend(kind);
            }
            if let Some(dir) = model_dir {
                embedding.model_paths.insert(0, dir);
            }
            let config = config.with_embedding(embedding);

            let embedder = load_embedder(&config.embedding).context("loading embedding model")?;
            let artifact = run_collection(source.as_ref(), embedder, &collection, &config)
                .with_context(|| format!("ranking collection {}", collection.display()))?;
            info!(
                "Ranked {} sections from {} chunks in {:.2?}",
                artifact.extracted_sections.len(),
                artifact.metadata.total_chunks_processed,
                start.elapsed()
            );
        },
    }

    Ok(())
}
