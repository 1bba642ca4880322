//! Text embedding backends.
//!
//! The ranker only needs "string in, fixed-length vector out" plus cosine
//! similarity. Two backends implement [`Embedder`]:
//!
//! - [`onnx::OnnxSentenceEmbedder`] (feature `ml`): a sentence-transformer
//!   exported to ONNX, run on CPU with tract.
//! - [`HashingEmbedder`]: a deterministic feature-hashing bag of words that
//!   needs no model files. Useful for tests and for machines without a model;
//!   it must be selected explicitly.

#[cfg(feature = "ml")]
#[cfg_attr(docsrs, doc(cfg(feature = "ml")))]
pub mod onnx;

use crate::error::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Output dimension of all-MiniLM-L6-v2 and the hashing default.
pub const DEFAULT_DIMENSION: usize = 384;

/// Default token budget per text for transformer backends.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Model directories searched, in order, when none is configured.
pub const DEFAULT_MODEL_PATHS: &[&str] = &[
    "models/all-MiniLM-L6-v2",
    "../models/all-MiniLM-L6-v2",
    "./models/all-MiniLM-L6-v2",
];

/// Maps text to fixed-length vectors.
pub trait Embedder {
    /// Backend name for logs and metadata.
    fn name(&self) -> &str;

    /// Length of every produced vector.
    fn dimension(&self) -> usize;

    /// Embed one text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, preserving order.
    ///
    /// Implementations that batch must return exactly what per-item
    /// [`Embedder::embed`] calls would.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }
}

/// Cosine similarity in \[-1, 1\]; 0.0 on length mismatch or a zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Scale a vector to unit length in place; zero vectors are left as is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Which embedding backend a ranking run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// ONNX sentence transformer (requires the `ml` feature and model files)
    #[default]
    Onnx,
    /// Feature-hashing bag of words
    Hashing,
}

impl std::str::FromStr for EmbedderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "onnx" => Ok(EmbedderKind::Onnx),
            "hashing" => Ok(EmbedderKind::Hashing),
            other => Err(format!("unknown embedder '{}' (expected onnx or hashing)", other)),
        }
    }
}

/// Embedding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend selection
    pub backend: EmbedderKind,
    /// Candidate model directories, searched in order
    pub model_paths: Vec<PathBuf>,
    /// Token budget per text (transformer backends)
    pub max_sequence_length: usize,
    /// Vector length for the hashing backend
    pub hashing_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbedderKind::Onnx,
            model_paths: DEFAULT_MODEL_PATHS.iter().map(PathBuf::from).collect(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            hashing_dimension: DEFAULT_DIMENSION,
        }
    }
}

impl EmbeddingConfig {
    /// Select a backend.
    pub fn with_backend(mut self, backend: EmbedderKind) -> Self {
        self.backend = backend;
        self
    }

    /// Replace the model search paths.
    pub fn with_model_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.model_paths = paths;
        self
    }
}

/// First existing directory among `search_paths`.
///
/// # Errors
///
/// [`Error::ModelNotFound`] listing every searched path when none exists.
pub fn resolve_model_dir(search_paths: &[PathBuf]) -> Result<PathBuf> {
    search_paths
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .ok_or_else(|| Error::ModelNotFound(search_paths.to_vec()))
}

/// Construct the configured backend.
///
/// For [`EmbedderKind::Onnx`] the model directory is resolved first, so a
/// missing model fails before any document work starts.
pub fn load_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    match config.backend {
        EmbedderKind::Hashing => {
            info!("Using hashing embedder ({} dims)", config.hashing_dimension);
            Ok(Box::new(HashingEmbedder::new(config.hashing_dimension)))
        },
        EmbedderKind::Onnx => {
            let dir = resolve_model_dir(&config.model_paths)?;
            load_onnx(&dir, config.max_sequence_length)
        },
    }
}

#[cfg(feature = "ml")]
fn load_onnx(dir: &Path, max_len: usize) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(onnx::OnnxSentenceEmbedder::load(dir, max_len)?))
}

#[cfg(not(feature = "ml"))]
fn load_onnx(dir: &Path, _max_len: usize) -> Result<Box<dyn Embedder>> {
    Err(Error::Model(format!(
        "found model at {} but this build lacks the `ml` feature; rebuild with --features ml or use the hashing embedder",
        dir.display()
    )))
}

/// Deterministic feature-hashing embedder.
///
/// Lowercased word unigrams and adjacent-word bigrams are hashed with SHA-256
/// into a signed bucket; the resulting vector is L2-normalized. Texts that
/// share vocabulary get positive cosine similarity.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    /// Create an embedder producing `dimension`-length vectors (minimum 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn add_feature(&self, v: &mut [f32], feature: &str) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket = [0u8; 8];
        bucket.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        v[index] += sign;
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut v = vec![0.0f32; self.dimension];
        for word in &words {
            self.add_feature(&mut v, word);
        }
        for pair in words.windows(2) {
            self.add_feature(&mut v, &format!("{} {}", pair[0], pair[1]));
        }

        l2_normalize(&mut v);
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_hashing_embedder_properties() {
        let e = HashingEmbedder::default();
        let a = e.embed("Menu planning for a vegetarian buffet").unwrap();
        let b = e.embed("menu   PLANNING for a vegetarian buffet!").unwrap();
        let c = e.embed("Quarterly tax filing deadlines").unwrap();

        assert_eq!(a.len(), DEFAULT_DIMENSION);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn test_hashing_embedder_empty_text() {
        let v = HashingEmbedder::new(16).embed("  ").unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let e = HashingEmbedder::new(64);
        let texts = ["alpha beta", "gamma", "alpha beta"];
        let batch = e.embed_batch(&texts).unwrap();
        for (t, v) in texts.iter().zip(&batch) {
            assert_eq!(&e.embed(t).unwrap(), v);
        }
    }

    #[test]
    fn test_resolve_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let present = dir.path().to_path_buf();

        let found = resolve_model_dir(&[missing.clone(), present.clone()]).unwrap();
        assert_eq!(found, present);

        let err = resolve_model_dir(&[missing.clone()]).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_load_embedder_missing_model_is_fatal() {
        let config = EmbeddingConfig::default()
            .with_model_paths(vec![PathBuf::from("/nonexistent/model/dir")]);
        let err = load_embedder(&config).err().unwrap();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[test]
    fn test_embedder_kind_from_str() {
        assert_eq!("ONNX".parse::<EmbedderKind>().unwrap(), EmbedderKind::Onnx);
        assert_eq!("hashing".parse::<EmbedderKind>().unwrap(), EmbedderKind::Hashing);
        assert!("bert".parse::<EmbedderKind>().is_err());
    }
}
