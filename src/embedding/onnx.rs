//! Sentence-transformer embeddings via tract-onnx.
//!
//! Expects a model directory holding `model.onnx` (a BERT-style encoder
//! exported with `input_ids`, `attention_mask` and optionally
//! `token_type_ids` inputs) and the matching HuggingFace `tokenizer.json`.
//! Inputs are padded to a fixed length so a single optimized plan serves
//! every text; the output is attention-masked mean pooling followed by L2
//! normalization, matching sentence-transformers' default pipeline.

use crate::embedding::{Embedder, l2_normalize};
use crate::error::{Error, Result};
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tract_onnx::prelude::*;

type TractPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Model file name inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";

/// Tokenizer file name inside the model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// ONNX sentence embedder.
pub struct OnnxSentenceEmbedder {
    plan: TractPlan,
    tokenizer: Tokenizer,
    input_names: Vec<String>,
    max_len: usize,
    dimension: usize,
    name: String,
}

impl std::fmt::Debug for OnnxSentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSentenceEmbedder")
            .field("name", &self.name)
            .field("input_names", &self.input_names)
            .field("max_len", &self.max_len)
            .field("dimension", &self.dimension)
            .finish()
    }
}

fn model_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Model(format!("{}: {}", context, e))
}

impl OnnxSentenceEmbedder {
    /// Load a model directory and optimize it for `max_len` tokens.
    pub fn load(dir: &Path, max_len: usize) -> Result<Self> {
        let model_path = dir.join(MODEL_FILE);
        let tokenizer_path = dir.join(TOKENIZER_FILE);
        if !model_path.exists() {
            return Err(Error::ModelNotFound(vec![model_path]));
        }
        if !tokenizer_path.exists() {
            return Err(Error::ModelNotFound(vec![tokenizer_path]));
        }

        let mut tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| model_err("Failed to load tokenizer", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_len,
                ..Default::default()
            }))
            .map_err(|e| model_err("Failed to configure truncation", e))?;
        tokenizer.with_padding(None);

        let mut model = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| model_err("Failed to load ONNX model", e))?;

        let input_names: Vec<String> = model
            .inputs
            .iter()
            .map(|outlet| model.node(outlet.node).name.clone())
            .collect();

        for i in 0..input_names.len() {
            model = model
                .with_input_fact(i, InferenceFact::dt_shape(i64::datum_type(), tvec!(1, max_len)))
                .map_err(|e| model_err("Failed to set input shape", e))?;
        }

        let plan = model
            .into_optimized()
            .map_err(|e| model_err("Failed to optimize model", e))?
            .into_runnable()
            .map_err(|e| model_err("Failed to build runnable model", e))?;

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        let mut embedder = Self {
            plan,
            tokenizer,
            input_names,
            max_len,
            dimension: 0,
            name,
        };
        embedder.dimension = embedder.embed("dimension probe")?.len();

        log::info!(
            "Loaded sentence embedder {} ({} dims, {} tokens, inputs: {})",
            embedder.name,
            embedder.dimension,
            max_len,
            embedder.input_names.join(", ")
        );
        Ok(embedder)
    }

    /// Names of the model's input nodes.
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn input_tensors(&self, text: &str) -> Result<(TVec<TValue>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| model_err("Tokenization failed", e))?;

        let mut ids = vec![0i64; self.max_len];
        let mut mask = vec![0i64; self.max_len];
        for (i, (&id, &m)) in encoding
            .get_ids()
            .iter()
            .zip(encoding.get_attention_mask())
            .take(self.max_len)
            .enumerate()
        {
            ids[i] = id as i64;
            mask[i] = m as i64;
        }
        let type_ids = vec![0i64; self.max_len];

        let shape = [1, self.max_len];
        let mut inputs: TVec<TValue> = tvec!();
        for name in &self.input_names {
            let data = if name.contains("mask") {
                &mask
            } else if name.contains("type") {
                &type_ids
            } else {
                &ids
            };
            let tensor = Tensor::from_shape(&shape, data.as_slice()).map_err(|e| model_err("Bad input", e))?;
            inputs.push(tensor.into());
        }
        Ok((inputs, mask))
    }
}

impl Embedder for OnnxSentenceEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let (inputs, mask) = self.input_tensors(text)?;
        let outputs = self
            .plan
            .run(inputs)
            .map_err(|e| model_err("Inference failed", e))?;

        let hidden = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| model_err("Unexpected output type", e))?
            .into_dimensionality::<tract_ndarray::Ix3>()
            .map_err(|e| model_err("Unexpected output shape", e))?;

        let (_, seq_len, width) = hidden.dim();
        let mut pooled = vec![0.0f32; width];
        let mut count = 0.0f32;
        for t in 0..seq_len.min(mask.len()) {
            if mask[t] == 0 {
                continue;
            }
            count += 1.0;
            for h in 0..width {
                pooled[h] += hidden[[0, t, h]];
            }
        }
        if count > 0.0 {
            pooled.iter_mut().for_each(|x| *x /= count);
        }

        l2_normalize(&mut pooled);
        Ok(pooled)
    }
}
