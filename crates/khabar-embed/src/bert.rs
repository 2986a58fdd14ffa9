//! # BERT Sentence Embedder
//!
//! Sentence-transformers style encoder: BERT hidden states mean-pooled
//! over the attention mask. Runs on CPU through candle.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use khabar_core::{Embedder, Embedding};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::error::{EmbedError, Result};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";
const SENTENCE_CONFIG_FILE: &str = "sentence_bert_config.json";

/// Input length, in tokens, used when the model directory does not set one.
/// Matches `all-MiniLM-L6-v2`, the model the corpus is indexed with.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// The part of `sentence_bert_config.json` the embedder reads.
#[derive(Debug, Deserialize)]
struct SentenceConfig {
    max_seq_length: Option<usize>,
}

/// A BERT encoder producing one mean-pooled vector per text.
///
/// Output vectors are not normalized; cosine search does not need them to be.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    max_length: usize,
}

impl BertEmbedder {
    /// Loads `config.json`, `tokenizer.json` and `model.safetensors` from
    /// `model_dir` (e.g. a local copy of `all-MiniLM-L6-v2`).
    ///
    /// # Errors
    ///
    /// - `EmbedError::ModelLoad` if a file is missing.
    /// - `EmbedError::Json` for an unreadable config.
    /// - `EmbedError::Tokenizer` or `EmbedError::Candle` if loading fails.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = model_dir.as_ref();
        let config_path = require(dir, CONFIG_FILE)?;
        let tokenizer_path = require(dir, TOKENIZER_FILE)?;
        let weights_path = require(dir, WEIGHTS_FILE)?;

        let config: Config = serde_json::from_str(&std::fs::read_to_string(config_path)?)?;

        let max_length = read_max_sequence_length(dir)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| EmbedError::Tokenizer(e.to_string()))?;

        let device = Device::Cpu;
        // SAFETY: the weights file is memory-mapped read-only and is not
        // modified while the model is alive.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };
        let model = BertModel::load(vb, &config)?;

        info!(
            model_dir = %dir.display(),
            hidden_size = config.hidden_size,
            layers = config.num_hidden_layers,
            max_length,
            "loaded embedding model"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: config.hidden_size,
            max_length,
        })
    }

    /// Longest input in tokens; longer text is truncated.
    pub fn max_sequence_length(&self) -> usize {
        self.max_length
    }

    /// Dimension of the produced vectors.
    pub fn dimension(&self) -> usize {
        self.hidden_size
    }

    /// Embeds one text.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::EmptyEncoding` when the text yields no tokens,
    /// or the tokenizer/candle error that stopped the forward pass.
    pub fn encode(&self, text: &str) -> Result<Embedding> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbedError::Tokenizer(e.to_string()))?;
        if encoding.get_ids().is_empty() {
            return Err(EmbedError::EmptyEncoding);
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self.model.forward(&input_ids, &type_ids, Some(&mask))?;
        let pooled = mean_pool(&hidden, &mask)?;
        debug!(tokens = encoding.len(), "encoded text");

        Ok(pooled.squeeze(0)?.to_vec1::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn embed(&self, text: &str) -> khabar_core::Result<Embedding> {
        Ok(self.encode(text)?)
    }
}

/// Averages `hidden` (`[batch, seq, dim]`) over positions where `mask`
/// (`[batch, seq]`) is non-zero, giving `[batch, dim]`.
///
/// # Errors
///
/// Returns a candle error on shape mismatch.
pub fn mean_pool(hidden: &Tensor, mask: &Tensor) -> Result<Tensor> {
    let mask = mask.to_dtype(DType::F32)?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    // All-zero masks divide by a tiny count instead of zero.
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
    Ok(summed.broadcast_div(&counts)?)
}

/// Reads `max_seq_length` from the sentence-transformers config in `dir`,
/// falling back to [`DEFAULT_MAX_SEQUENCE_LENGTH`].
fn read_max_sequence_length(dir: &Path) -> Result<usize> {
    let path = dir.join(SENTENCE_CONFIG_FILE);
    if !path.is_file() {
        return Ok(DEFAULT_MAX_SEQUENCE_LENGTH);
    }
    let config: SentenceConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(config
        .max_seq_length
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH))
}

fn require(dir: &Path, file: &str) -> Result<std::path::PathBuf> {
    let path = dir.join(file);
    if path.is_file() {
        Ok(path)
    } else {
        Err(EmbedError::ModelLoad(format!(
            "{file} not found in {}",
            dir.display()
        )))
    }
}
