//! Sentence-embedding backends
//!
//! The matcher only needs `text -> vector`. [`load_embedder`] resolves a model
//! name into a backend; with the `embeddings` feature disabled every model is
//! reported unavailable and the similarity engine stays lexical.

use thiserror::Error;

/// Model used when the configuration names none
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Errors raised by embedding backends
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding model {model} unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("Embedding inference failed: {0}")]
    Inference(String),

    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Text embedding backend
pub trait Embedder: Send + Sync {
    /// Embed a single text into a dense vector
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Identifier of the underlying model
    fn model_name(&self) -> &str;
}

/// Resolve a model name into an embedding backend
pub fn load_embedder(model_name: &str) -> Result<Box<dyn Embedder>, EmbeddingError> {
    #[cfg(feature = "embeddings")]
    {
        let embedder = fast::FastEmbedder::new(model_name)?;
        Ok(Box::new(embedder))
    }

    #[cfg(not(feature = "embeddings"))]
    {
        Err(EmbeddingError::ModelUnavailable {
            model: model_name.to_string(),
            reason: "built without the `embeddings` feature".to_string(),
        })
    }
}

/// Cosine similarity of two vectors, in [-1, 1]
///
/// Zero-norm inputs score 0.0.
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f64, EmbeddingError> {
    if left.len() != right.len() {
        return Err(EmbeddingError::DimensionMismatch { left: left.len(), right: right.len() });
    }

    let mut dot = 0.0f64;
    let mut left_norm = 0.0f64;
    let mut right_norm = 0.0f64;
    for (a, b) in left.iter().zip(right) {
        let (a, b) = (*a as f64, *b as f64);
        dot += a * b;
        left_norm += a * a;
        right_norm += b * b;
    }

    if left_norm == 0.0 || right_norm == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (left_norm.sqrt() * right_norm.sqrt()))
}

#[cfg(feature = "embeddings")]
mod fast {
    use super::{Embedder, EmbeddingError};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    /// ONNX sentence-embedding backend
    pub struct FastEmbedder {
        model: TextEmbedding,
        model_name: String,
    }

    impl FastEmbedder {
        pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
            let unavailable = |reason: String| EmbeddingError::ModelUnavailable {
                model: model_name.to_string(),
                reason,
            };

            let model = resolve_model(model_name)
                .ok_or_else(|| unavailable("unknown model name".to_string()))?;
            let options = InitOptions::new(model).with_show_download_progress(false);
            let model = TextEmbedding::try_new(options).map_err(|e| unavailable(e.to_string()))?;

            Ok(Self { model, model_name: model_name.to_string() })
        }
    }

    impl Embedder for FastEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut vectors = self
                .model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
            vectors
                .pop()
                .ok_or_else(|| EmbeddingError::Inference("model returned no vector".to_string()))
        }

        fn model_name(&self) -> &str {
            &self.model_name
        }
    }

    fn resolve_model(name: &str) -> Option<EmbeddingModel> {
        let lowered = name.trim().to_lowercase();
        let short = lowered.rsplit('/').next().unwrap_or(lowered.as_str());
        match short {
            "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
            _ => None,
        }
    }
}
