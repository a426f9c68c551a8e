use std::collections::HashSet;
use std::fmt;
use crate::core::embedding::{cosine_similarity, load_embedder, Embedder, EmbeddingError};

/// Words ignored by lexical similarity
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

/// Which scoring path the engine is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    Embedding,
    Lexical,
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMode::Embedding => f.write_str("embedding"),
            SimilarityMode::Lexical => f.write_str("lexical"),
        }
    }
}

/// Scores the relevance of a job text to a profile/query text
///
/// Embedding mode returns cosine similarity clamped to [0, 1]. Lexical mode
/// returns the Jaccard coefficient of stop-word-filtered token sets. Both
/// paths always produce a value in [0, 1]; embedding failures score 0.0.
pub struct SimilarityEngine {
    embedder: Option<Box<dyn Embedder>>,
}

/// Query side of a comparison, computed once per ranking call
pub enum PreparedQuery {
    Embedded(Vec<f32>),
    Lexical(HashSet<String>),
    /// Query embedding failed; every comparison scores 0.0
    Failed,
}

impl SimilarityEngine {
    /// Build an engine, falling back to lexical mode when the model can't load
    pub fn new(model_name: Option<&str>) -> Self {
        let Some(model_name) = model_name else {
            tracing::info!("No embedding model configured, using lexical similarity");
            return Self::lexical();
        };

        match load_embedder(model_name) {
            Ok(embedder) => {
                tracing::info!("Loaded embedding model {}", embedder.model_name());
                Self::with_embedder(embedder)
            }
            Err(e) => {
                tracing::warn!("{}; falling back to lexical similarity", e);
                Self::lexical()
            }
        }
    }

    pub fn lexical() -> Self {
        Self { embedder: None }
    }

    pub fn with_embedder(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder: Some(embedder) }
    }

    pub fn mode(&self) -> SimilarityMode {
        if self.embedder.is_some() {
            SimilarityMode::Embedding
        } else {
            SimilarityMode::Lexical
        }
    }

    /// Score two texts against each other
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        let query = self.prepare(text_a);
        self.score(&query, text_b)
    }

    /// Precompute the query side so it can be reused across many candidates
    pub fn prepare(&self, query: &str) -> PreparedQuery {
        match &self.embedder {
            Some(embedder) => match embedder.embed(query) {
                Ok(vector) => PreparedQuery::Embedded(vector),
                Err(e) => {
                    tracing::error!("Failed to embed query text: {}", e);
                    PreparedQuery::Failed
                }
            },
            None => PreparedQuery::Lexical(token_set(query)),
        }
    }

    /// Score a prepared query against a document text
    pub fn score(&self, query: &PreparedQuery, document: &str) -> f64 {
        match query {
            PreparedQuery::Lexical(query_tokens) => jaccard(query_tokens, &token_set(document)),
            PreparedQuery::Failed => 0.0,
            PreparedQuery::Embedded(query_vector) => {
                match self.embedding_score(query_vector, document) {
                    Ok(score) => score,
                    Err(e) => {
                        let preview: String = document.chars().take(80).collect();
                        tracing::warn!("Similarity failed for job text {:?}: {}", preview, e);
                        0.0
                    }
                }
            }
        }
    }

    fn embedding_score(&self, query_vector: &[f32], document: &str) -> Result<f64, EmbeddingError> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| EmbeddingError::Inference("no embedding model loaded".to_string()))?;
        let document_vector = embedder.embed(document)?;
        let cosine = cosine_similarity(query_vector, &document_vector)?;
        Ok(clamp_unit(cosine))
    }
}

impl fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("mode", &self.mode())
            .field("model", &self.embedder.as_ref().map(|e| e.model_name().to_string()))
            .finish()
    }
}

/// Lowercased whitespace tokens with stop words removed
pub fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

/// |A ∩ B| / |A ∪ B|, 0.0 when both sets are empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps a fixed vocabulary onto axes; unknown words are ignored
    struct AxisEmbedder;

    impl Embedder for AxisEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.contains("boom") {
                return Err(EmbeddingError::Inference("boom".to_string()));
            }
            let mut vector = vec![0.0f32; 3];
            for word in text.split_whitespace() {
                match word {
                    "rust" => vector[0] += 1.0,
                    "python" => vector[1] += 1.0,
                    "anti" => vector[2] -= 1.0,
                    "pro" => vector[2] += 1.0,
                    _ => {}
                }
            }
            Ok(vector)
        }

        fn model_name(&self) -> &str {
            "axis"
        }
    }

    #[test]
    fn test_lexical_identical_text() {
        let engine = SimilarityEngine::lexical();
        assert_eq!(engine.mode(), SimilarityMode::Lexical);
        assert_eq!(engine.similarity("Python data engineer", "python DATA engineer"), 1.0);
    }

    #[test]
    fn test_lexical_is_jaccard() {
        let engine = SimilarityEngine::lexical();
        // {python, developer} vs {a, python, tester} -> 1 / 4
        let score = engine.similarity("the python developer", "a python tester");
        let expected = jaccard(&token_set("the python developer"), &token_set("a python tester"));
        assert!((score - expected).abs() < 1e-12);
        assert!((score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_lexical_empty_union() {
        let engine = SimilarityEngine::lexical();
        assert_eq!(engine.similarity("the and or", "of with"), 0.0);
        assert_eq!(engine.similarity("", ""), 0.0);
    }

    #[test]
    fn test_embedding_cosine() {
        let engine = SimilarityEngine::with_embedder(Box::new(AxisEmbedder));
        assert_eq!(engine.mode(), SimilarityMode::Embedding);
        assert!((engine.similarity("rust", "rust rust") - 1.0).abs() < 1e-9);
        assert_eq!(engine.similarity("rust", "python"), 0.0);
    }

    #[test]
    fn test_embedding_negative_cosine_clamped_to_zero() {
        let engine = SimilarityEngine::with_embedder(Box::new(AxisEmbedder));
        assert_eq!(engine.similarity("pro", "anti"), 0.0);
    }

    #[test]
    fn test_embedding_failure_scores_zero() {
        let engine = SimilarityEngine::with_embedder(Box::new(AxisEmbedder));
        let query = engine.prepare("rust");
        assert_eq!(engine.score(&query, "rust boom"), 0.0);
        assert!(engine.score(&query, "rust") > 0.99);

        assert!(matches!(engine.prepare("boom"), PreparedQuery::Failed));
        assert_eq!(engine.similarity("boom", "rust"), 0.0);
    }

    #[cfg(not(feature = "embeddings"))]
    #[test]
    fn test_unloadable_model_falls_back_to_lexical() {
        let engine = SimilarityEngine::new(Some("all-MiniLM-L6-v2"));
        assert_eq!(engine.mode(), SimilarityMode::Lexical);
        assert_eq!(SimilarityEngine::new(None).mode(), SimilarityMode::Lexical);
    }
}
