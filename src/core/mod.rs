// Core algorithm exports
pub mod embedding;
pub mod explain;
pub mod filters;
pub mod matcher;
pub mod projection;
pub mod scoring;
pub mod similarity;

pub use embedding::{Embedder, EmbeddingError, DEFAULT_MODEL};
pub use explain::explain_match;
pub use filters::apply_min_score;
pub use matcher::{MatchError, Matcher};
pub use projection::{project_job, project_profile};
pub use scoring::{calculate_bonus, calculate_query_bonus, BONUS_CAP};
pub use similarity::{SimilarityEngine, SimilarityMode};
