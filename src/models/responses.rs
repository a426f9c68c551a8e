use serde::{Deserialize, Serialize};
use crate::models::domain::{JobCandidate, MatchResult};

/// Response for the rank and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankJobsResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    /// "embedding" or "lexical"
    #[serde(rename = "similarityMode")]
    pub similarity_mode: String,
}

/// Response for the normalize endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeJobsResponse {
    pub jobs: Vec<JobCandidate>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "similarityMode")]
    pub similarity_mode: String,
    #[serde(rename = "cachedProfiles")]
    pub cached_profiles: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
