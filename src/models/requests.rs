use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::JobCandidate;
use crate::services::ingest::RawJob;

/// Request to rank jobs against a stored profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankJobsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub jobs: Vec<JobCandidate>,
    /// Source-specific postings, normalized before ranking
    #[serde(default, alias = "raw_jobs", rename = "rawJobs")]
    pub raw_jobs: Vec<RawJob>,
    #[serde(default, alias = "top_k", rename = "topK")]
    pub top_k: Option<u16>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "min_score", rename = "minScore")]
    pub min_score: Option<f64>,
}

/// Request to search jobs with a free-text query on top of a stored profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchJobsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub query: String,
    #[serde(default)]
    pub jobs: Vec<JobCandidate>,
    #[serde(default, alias = "raw_jobs", rename = "rawJobs")]
    pub raw_jobs: Vec<RawJob>,
    #[serde(default, alias = "top_k", rename = "topK")]
    pub top_k: Option<u16>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "min_score", rename = "minScore")]
    pub min_score: Option<f64>,
}

/// Request to normalize raw postings into canonical candidates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeJobsRequest {
    #[serde(alias = "raw_jobs", rename = "rawJobs")]
    pub raw_jobs: Vec<RawJob>,
}
