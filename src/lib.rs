//! Job Matcher - semantic job ranking for resume profiles
//!
//! Projects a structured profile and each job posting into text, scores
//! their similarity (sentence embeddings when available, token overlap
//! otherwise), adds small heuristic bonuses and returns the top-K jobs.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, SimilarityEngine, SimilarityMode};
pub use models::{BonusWeights, JobCandidate, MatchResult, Profile, RankOptions};
pub use services::{normalize_jobs, InMemoryProfileStore, ProfileSource, RawJob};
