// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BonusWeights, Domain, ExperienceLevel, JobCandidate, MatchResult, Proficiency, Profile,
    Project, RankOptions, Skill, LOCATION_NOT_SPECIFIED,
};
pub use requests::{NormalizeJobsRequest, RankJobsRequest, SearchJobsRequest};
pub use responses::{ErrorResponse, HealthResponse, NormalizeJobsResponse, RankJobsResponse};
