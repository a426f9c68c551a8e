// Service exports
pub mod cache;
pub mod ingest;
pub mod profiles;

pub use cache::{CacheStats, ProfileTextCache};
pub use ingest::{normalize_jobs, GlassdoorListing, RawJob, RedditPost};
pub use profiles::{InMemoryProfileStore, ProfileSource, ProfileStoreError};
