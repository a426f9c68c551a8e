use chrono::{DateTime, Utc};
use thiserror::Error;
use crate::core::{
    explain::explain_match,
    filters::apply_min_score,
    projection::{project_job, project_profile},
    scoring::{calculate_bonus, calculate_query_bonus},
    similarity::{SimilarityEngine, SimilarityMode},
};
use crate::models::{BonusWeights, JobCandidate, MatchResult, Profile, RankOptions};
use crate::services::cache::{fingerprint, ProfileTextCache};
use crate::services::profiles::ProfileSource;

/// Errors surfaced by the matcher
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("No profile found for user: {0}")]
    MissingProfile(String),
}

/// Main ranking orchestrator
///
/// # Pipeline Stages
/// 1. Project the profile (cached per profile id) and each job into text
/// 2. Score similarity between the profile/query text and each job text
/// 3. Add heuristic bonuses
/// 4. Stable sort by final score, apply the optional threshold, truncate
///
/// Every call is a pure function of its inputs. The profile-text cache is
/// checked against the profile's content, so it never changes a result.
/// Build one `Matcher` at startup and share it.
#[derive(Debug)]
pub struct Matcher {
    engine: SimilarityEngine,
    weights: BonusWeights,
    cache: ProfileTextCache,
}

impl Matcher {
    pub fn new(engine: SimilarityEngine, weights: BonusWeights, cache: ProfileTextCache) -> Self {
        Self { engine, weights, cache }
    }

    /// Lexical-mode matcher with default bonus weights and a small cache
    pub fn with_defaults() -> Self {
        Self::new(
            SimilarityEngine::lexical(),
            BonusWeights::default(),
            ProfileTextCache::new(1000, 300),
        )
    }

    pub fn similarity_mode(&self) -> SimilarityMode {
        self.engine.mode()
    }

    pub fn cache(&self) -> &ProfileTextCache {
        &self.cache
    }

    /// Drop the cached projection of a profile after it changed
    pub fn invalidate_profile(&self, profile_id: &str) {
        self.cache.invalidate(profile_id);
    }

    /// Projected text for a profile, served from cache while its content is unchanged
    pub fn profile_text(&self, profile: &Profile) -> String {
        match fingerprint(profile) {
            Some(content) => self
                .cache
                .get_or_insert_with(&profile.id, content, || project_profile(profile)),
            None => project_profile(profile),
        }
    }

    /// Rank jobs for a profile
    ///
    /// # Arguments
    /// * `profile` - The user's profile
    /// * `candidates` - Jobs to rank; none are dropped before scoring
    /// * `options` - Top-K and optional minimum final score
    ///
    /// # Returns
    /// At most `options.top_k` results, sorted by final score descending
    pub fn rank(
        &self,
        profile: &Profile,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
    ) -> Vec<MatchResult> {
        self.rank_at(profile, candidates, options, Utc::now())
    }

    /// [`Matcher::rank`] evaluated at a fixed point in time
    pub fn rank_at(
        &self,
        profile: &Profile,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
        now: DateTime<Utc>,
    ) -> Vec<MatchResult> {
        let profile_text = self.profile_text(profile);
        self.score_all(&profile_text, candidates, options, |job, _job_text| {
            calculate_bonus(profile, job, &self.weights, now)
        })
    }

    /// Rank jobs for a profile combined with a free-text query
    ///
    /// Similarity is taken against `"{profile text}. Looking for: {query}"`
    /// and the bonus comes from query keywords found in the job.
    pub fn search(
        &self,
        profile: &Profile,
        query: &str,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
    ) -> Vec<MatchResult> {
        let profile_text = self.profile_text(profile);
        let enhanced_query = format!("{}. Looking for: {}", profile_text, query.trim());

        tracing::debug!("Searching with enhanced query: {:.150}", enhanced_query);

        self.score_all(&enhanced_query, candidates, options, |_job, job_text| {
            calculate_query_bonus(query, job_text)
        })
    }

    /// Look up a profile and rank jobs for it
    pub fn rank_for_user<S: ProfileSource + ?Sized>(
        &self,
        profiles: &S,
        user_id: &str,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let profile = profiles
            .get_profile(user_id)
            .ok_or_else(|| MatchError::MissingProfile(user_id.to_string()))?;
        Ok(self.rank(&profile, candidates, options))
    }

    /// Look up a profile and search jobs for it
    pub fn search_for_user<S: ProfileSource + ?Sized>(
        &self,
        profiles: &S,
        user_id: &str,
        query: &str,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let profile = profiles
            .get_profile(user_id)
            .ok_or_else(|| MatchError::MissingProfile(user_id.to_string()))?;
        Ok(self.search(&profile, query, candidates, options))
    }

    fn score_all<F>(
        &self,
        query_text: &str,
        candidates: Vec<JobCandidate>,
        options: RankOptions,
        bonus_for: F,
    ) -> Vec<MatchResult>
    where
        F: Fn(&JobCandidate, &str) -> f64,
    {
        let total_candidates = candidates.len();
        if total_candidates == 0 {
            return vec![];
        }

        let prepared = self.engine.prepare(query_text);

        let mut results: Vec<MatchResult> = candidates
            .into_iter()
            .map(|job| {
                let job_text = project_job(&job);
                let similarity_score = self.engine.score(&prepared, &job_text);
                let bonus_score = bonus_for(&job, &job_text);
                let final_score = similarity_score + bonus_score;
                let explanation = explain_match(query_text, &job_text, final_score);

                MatchResult {
                    job,
                    similarity_score,
                    bonus_score,
                    final_score,
                    explanation,
                }
            })
            .collect();

        // Stable: equal scores keep input order
        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut results = apply_min_score(results, options.min_score);
        results.truncate(options.top_k);

        if let Some(top) = results.first() {
            tracing::info!(
                "Ranked {} candidates ({} mode), returning {}, top score {:.3}",
                total_candidates,
                self.engine.mode(),
                results.len(),
                top.final_score
            );
        }

        results
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, Proficiency, Skill};
    use crate::services::profiles::InMemoryProfileStore;

    fn create_profile() -> Profile {
        Profile {
            id: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            experience_level: ExperienceLevel::Entry,
            skills: vec![Skill {
                name: "python".to_string(),
                proficiency: Proficiency::Intermediate,
                confidence: 0.9,
            }],
            ..Profile::default()
        }
    }

    fn create_job(title: &str, body: &str, level: ExperienceLevel, remote: bool, skills: &[&str]) -> JobCandidate {
        let mut job = JobCandidate::new(title);
        job.body = body.to_string();
        job.experience_level = level;
        job.remote = remote;
        job.skills_mentioned = skills.iter().map(|s| s.to_string()).collect();
        job
    }

    fn asha_candidates() -> Vec<JobCandidate> {
        vec![
            create_job("Senior Java Architect", "10 years java", ExperienceLevel::Senior, false, &["java"]),
            create_job("Python Intern", "remote internship, python required", ExperienceLevel::Entry, true, &["python"]),
        ]
    }

    #[test]
    fn test_rank_basic() {
        let matcher = Matcher::with_defaults();
        let results = matcher.rank(&create_profile(), asha_candidates(), RankOptions::top(10));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].job.title, "Python Intern");
        assert_eq!(results[1].job.title, "Senior Java Architect");
        // entry match + entry remote + one shared skill
        assert!((results[0].bonus_score - 0.20).abs() < 1e-9);
        assert_eq!(results[1].bonus_score, 0.0);
        assert!(results[0].similarity_score > results[1].similarity_score);
    }

    #[test]
    fn test_rank_empty_candidates() {
        let matcher = Matcher::with_defaults();
        assert!(matcher.rank(&create_profile(), vec![], RankOptions::default()).is_empty());
    }

    #[test]
    fn test_respects_top_k() {
        let matcher = Matcher::with_defaults();
        let candidates: Vec<JobCandidate> = (0..20)
            .map(|i| create_job(&format!("Job {}", i), "python", ExperienceLevel::Mid, false, &[]))
            .collect();

        assert_eq!(matcher.rank(&create_profile(), candidates.clone(), RankOptions::top(5)).len(), 5);
        assert_eq!(matcher.rank(&create_profile(), candidates, RankOptions::top(50)).len(), 20);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_defaults();
        let candidates: Vec<JobCandidate> = ["first", "second", "third"]
            .iter()
            .map(|t| create_job(t, "", ExperienceLevel::Senior, false, &[]))
            .collect();

        let results = matcher.rank(&create_profile(), candidates, RankOptions::default());
        let titles: Vec<&str> = results.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_min_score_applied_after_ranking() {
        let matcher = Matcher::with_defaults();
        let options = RankOptions { top_k: 10, min_score: Some(0.15) };

        let results = matcher.rank(&create_profile(), asha_candidates(), options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].job.title, "Python Intern");
    }

    #[test]
    fn test_search_uses_query_bonus() {
        let matcher = Matcher::with_defaults();
        let results = matcher.search(&create_profile(), "python intern", asha_candidates(), RankOptions::default());

        assert_eq!(results[0].job.title, "Python Intern");
        assert!((results[0].bonus_score - 0.15).abs() < 1e-9);
        assert_eq!(results[1].bonus_score, 0.0);
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        let matcher = Matcher::with_defaults();
        let store = InMemoryProfileStore::new();

        let err = matcher
            .rank_for_user(&store, "nobody@example.com", asha_candidates(), RankOptions::default())
            .unwrap_err();
        assert!(matches!(err, MatchError::MissingProfile(id) if id == "nobody@example.com"));

        store.upsert(create_profile());
        let results = matcher
            .rank_for_user(&store, "asha@example.com", vec![], RankOptions::default())
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_profile_text_follows_profile_edits() {
        let matcher = Matcher::with_defaults();
        let mut profile = create_profile();
        let original = matcher.profile_text(&profile);
        assert_eq!(matcher.profile_text(&profile), original);
        assert_eq!(matcher.cache().stats().entries, 1);

        profile.name = "Asha Rao".to_string();
        assert!(matcher.profile_text(&profile).starts_with("Asha Rao"));
    }

    #[test]
    fn test_rank_uses_edited_profile_after_stale_write() {
        let matcher = Matcher::with_defaults();
        let old = create_profile();
        let mut edited = create_profile();
        edited.skills[0].name = "java".to_string();

        // A ranking that read the profile before the edit finishes after the invalidation
        matcher.invalidate_profile(&edited.id);
        matcher.rank(&old, asha_candidates(), RankOptions::default());

        assert!(matcher.profile_text(&edited).contains("skilled in java"));
        let results = matcher.rank(&edited, asha_candidates(), RankOptions::default());
        let java = results.iter().find(|r| r.job.title == "Senior Java Architect").unwrap();
        assert!(java.similarity_score > 0.0);
    }
}
