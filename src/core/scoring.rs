use std::collections::HashSet;
use chrono::{DateTime, Duration, Utc};
use crate::core::filters::{contains_phrase, normalize_for_phrases};
use crate::models::{BonusWeights, ExperienceLevel, JobCandidate, Profile};

/// Upper bound on the combined profile bonus
pub const BONUS_CAP: f64 = 0.30;

/// Upper bound on the free-text query bonus
pub const QUERY_BONUS_CAP: f64 = 0.25;

/// Postings younger than this earn the recency bonus
const RECENT_POST_DAYS: i64 = 7;

/// Keywords that signal each known profile domain in a posting
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("healthcare", &["healthcare", "medical", "clinical", "patient", "hospital"]),
    ("ai_ml", &["machine learning", "ml", "ai", "neural", "deep learning", "nlp"]),
    ("web_dev", &["web", "frontend", "backend", "api", "javascript", "react"]),
];

/// Query terms rewarded when they also appear in the posting
const QUERY_KEYWORDS: &[(&str, f64)] = &[
    ("intern", 0.10),
    ("entry", 0.10),
    ("junior", 0.10),
    ("remote", 0.05),
    ("healthcare", 0.08),
    ("ai", 0.08),
    ("ml", 0.08),
    ("data science", 0.10),
    ("python", 0.05),
];

/// Calculate the heuristic bonus (0-0.30) for a job given a profile
///
/// Bonus components:
///     experience level match        +0.10
///     remote job, entry profile     +0.05
///     shared skills                 +0.05 each, up to 0.15
///     matched profile domains       +0.08 each, up to 0.16
///     posted within 7 days          +0.03
pub fn calculate_bonus(
    profile: &Profile,
    job: &JobCandidate,
    weights: &BonusWeights,
    now: DateTime<Utc>,
) -> f64 {
    let mut bonus = 0.0;

    if profile.experience_level == job.experience_level {
        bonus += weights.experience_match;
    }

    if job.remote && profile.experience_level == ExperienceLevel::Entry {
        bonus += weights.entry_remote;
    }

    let shared = shared_skills(profile, job).len() as f64;
    bonus += (shared * weights.per_skill).min(weights.skill_cap);

    let domains = matched_domains(profile, job).len() as f64;
    bonus += (domains * weights.per_domain).min(weights.domain_cap);

    if is_recent(job.created_at, now) {
        bonus += weights.recency;
    }

    bonus.clamp(0.0, BONUS_CAP)
}

/// Calculate the bonus (0-0.25) for query terms present in both the query and the job text
pub fn calculate_query_bonus(query: &str, job_text: &str) -> f64 {
    let query = normalize_for_phrases(query);
    let job_text = normalize_for_phrases(job_text);

    let bonus: f64 = QUERY_KEYWORDS
        .iter()
        .filter(|(keyword, _)| contains_phrase(&query, keyword) && contains_phrase(&job_text, keyword))
        .map(|(_, points)| points)
        .sum();

    bonus.min(QUERY_BONUS_CAP)
}

/// Skills (lowercased) listed on both the profile and the posting, in profile order
pub fn shared_skills(profile: &Profile, job: &JobCandidate) -> Vec<String> {
    let job_skills: HashSet<String> =
        job.skills_mentioned.iter().map(|s| s.trim().to_lowercase()).collect();

    let mut seen = HashSet::new();
    profile
        .skills
        .iter()
        .map(|skill| skill.name.trim().to_lowercase())
        .filter(|name| job_skills.contains(name) && seen.insert(name.clone()))
        .collect()
}

/// Profile domains whose keywords show up in the posting title, body or skills
///
/// Domains outside the keyword table match on their own name.
pub fn matched_domains(profile: &Profile, job: &JobCandidate) -> Vec<String> {
    let haystack = normalize_for_phrases(&format!(
        "{} {} {}",
        job.title,
        job.body,
        job.skills_mentioned.join(" ")
    ));

    let mut seen = HashSet::new();
    profile
        .domains
        .iter()
        .map(|domain| domain_key(&domain.name))
        .filter(|key| !key.is_empty() && seen.insert(key.clone()))
        .filter(|key| {
            domain_keywords(key)
                .iter()
                .any(|keyword| contains_phrase(&haystack, keyword))
        })
        .collect()
}

fn domain_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' || c == '/' { '_' } else { c })
        .collect()
}

fn domain_keywords(key: &str) -> Vec<String> {
    match DOMAIN_KEYWORDS.iter().find(|(domain, _)| *domain == key) {
        Some((_, keywords)) => keywords.iter().map(|k| k.to_string()).collect(),
        None => vec![key.replace('_', " ")],
    }
}

fn is_recent(created_at: Option<i64>, now: DateTime<Utc>) -> bool {
    let Some(created_at) = created_at else {
        return false;
    };
    match DateTime::<Utc>::from_timestamp(created_at, 0) {
        Some(posted) => now - posted < Duration::days(RECENT_POST_DAYS),
        None => false,
    }
}
