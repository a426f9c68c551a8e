//! Normalization of scraped postings into [`JobCandidate`]s
//!
//! Reddit posts and Glassdoor listings carry different fields for the same
//! concepts. Each [`RawJob`] is converted exactly once at ingestion so the
//! matcher only ever sees the canonical shape.

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::core::filters::{contains_phrase, normalize_for_phrases};
use crate::models::{ExperienceLevel, JobCandidate, LOCATION_NOT_SPECIFIED};

const SENIOR_INDICATORS: &[&str] = &[
    "senior", "principal", "staff", "lead", "manager", "director", "5+ years", "7+ years",
    "10+ years", "expert", "architect",
];

const MID_INDICATORS: &[&str] = &[
    "mid level", "mid-level", "experienced", "2-5 years", "3-7 years", "intermediate",
    "associate", "level 2",
];

const REMOTE_KEYWORDS: &[&str] = &[
    "remote", "distributed", "anywhere", "wfh", "work from home", "virtual", "telecommute",
    "home office", "location independent",
];

/// Skills recognized in free text
const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "php", "ruby",
    "swift", "kotlin", "scala", "matlab",
    // Web
    "react", "angular", "vue", "node.js", "html", "css", "bootstrap", "jquery", "webpack",
    // Data & ML
    "sql", "nosql", "pandas", "numpy", "tensorflow", "pytorch", "keras", "scikit-learn",
    "machine learning", "deep learning", "ai", "nlp", "computer vision", "data science",
    "statistics", "tableau", "powerbi",
    // Databases
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "neo4j", "cassandra", "dynamodb",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "git", "terraform", "ansible",
    "linux", "bash",
    // Frameworks
    "django", "flask", "fastapi", "spring", "express", "rails", "streamlit",
    // Tools
    "excel", "jira", "figma",
];

/// Pay patterns, first match wins
const SALARY_PATTERNS: &[&str] = &[
    r"\$(\d+)k?-?\$?(\d+)k?\s*(per|/)?\s*(year|annual|annually)",
    r"\$(\d+,?\d+)\s*-?\s*\$?(\d+,?\d+)?\s*(per|/)?\s*(year|annual|annually)",
    r"(\d+)k?\s*-\s*(\d+)k?\s*(usd|dollars?|salary)",
    r"(\d+)\s*-\s*(\d+)\s*(per hour|/hour|hourly)",
];

const COMPANY_TYPES: &[(&str, &[&str])] = &[
    ("startup", &["startup", "early stage", "seed"]),
    ("enterprise", &["enterprise", "fortune", "multinational"]),
    ("agency", &["agency", "consultancy", "consulting"]),
];

/// City/region patterns, first match wins
const LOCATION_PATTERNS: &[&str] = &[
    r"(new york|nyc|manhattan)",
    r"(san francisco|bay area)",
    r"(los angeles|california)",
    r"(chicago|illinois)",
    r"(seattle|washington)",
    r"(boston|massachusetts)",
    r"(austin|texas)",
    r"(denver|colorado)",
    r"(usa|united states)",
    r"(canada|toronto|vancouver|montreal)",
    r"(united kingdom|london|england)",
    r"(germany|berlin|munich)",
    r"(australia|sydney|melbourne)",
    r"(india|bangalore|bengaluru|mumbai|delhi|pune|hyderabad)",
    r"(remote|anywhere|worldwide)",
];

/// Reddit post as returned by the subreddit scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPost {
    pub title: String,
    #[serde(default, alias = "selftext")]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub subreddit: Option<String>,
}

/// Glassdoor listing as returned by the browser scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlassdoorListing {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Relative age such as "3d", "24h" or "30d+"
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub application_url: Option<String>,
    /// "remote", "hybrid", "on-site"
    #[serde(default)]
    pub remote_type: Option<String>,
}

/// A scraped posting tagged with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawJob {
    Reddit(RedditPost),
    Glassdoor(GlassdoorListing),
}

impl RawJob {
    /// Convert into the canonical candidate shape
    pub fn normalize(self, now: DateTime<Utc>) -> JobCandidate {
        match self {
            RawJob::Reddit(post) => normalize_reddit(post),
            RawJob::Glassdoor(listing) => normalize_glassdoor(listing, now),
        }
    }
}

/// Normalize a batch of raw postings, dropping duplicates
///
/// Two postings are duplicates when they share a URL, or when their titles
/// and companies match after normalization. The first occurrence is kept.
pub fn normalize_jobs(raw_jobs: Vec<RawJob>) -> Vec<JobCandidate> {
    let now = Utc::now();
    let total = raw_jobs.len();
    let mut seen_urls = HashSet::new();
    let mut seen_postings = HashSet::new();

    let jobs: Vec<JobCandidate> = raw_jobs
        .into_iter()
        .map(|raw| raw.normalize(now))
        .filter(|job| {
            let url = job.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
            if let Some(url) = url {
                if !seen_urls.insert(url.to_string()) {
                    return false;
                }
            }
            seen_postings.insert(posting_key(job))
        })
        .collect();

    tracing::debug!("Normalized {} raw postings, {} after removing duplicates", total, jobs.len());
    jobs
}

fn posting_key(job: &JobCandidate) -> (String, String) {
    (
        normalize_for_phrases(&job.title),
        normalize_for_phrases(job.company.as_deref().unwrap_or_default()),
    )
}

fn normalize_reddit(post: RedditPost) -> JobCandidate {
    let text = format!("{} {}", post.title, post.content);
    let normalized = normalize_for_phrases(&text);

    JobCandidate {
        experience_level: extract_experience_level(&text),
        remote: is_remote(&normalized),
        skills_mentioned: extract_skills(&text, &normalized),
        location: extract_location(&text),
        job_type: extract_job_type(&normalized),
        salary: extract_salary(&text),
        company_type: extract_company_type(&normalized),
        company: post.author,
        created_at: post.created_utc.map(|ts| ts as i64),
        url: post.url,
        source: Some(match post.subreddit {
            Some(subreddit) => format!("reddit/r/{}", subreddit),
            None => "reddit".to_string(),
        }),
        body: post.content,
        title: post.title,
    }
}

fn normalize_glassdoor(listing: GlassdoorListing, now: DateTime<Utc>) -> JobCandidate {
    let mut body = listing.description.clone();
    if !listing.requirements.is_empty() {
        body.push_str("\nRequirements: ");
        body.push_str(&listing.requirements.join("; "));
    }

    let text = format!("{} {}", listing.title, body);
    let normalized = normalize_for_phrases(&text);

    let experience_level = match listing.experience_level.as_deref().map(str::trim) {
        Some(level) if !level.is_empty() => extract_experience_level(level),
        _ => extract_experience_level(&text),
    };

    let remote = match listing.remote_type.as_deref() {
        Some(remote_type) => remote_type.to_lowercase().contains("remote"),
        None => is_remote(&normalized),
    };

    let mut skills: BTreeSet<String> = listing
        .technologies
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    skills.extend(extract_skills(&text, &normalized));

    let location = listing
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| extract_location(&text));

    let job_type = listing
        .job_type
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && t != "not-specified")
        .or_else(|| extract_job_type(&normalized));

    let salary = listing
        .salary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| extract_salary(&text));

    JobCandidate {
        title: listing.title,
        body,
        company: listing.company,
        location,
        remote,
        experience_level,
        skills_mentioned: skills.into_iter().collect(),
        created_at: listing.posted_date.as_deref().and_then(|age| parse_posted_age(age, now)),
        job_type,
        salary,
        company_type: extract_company_type(&normalized),
        url: listing.application_url,
        source: Some("glassdoor".to_string()),
    }
}

/// Classify seniority from indicator phrases in a posting's raw text
///
/// Senior indicators win over mid ones. Postings with neither are entry level.
pub fn extract_experience_level(raw: &str) -> ExperienceLevel {
    let lowered = raw.to_lowercase();
    let normalized = normalize_for_phrases(raw);
    let has_any = |terms: &[&str]| terms.iter().any(|term| contains_term(&lowered, &normalized, term));

    if has_any(SENIOR_INDICATORS) {
        ExperienceLevel::Senior
    } else if has_any(MID_INDICATORS) {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Entry
    }
}

pub fn is_remote(normalized: &str) -> bool {
    any_phrase(normalized, REMOTE_KEYWORDS)
}

/// Vocabulary skills found in a posting, lowercased, sorted and deduplicated
pub fn extract_skills(raw: &str, normalized: &str) -> Vec<String> {
    let lowered = raw.to_lowercase();
    let found: BTreeSet<String> = SKILL_VOCABULARY
        .iter()
        .filter(|skill| contains_term(&lowered, normalized, skill))
        .map(|skill| skill.to_string())
        .collect();
    found.into_iter().collect()
}

/// First known location in the text, title-cased, or "Not specified"
pub fn extract_location(raw: &str) -> String {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        LOCATION_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(&format!(r"(?i)\b{}\b", p)).ok())
            .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| title_case(m.as_str()))
        .unwrap_or_else(|| LOCATION_NOT_SPECIFIED.to_string())
}

pub fn extract_job_type(normalized: &str) -> Option<String> {
    let job_type = if any_phrase(normalized, &["intern", "internship"]) {
        "internship"
    } else if any_phrase(normalized, &["full-time", "full time", "permanent"]) {
        "full-time"
    } else if any_phrase(normalized, &["part-time", "part time"]) {
        "part-time"
    } else if any_phrase(normalized, &["contract", "freelance", "consultant"]) {
        "contract"
    } else {
        return None;
    };
    Some(job_type.to_string())
}

/// Pay range quoted in the posting, e.g. "$80k-$100k per year"
pub fn extract_salary(raw: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        SALARY_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(&format!("(?i){}", p)).ok())
            .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.find(raw))
        .map(|m| m.as_str().trim().to_string())
}

/// Company size hint: startup, enterprise or agency
pub fn extract_company_type(normalized: &str) -> Option<String> {
    COMPANY_TYPES
        .iter()
        .find(|(_, terms)| any_phrase(normalized, terms))
        .map(|(company_type, _)| company_type.to_string())
}

fn any_phrase(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(normalized, phrase))
}

/// Terms carrying symbols ("c++", "5+ years", "2-5 years") match the raw
/// lowercased text since phrase normalization strips those symbols.
fn contains_term(lowered: &str, normalized: &str, term: &str) -> bool {
    if term.contains(['+', '#', '-']) {
        lowered.contains(term)
    } else {
        contains_phrase(normalized, term)
    }
}

/// Turn a relative age like "3d", "24h" or "30d+" into a unix timestamp
fn parse_posted_age(age: &str, now: DateTime<Utc>) -> Option<i64> {
    let age = age.trim().trim_end_matches('+').to_lowercase();
    let split = age.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = age.split_at(split);
    let amount: i64 = amount.parse().ok()?;

    let delta = match unit.trim() {
        "h" | "hr" | "hrs" | "hours" => Duration::try_hours(amount)?,
        "d" | "day" | "days" => Duration::try_days(amount)?,
        _ => return None,
    };
    now.checked_sub_signed(delta).map(|posted| posted.timestamp())
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reddit(title: &str, content: &str) -> RawJob {
        RawJob::Reddit(RedditPost {
            title: title.to_string(),
            content: content.to_string(),
            author: Some("acme_hr".to_string()),
            url: Some("https://reddit.com/r/jobs/abc".to_string()),
            created_utc: Some(1_700_000_000.0),
            subreddit: Some("forhire".to_string()),
        })
    }

    #[test]
    fn test_experience_level_precedence() {
        let level = extract_experience_level;

        assert_eq!(level("Senior engineer, mentoring interns"), ExperienceLevel::Senior);
        assert_eq!(level("Mid-level backend role"), ExperienceLevel::Mid);
        assert_eq!(level("Summer internship for students"), ExperienceLevel::Entry);
        assert_eq!(level("Backend developer"), ExperienceLevel::Entry);
        assert_eq!(level("Needs 10+ years of Go"), ExperienceLevel::Senior);
    }

    #[test]
    fn test_experience_ranges_are_mid() {
        assert_eq!(extract_experience_level("Data analyst, 2-5 years experience"), ExperienceLevel::Mid);
        assert_eq!(extract_experience_level("Backend role, 3-7 years with Go"), ExperienceLevel::Mid);
        assert_eq!(extract_experience_level("Backend role, 5+ years with Go"), ExperienceLevel::Senior);
    }

    #[test]
    fn test_extract_salary_and_company_type() {
        assert_eq!(
            extract_salary("Paying $80k-$100k per year plus equity").as_deref(),
            Some("$80k-$100k per year")
        );
        assert_eq!(extract_salary("Contract work, 25-40 per hour").as_deref(), Some("25-40 per hour"));
        assert_eq!(extract_salary("Competitive pay"), None);

        let company = |text: &str| extract_company_type(&normalize_for_phrases(text));
        assert_eq!(company("Seed-funded startup in Pune").as_deref(), Some("startup"));
        assert_eq!(company("Fortune 500 bank").as_deref(), Some("enterprise"));
        assert_eq!(company("Small design agency").as_deref(), Some("agency"));
        assert_eq!(company("We build tools"), None);
    }

    #[test]
    fn test_normalize_jobs_removes_duplicates() {
        let with_url = |title: &str, url: &str| match reddit(title, "Remote internship") {
            RawJob::Reddit(post) => RawJob::Reddit(RedditPost { url: Some(url.to_string()), ..post }),
            other => other,
        };
        let glassdoor: RawJob = serde_json::from_str(
            r#"{"source": "glassdoor", "title": "Python Intern", "company": "Other Co",
                "application_url": "https://reddit.com/r/jobs/abc"}"#,
        )
        .unwrap();

        let jobs = normalize_jobs(vec![
            reddit("[Hiring] Python Intern", "Remote internship"),
            // Same title and author under a new link
            with_url("[Hiring] Python Intern", "https://reddit.com/r/jobs/def"),
            // Same link as the first post
            glassdoor,
            with_url("[Hiring] Rust Intern", "https://reddit.com/r/jobs/ghi"),
        ]);

        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["[Hiring] Python Intern", "[Hiring] Rust Intern"]);
    }

    #[test]
    fn test_extract_skills() {
        let text = "Looking for Python/SQL devs, C++ a plus. Node.js welcome. Must email us.";
        let skills = extract_skills(text, &normalize_for_phrases(text));
        assert_eq!(skills, vec!["c++", "node.js", "python", "sql"]);
    }

    #[test]
    fn test_extract_location() {
        assert_eq!(extract_location("Hybrid role based in BANGALORE, India"), "Bangalore");
        assert_eq!(extract_location("Office in San Francisco"), "San Francisco");
        assert_eq!(extract_location("We are a small placement agency"), LOCATION_NOT_SPECIFIED);
    }

    #[test]
    fn test_normalize_reddit_post() {
        let job = reddit(
            "[Hiring] Python Intern",
            "Remote internship,\npython and pandas required. Based in Toronto.",
        )
        .normalize(Utc::now());

        assert_eq!(job.title, "[Hiring] Python Intern");
        assert!(job.remote);
        assert_eq!(job.experience_level, ExperienceLevel::Entry);
        assert_eq!(job.skills_mentioned, vec!["pandas", "python"]);
        assert_eq!(job.location, "Toronto");
        assert_eq!(job.job_type.as_deref(), Some("internship"));
        assert_eq!(job.company.as_deref(), Some("acme_hr"));
        assert_eq!(job.created_at, Some(1_700_000_000));
        assert_eq!(job.source.as_deref(), Some("reddit/r/forhire"));
    }

    #[test]
    fn test_normalize_glassdoor_listing() {
        let now = Utc::now();
        let raw: RawJob = serde_json::from_str(
            r#"{"source": "glassdoor", "title": "Data Analyst", "company": "Acme",
                "location": "Mumbai", "salary": " 6L - 9L per annum ",
                "description": "Work with Tableau dashboards at a consulting firm",
                "requirements": ["SQL"], "experience_level": "mid level",
                "technologies": ["Excel", "Tableau"], "posted_date": "3d",
                "remote_type": "on-site"}"#,
        )
        .unwrap();

        let job = raw.normalize(now);

        assert_eq!(job.location, "Mumbai");
        assert!(!job.remote);
        assert_eq!(job.experience_level, ExperienceLevel::Mid);
        assert_eq!(job.skills_mentioned, vec!["excel", "sql", "tableau"]);
        assert_eq!(job.created_at, Some((now - Duration::days(3)).timestamp()));
        assert!(job.body.contains("Requirements: SQL"));
        assert_eq!(job.salary.as_deref(), Some("6L - 9L per annum"));
        assert_eq!(job.company_type.as_deref(), Some("agency"));
        assert_eq!(job.source.as_deref(), Some("glassdoor"));
    }

    #[test]
    fn test_parse_posted_age() {
        let now = Utc::now();
        assert_eq!(parse_posted_age("24h", now), Some((now - Duration::hours(24)).timestamp()));
        assert_eq!(parse_posted_age("30d+", now), Some((now - Duration::days(30)).timestamp()));
        assert_eq!(parse_posted_age("yesterday", now), None);
        assert_eq!(parse_posted_age("12", now), None);
    }

    #[test]
    fn test_absurd_posting_age_is_ignored() {
        let now = Utc::now();
        assert_eq!(parse_posted_age("999999999d", now), None);
        assert_eq!(parse_posted_age("99999999999999h", now), None);
        assert_eq!(parse_posted_age("99999999999999999999d", now), None);

        let raw: RawJob = serde_json::from_str(
            r#"{"source": "glassdoor", "title": "Analyst", "posted_date": "999999999d"}"#,
        )
        .unwrap();
        assert_eq!(raw.normalize(now).created_at, None);
    }
}
