use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Seniority bucket shared by profiles and job postings
///
/// Anything other than `mid` or `senior` (including a missing value)
/// deserializes to `Entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "mid" => ExperienceLevel::Mid,
            "senior" => ExperienceLevel::Senior,
            _ => ExperienceLevel::Entry,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ExperienceLevel::parse).unwrap_or_default())
    }
}

/// Skill proficiency as reported by the resume parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Proficiency::Beginner,
            "advanced" => Proficiency::Advanced,
            "expert" => Proficiency::Expert,
            _ => Proficiency::Intermediate,
        }
    }
}

impl<'de> Deserialize<'de> for Proficiency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Proficiency::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(alias = "skill")]
    pub name: String,
    #[serde(default)]
    pub proficiency: Proficiency,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(alias = "domain")]
    pub name: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
}

fn default_confidence() -> f64 { 1.0 }

/// Structured resume profile, the query side of matching
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Opaque user identifier (an email in practice)
    #[serde(rename = "userId", alias = "email", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "experienceLevel", alias = "experience_level", default)]
    pub experience_level: ExperienceLevel,
    #[serde(rename = "educationLevel", alias = "education_level", default)]
    pub education_level: Option<String>,
    #[serde(rename = "fieldOfStudy", alias = "field_of_study", default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Location placeholder used when a posting doesn't state one
pub const LOCATION_NOT_SPECIFIED: &str = "Not specified";

fn default_location() -> String { LOCATION_NOT_SPECIFIED.to_string() }

/// Canonical job posting, the document side of matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCandidate {
    pub title: String,
    #[serde(alias = "content", alias = "description", default)]
    pub body: String,
    #[serde(alias = "author", default)]
    pub company: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(rename = "experienceLevel", alias = "experience_level", default)]
    pub experience_level: ExperienceLevel,
    #[serde(rename = "skillsMentioned", alias = "skills_mentioned", default)]
    pub skills_mentioned: Vec<String>,
    /// Unix timestamp (seconds)
    #[serde(rename = "createdAt", alias = "created_utc", default)]
    pub created_at: Option<i64>,
    /// internship, full-time, part-time, contract
    #[serde(rename = "jobType", alias = "job_type", default)]
    pub job_type: Option<String>,
    /// Pay as quoted in the posting
    #[serde(default)]
    pub salary: Option<String>,
    /// startup, enterprise, agency
    #[serde(rename = "companyType", alias = "company_type", default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl JobCandidate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            company: None,
            location: default_location(),
            remote: false,
            experience_level: ExperienceLevel::Entry,
            skills_mentioned: vec![],
            created_at: None,
            job_type: None,
            salary: None,
            company_type: None,
            url: None,
            source: None,
        }
    }
}

/// Scored job match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub job: JobCandidate,
    #[serde(rename = "similarityScore")]
    pub similarity_score: f64,
    #[serde(rename = "bonusScore")]
    pub bonus_score: f64,
    #[serde(rename = "finalScore")]
    pub final_score: f64,
    pub explanation: String,
}

/// Bonus increments added on top of similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusWeights {
    pub experience_match: f64,
    pub entry_remote: f64,
    pub per_skill: f64,
    pub skill_cap: f64,
    pub per_domain: f64,
    pub domain_cap: f64,
    pub recency: f64,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            experience_match: 0.10,
            entry_remote: 0.05,
            per_skill: 0.05,
            skill_cap: 0.15,
            per_domain: 0.08,
            domain_cap: 0.16,
            recency: 0.03,
        }
    }
}

/// Ranking knobs supplied per call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub top_k: usize,
    /// Results scoring below this are dropped after ranking
    pub min_score: Option<f64>,
}

impl RankOptions {
    pub fn top(top_k: usize) -> Self {
        Self { top_k, min_score: None }
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self { top_k: 10, min_score: None }
    }
}
