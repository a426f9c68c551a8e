use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::DEFAULT_MODEL;
use crate::models::BonusWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub profiles: ProfileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), workers: None }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Embedding model; an empty name selects lexical similarity
    #[serde(default = "default_model_name")]
    pub model_name: Option<String>,
    #[serde(default = "default_top_k")]
    pub default_top_k: u16,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: u16,
    pub min_score: Option<f64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            min_score: None,
        }
    }
}

impl MatchingSettings {
    /// Configured embedding model, `None` when lexical similarity was chosen
    pub fn embedding_model(&self) -> Option<&str> {
        self.model_name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Resolve a requested top-K against the configured default and ceiling
    pub fn effective_top_k(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_top_k).min(self.max_top_k) as usize
    }
}

fn default_model_name() -> Option<String> { Some(DEFAULT_MODEL.to_string()) }
fn default_top_k() -> u16 { 10 }
fn default_max_top_k() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub bonus: BonusConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BonusConfig {
    #[serde(default = "default_experience_match")]
    pub experience_match: f64,
    #[serde(default = "default_entry_remote")]
    pub entry_remote: f64,
    #[serde(default = "default_per_skill")]
    pub per_skill: f64,
    #[serde(default = "default_skill_cap")]
    pub skill_cap: f64,
    #[serde(default = "default_per_domain")]
    pub per_domain: f64,
    #[serde(default = "default_domain_cap")]
    pub domain_cap: f64,
    #[serde(default = "default_recency")]
    pub recency: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            experience_match: default_experience_match(),
            entry_remote: default_entry_remote(),
            per_skill: default_per_skill(),
            skill_cap: default_skill_cap(),
            per_domain: default_per_domain(),
            domain_cap: default_domain_cap(),
            recency: default_recency(),
        }
    }
}

impl From<&BonusConfig> for BonusWeights {
    fn from(config: &BonusConfig) -> Self {
        Self {
            experience_match: config.experience_match,
            entry_remote: config.entry_remote,
            per_skill: config.per_skill,
            skill_cap: config.skill_cap,
            per_domain: config.per_domain,
            domain_cap: config.domain_cap,
            recency: config.recency,
        }
    }
}

fn default_experience_match() -> f64 { 0.10 }
fn default_entry_remote() -> f64 { 0.05 }
fn default_per_skill() -> f64 { 0.05 }
fn default_skill_cap() -> f64 { 0.15 }
fn default_per_domain() -> f64 { 0.08 }
fn default_domain_cap() -> f64 { 0.16 }
fn default_recency() -> f64 { 0.03 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: default_cache_capacity(), ttl_secs: default_cache_ttl() }
    }
}

fn default_cache_capacity() -> u64 { 1000 }
fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSettings {
    /// JSON file with an array of profiles loaded at startup
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    pub fn bonus_weights(&self) -> BonusWeights {
        BonusWeights::from(&self.scoring.bonus)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("JOBMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
