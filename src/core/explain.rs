use std::collections::HashSet;

/// Tokens too generic to be worth reporting as shared keywords
const EXPLANATION_STOP_WORDS: &[&str] =
    &["with", "have", "been", "this", "that", "they", "them", "were", "will", "work"];

const MAX_SHARED_KEYWORDS: usize = 5;

/// Human-readable label for a final score
pub fn score_band(score: f64) -> &'static str {
    if score > 0.7 {
        "Excellent match"
    } else if score > 0.5 {
        "Good match"
    } else if score > 0.3 {
        "Moderate match"
    } else {
        "Limited match"
    }
}

/// Meaningful whitespace tokens (lowercased, longer than 3 chars) shared by both texts
///
/// Ordered by first appearance in `job_text`, at most five.
pub fn shared_keywords(profile_text: &str, job_text: &str) -> Vec<String> {
    let profile_tokens: HashSet<String> =
        profile_text.split_whitespace().map(str::to_lowercase).collect();

    let mut seen = HashSet::new();
    job_text
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 3)
        .filter(|token| !EXPLANATION_STOP_WORDS.contains(&token.as_str()))
        .filter(|token| profile_tokens.contains(token))
        .filter(|token| seen.insert(token.clone()))
        .take(MAX_SHARED_KEYWORDS)
        .collect()
}

/// Explain a match, e.g. `Good match. Common keywords: python, remote`
pub fn explain_match(profile_text: &str, job_text: &str, final_score: f64) -> String {
    let band = score_band(final_score);
    let keywords = shared_keywords(profile_text, job_text);
    if keywords.is_empty() {
        band.to_string()
    } else {
        format!("{}. Common keywords: {}", band, keywords.join(", "))
    }
}
