use crate::models::MatchResult;

/// Lowercase a text and replace every non-alphanumeric run with a single space
///
/// The result is padded with a space on both ends so [`contains_phrase`] can
/// match whole words at the edges.
pub fn normalize_for_phrases(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len() + 2);
    normalized.push(' ');
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            normalized.extend(c.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            normalized.push(' ');
            last_was_space = true;
        }
    }
    if !last_was_space {
        normalized.push(' ');
    }
    normalized
}

/// Check whether a normalized text contains a phrase on word boundaries
///
/// `normalized` must come from [`normalize_for_phrases`].
#[inline]
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let needle = normalize_for_phrases(phrase);
    if needle.trim().is_empty() {
        return false;
    }
    normalized.contains(&needle)
}

/// Drop ranked results scoring below a threshold
///
/// Applied after scoring and sorting so the ranking itself never depends on
/// the threshold.
pub fn apply_min_score(results: Vec<MatchResult>, min_score: Option<f64>) -> Vec<MatchResult> {
    match min_score {
        Some(min) => results.into_iter().filter(|r| r.final_score >= min).collect(),
        None => results,
    }
}
