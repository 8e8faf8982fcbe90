//! Fuzzy anchor suggestions.

use strsim::normalized_levenshtein;

/// Rank `candidates` by normalized Levenshtein similarity to `target`.
///
/// Keeps candidates scoring at least `threshold`, removes duplicates (first
/// occurrence wins), orders by descending score with a stable sort and
/// returns at most `limit` of them.
#[must_use]
pub fn rank_similar<'a, I>(target: &str, candidates: I, threshold: f64, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut scored: Vec<(&str, f64)> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(*candidate))
        .map(|candidate| (candidate, normalized_levenshtein(target, candidate)))
        .filter(|(_, score)| *score >= threshold)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(limit)
        .map(|(candidate, _)| candidate.to_string())
        .collect()
}
