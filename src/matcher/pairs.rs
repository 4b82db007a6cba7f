//! Pair enumeration and cheap pre-filters.

use std::sync::Arc;

use super::candidate::FileCandidate;

/// An unordered pair of candidates awaiting comparison.
pub type CandidatePair = (Arc<FileCandidate>, Arc<FileCandidate>);

/// Enumerate all 2-combinations of the candidate set.
///
/// No pair with itself, no pair repeated with sides swapped: n·(n−1)/2 pairs
/// for n candidates. Pairing is intentionally all-pairs; this tool targets
/// moderate candidate counts, not massive corpora.
#[must_use]
pub fn all_pairs(candidates: &[Arc<FileCandidate>]) -> Vec<CandidatePair> {
    let mut pairs = Vec::with_capacity(candidates.len() * candidates.len().saturating_sub(1) / 2);
    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            pairs.push((Arc::clone(a), Arc::clone(b)));
        }
    }
    pairs
}

/// Whether both sides of a pair share the same file base name.
///
/// Pure and hash-free, applied before any content I/O when name matching is
/// requested.
#[must_use]
pub fn same_name(pair: &CandidatePair) -> bool {
    match (pair.0.file_name(), pair.1.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Apply the optional name-match pre-filter to a pair stream.
#[must_use]
pub fn filter_pairs(pairs: Vec<CandidatePair>, name_match: bool) -> Vec<CandidatePair> {
    if !name_match {
        return pairs;
    }
    let before = pairs.len();
    let pairs: Vec<_> = pairs.into_iter().filter(same_name).collect();
    log::debug!(
        "name-match filter kept {} of {} pairs",
        pairs.len(),
        before
    );
    pairs
}
