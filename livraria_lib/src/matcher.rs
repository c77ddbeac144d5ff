//! Best-match selection of a title against a pool of catalog records.

use std::collections::HashSet;

use crate::catalog::Product;
use crate::error::LivrariaError;
use crate::normalize::normalize_title;
use crate::similarity;

/// Default acceptance threshold. An empirical choice carried over from the
/// import scripts, not a domain constant; override it via [`MatchConfig`].
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// Matching parameters shared by every call site.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Minimum similarity score for a match to be accepted.
    pub threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(threshold: f64) -> Result<Self, LivrariaError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LivrariaError::InvalidInput(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }
}

/// Outcome of one best-match scan. `index` is set only when the best score
/// met the threshold; the best score and candidate title are always
/// reported so callers can log near misses.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub index: Option<usize>,
    pub best_score: f64,
    pub best_title: Option<String>,
}

impl MatchOutcome {
    fn miss() -> Self {
        Self {
            index: None,
            best_score: 0.0,
            best_title: None,
        }
    }
}

/// Scan `candidates` in order for the record whose title best matches
/// `target`, skipping indices in `taken` and records without a usable
/// title. Ties keep the first-seen candidate so repeated runs over the
/// same list stay deterministic; a score of 1.0 short-circuits the scan.
pub fn best_match(
    target: &str,
    candidates: &[Product],
    taken: &HashSet<usize>,
    config: &MatchConfig,
) -> MatchOutcome {
    let normalized_target = normalize_title(target);
    if normalized_target.is_empty() {
        return MatchOutcome::miss();
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        if taken.contains(&idx) {
            continue;
        }
        let normalized_candidate = normalize_title(&candidate.title);
        if normalized_candidate.is_empty() {
            // no title, cannot be a match candidate
            continue;
        }
        let score = similarity::score(&normalized_target, &normalized_candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
        if score >= 1.0 {
            break;
        }
    }

    match best {
        Some((idx, score)) => MatchOutcome {
            index: (score >= config.threshold).then_some(idx),
            best_score: score,
            best_title: Some(candidates[idx].title.clone()),
        },
        None => MatchOutcome::miss(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(titles: &[&str]) -> Vec<Product> {
        titles.iter().map(|t| Product::new(*t)).collect()
    }

    #[test]
    fn test_exact_match_short_circuits() {
        let pool = products(&["Mil platôs", "Sonhos em série", "Sonhos em série"]);
        let outcome = best_match("Sonhos em serie", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome.index, Some(1));
        assert_eq!(outcome.best_score, 1.0);
    }

    #[test]
    fn test_score_at_threshold_is_accepted() {
        // bigram ratio is exactly 14/20 = 0.7
        let pool = products(&["abcdefghxyz"]);
        let outcome = best_match("abcdefghijk", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome.index, Some(0));
        assert!((outcome.best_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_score_below_threshold_is_rejected_but_reported() {
        // bigram ratio is 18/26 ≈ 0.692
        let pool = products(&["abcdefghijwxyz"]);
        let outcome = best_match("abcdefghijklmn", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome.index, None);
        assert!(outcome.best_score > 0.69 && outcome.best_score < 0.7);
        assert_eq!(outcome.best_title.as_deref(), Some("abcdefghijwxyz"));
    }

    #[test]
    fn test_first_seen_wins_on_tie() {
        let pool = products(&["abcdefghijz", "abcdefghijz"]);
        let outcome = best_match("abcdefghijk", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome.index, Some(0));
    }

    #[test]
    fn test_taken_indices_are_skipped() {
        let pool = products(&["Sonhos em série", "Sonhos em série"]);
        let taken: HashSet<usize> = [0].into_iter().collect();
        let outcome = best_match("Sonhos em série", &pool, &taken, &MatchConfig::default());
        assert_eq!(outcome.index, Some(1));
    }

    #[test]
    fn test_empty_target_never_matches() {
        let pool = products(&["Sonhos em série", ""]);
        let outcome = best_match("", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome, MatchOutcome::miss());
    }

    #[test]
    fn test_untitled_candidates_are_skipped() {
        let pool = products(&["", "   ", "Mil platôs"]);
        let outcome = best_match("Mil platôs", &pool, &HashSet::new(), &MatchConfig::default());
        assert_eq!(outcome.index, Some(2));
    }

    #[test]
    fn test_custom_threshold() {
        let config = MatchConfig::with_threshold(0.6).unwrap();
        let pool = products(&["abcdefghijwxyz"]);
        let outcome = best_match("abcdefghijklmn", &pool, &HashSet::new(), &config);
        assert_eq!(outcome.index, Some(0));
    }

    #[test]
    fn test_threshold_validation() {
        assert!(MatchConfig::with_threshold(1.5).is_err());
        assert!(MatchConfig::with_threshold(-0.1).is_err());
        assert!(MatchConfig::with_threshold(0.0).is_ok());
    }
}
