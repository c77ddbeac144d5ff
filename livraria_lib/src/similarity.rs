//! Similarity scoring between normalized titles.

/// Containment is only trusted when the shorter side is long enough to be
/// a meaningful title fragment; below this, single words like "o" or "a"
/// would swallow everything.
const MIN_CONTAINMENT_LEN: usize = 5;

/// Score how likely two titles refer to the same product. Both inputs must
/// already be normalized (see [`crate::normalize::normalize_title`]).
///
/// Tiers, first applicable wins:
/// 1. either side empty → 0.0 (an empty key matches nothing, including
///    another empty key);
/// 2. exact equality → 1.0;
/// 3. one string contains the other → 1.0, the better directional ratio:
///    the shorter title is reproduced verbatim inside the longer one, which
///    is how subtitle truncation shows up between scrape passes;
/// 4. otherwise the Sørensen–Dice bigram ratio, 2·matches/(len_a+len_b).
///
/// Symmetric in its arguments for every tier.
pub fn score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let shorter = a.chars().count().min(b.chars().count());
    if shorter >= MIN_CONTAINMENT_LEN && (a.contains(b) || b.contains(a)) {
        return 1.0;
    }
    strsim::sorensen_dice(a, b)
}
