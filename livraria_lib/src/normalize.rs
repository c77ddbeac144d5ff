//! Title normalization and slug derivation.
//!
//! Titles vary between scrape passes: accents, smart quotes, dash variants,
//! trailing punctuation, stray whitespace. Everything that compares titles
//! goes through [`normalize_title`] first so those variations never cause a
//! false mismatch. NFD decomposition handles accented letters generically,
//! but subscript/superscript digits do not decompose to ASCII digits, so
//! those are folded explicitly (`H₂O` must compare equal to `H2O`).

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Subscript/superscript digits folded to their ASCII counterpart.
fn fold_digit(c: char) -> Option<char> {
    match c {
        '₀'..='₉' => char::from_u32('0' as u32 + (c as u32 - '₀' as u32)),
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴'..='⁹' => char::from_u32('4' as u32 + (c as u32 - '⁴' as u32)),
        _ => None,
    }
}

/// Canonical comparison form of a title: lowercase, diacritics dropped,
/// quotes and sentence punctuation removed, dash variants unified, digits
/// unfolded, whitespace collapsed. Pure and idempotent. Empty or
/// whitespace-only input normalizes to the empty string, which never
/// matches any non-empty key.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if let Some(digit) = fold_digit(c) {
            out.push(digit);
            continue;
        }
        match c {
            '\u{2014}' | '\u{2013}' | '\u{2012}' | '\u{2212}' => out.push('-'),
            '"' | '\'' | '`' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'
            | '\u{201E}' | '«' | '»' => {}
            ':' | ';' | '?' | '!' | '.' => {}
            _ => out.extend(c.to_lowercase()),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// URL-safe identifier derived from a title: the normalized form reduced to
/// `[a-z0-9]` words joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let normalized = normalize_title(title);
    let mut mapped = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            'a'..='z' | '0'..='9' => mapped.push(c),
            ' ' | '-' | '_' => mapped.push('-'),
            _ => {}
        }
    }
    mapped
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
