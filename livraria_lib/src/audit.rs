//! Read-only data-quality checks over a stored catalog.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{Product, ReferenceEntry};
use crate::matcher::{best_match, MatchConfig};

/// Invariant violations found in a catalog. Slugs are supposed to be
/// unique; titles are supposed to be present. Neither is enforced at
/// write time, so drift gets caught here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub record_count: usize,
    /// `(slug, occurrences)` for every slug appearing more than once.
    pub duplicate_slugs: Vec<(String, usize)>,
    /// Indices of records with a missing or empty title.
    pub missing_titles: Vec<usize>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_slugs.is_empty() && self.missing_titles.is_empty()
    }
}

pub fn audit_catalog(catalog: &[Product]) -> AuditReport {
    let mut slug_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut missing_titles = Vec::new();

    for (idx, product) in catalog.iter().enumerate() {
        if let Some(slug) = product.slug.as_deref().filter(|s| !s.is_empty()) {
            *slug_counts.entry(slug).or_insert(0) += 1;
        }
        if !product.has_title() {
            missing_titles.push(idx);
        }
    }

    AuditReport {
        record_count: catalog.len(),
        duplicate_slugs: slug_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(slug, count)| (slug.to_string(), count))
            .collect(),
        missing_titles,
    }
}

/// One reference position compared against the stored catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCheck {
    pub position: usize,
    pub reference_title: String,
    /// Title of the record the reference entry matched, if any.
    pub catalog_title: Option<String>,
    pub score: f64,
    /// Whether the matched record already sits at this position.
    pub in_place: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReport {
    pub checks: Vec<OrderCheck>,
    pub in_place: usize,
    pub out_of_place: usize,
    pub missing: usize,
}

/// Verify that the stored catalog follows the reference ordering, using
/// the same consumed-index discipline as a real reorder so the verdict
/// predicts what `reorder` would do.
pub fn check_order(
    catalog: &[Product],
    reference: &[ReferenceEntry],
    config: &MatchConfig,
) -> OrderReport {
    let mut taken: HashSet<usize> = HashSet::new();
    let mut checks = Vec::with_capacity(reference.len());
    let mut in_place = 0;
    let mut out_of_place = 0;
    let mut missing = 0;

    for (position, entry) in reference.iter().enumerate() {
        let outcome = best_match(&entry.title, catalog, &taken, config);
        let check = match outcome.index {
            Some(idx) => {
                taken.insert(idx);
                let placed = idx == position;
                if placed {
                    in_place += 1;
                } else {
                    out_of_place += 1;
                }
                OrderCheck {
                    position,
                    reference_title: entry.title.clone(),
                    catalog_title: Some(catalog[idx].title.clone()),
                    score: outcome.best_score,
                    in_place: placed,
                }
            }
            None => {
                missing += 1;
                OrderCheck {
                    position,
                    reference_title: entry.title.clone(),
                    catalog_title: None,
                    score: outcome.best_score,
                    in_place: false,
                }
            }
        };
        checks.push(check);
    }

    OrderReport {
        checks,
        in_place,
        out_of_place,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_slug(title: &str, slug: &str) -> Product {
        let mut p = Product::new(title);
        p.slug = Some(slug.into());
        p
    }

    #[test]
    fn test_duplicate_slugs_detected() {
        let catalog = vec![
            with_slug("um livro", "um-livro"),
            with_slug("dois livros", "dois-livros"),
            with_slug("um livro (2a ed)", "um-livro"),
        ];
        let report = audit_catalog(&catalog);
        assert_eq!(report.duplicate_slugs, vec![("um-livro".to_string(), 2)]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_missing_titles_reported_by_index() {
        let catalog = vec![Product::new("um livro"), Product::new(""), Product::new("  ")];
        let report = audit_catalog(&catalog);
        assert_eq!(report.missing_titles, vec![1, 2]);
    }

    #[test]
    fn test_clean_catalog() {
        let catalog = vec![with_slug("um livro", "um-livro")];
        assert!(audit_catalog(&catalog).is_clean());
    }

    #[test]
    fn test_order_check_flags_misplaced_records() {
        let catalog = vec![
            Product::new("dois livros"),
            Product::new("um livro"),
            Product::new("tres livros"),
        ];
        let reference = vec![
            ReferenceEntry::new("um livro"),
            ReferenceEntry::new("dois livros"),
            ReferenceEntry::new("tres livros"),
        ];
        let report = check_order(&catalog, &reference, &MatchConfig::default());
        assert_eq!(report.in_place, 1);
        assert_eq!(report.out_of_place, 2);
        assert_eq!(report.missing, 0);
        assert!(report.checks[2].in_place);
    }

    #[test]
    fn test_order_check_reports_missing_with_score() {
        let catalog = vec![Product::new("um livro")];
        let reference = vec![ReferenceEntry::new("obra que nunca existiu")];
        let report = check_order(&catalog, &reference, &MatchConfig::default());
        assert_eq!(report.missing, 1);
        assert_eq!(report.checks[0].catalog_title, None);
        assert!(report.checks[0].score < 0.7);
    }
}
