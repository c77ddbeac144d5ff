//! Reordering a catalog against a reference title list.
//!
//! The reorder is a total function: every input record appears exactly once
//! in the output, matched records in reference order first, unmatched
//! records after them in their original relative order. A low match rate is
//! surfaced through the report, never as an error.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Product, ReferenceEntry};
use crate::matcher::{best_match, MatchConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderOptions {
    pub config: MatchConfig,
    /// Overwrite a matched record's slug when the reference entry carries one.
    pub update_slugs: bool,
    /// Overwrite a matched record's cover image when the reference entry
    /// carries one.
    pub update_covers: bool,
    /// Fabricate a stub record for reference titles with no match.
    pub create_stubs: bool,
}

/// A reference entry that found no confident match, with the best score
/// seen while scanning (near-miss telemetry for the operator).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedReference {
    pub title: String,
    pub best_score: f64,
    pub best_title: Option<String>,
}

#[derive(Debug)]
pub struct ReorderReport {
    pub catalog: Vec<Product>,
    pub matched: usize,
    pub unmatched_references: Vec<UnmatchedReference>,
    pub stubs_created: usize,
    pub updated_slugs: usize,
    pub updated_covers: usize,
}

/// Produce a new catalog ordered by `reference`. Matched records are
/// consumed through an index exclusion set, so each record is placed at
/// most once and the output length is always
/// `catalog.len() + stubs_created`.
pub fn reorder(
    catalog: Vec<Product>,
    reference: &[ReferenceEntry],
    options: &ReorderOptions,
) -> ReorderReport {
    let mut taken: HashSet<usize> = HashSet::new();
    let mut ordered: Vec<Product> = Vec::with_capacity(catalog.len());
    let mut matched = 0;
    let mut unmatched_references = Vec::new();
    let mut stubs_created = 0;
    let mut updated_slugs = 0;
    let mut updated_covers = 0;

    for entry in reference {
        let outcome = best_match(&entry.title, &catalog, &taken, &options.config);
        match outcome.index {
            Some(idx) => {
                taken.insert(idx);
                let mut product = catalog[idx].clone();
                if options.update_slugs {
                    if let Some(slug) = entry.slug.as_ref().filter(|s| !s.is_empty()) {
                        if product.slug.as_deref() != Some(slug.as_str()) {
                            product.slug = Some(slug.clone());
                            updated_slugs += 1;
                        }
                    }
                }
                if options.update_covers {
                    if let Some(cover) = entry.cover_image.as_ref().filter(|c| !c.is_empty()) {
                        if product.image.as_deref() != Some(cover.as_str()) {
                            product.image = Some(cover.clone());
                            updated_covers += 1;
                        }
                    }
                }
                debug!(title = %entry.title, score = outcome.best_score, "reference title matched");
                matched += 1;
                ordered.push(product);
            }
            None => {
                warn!(
                    title = %entry.title,
                    best_score = outcome.best_score,
                    closest = outcome.best_title.as_deref().unwrap_or("-"),
                    "no confident match for reference title"
                );
                unmatched_references.push(UnmatchedReference {
                    title: entry.title.clone(),
                    best_score: outcome.best_score,
                    best_title: outcome.best_title,
                });
                if options.create_stubs {
                    ordered.push(Product::stub_from_reference(entry));
                    stubs_created += 1;
                }
            }
        }
    }

    // leftover records keep their original relative order
    for (idx, product) in catalog.into_iter().enumerate() {
        if !taken.contains(&idx) {
            ordered.push(product);
        }
    }

    info!(
        matched,
        unmatched = unmatched_references.len(),
        stubs = stubs_created,
        total = ordered.len(),
        "reorder complete"
    );

    ReorderReport {
        catalog: ordered,
        matched,
        unmatched_references,
        stubs_created,
        updated_slugs,
        updated_covers,
    }
}
