//! Upsert of freshly scraped records into a stored catalog.
//!
//! A scraped record either corresponds to an already-imported entry (update
//! its fields in place, order untouched) or is new (append). Re-running the
//! same import converges: the second pass matches the record it wrote and
//! changes nothing.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::catalog::Product;
use crate::matcher::{best_match, MatchConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub config: MatchConfig,
    /// Only set fields the stored record is missing; never replace an
    /// existing value.
    pub fill_only: bool,
    /// Allow a matched record's slug to be replaced. Slugs are referenced
    /// by storefront permalinks, so they stay stable by default.
    pub overwrite_slug: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The incoming record matched an existing entry at `index`.
    Updated {
        index: usize,
        score: f64,
        fields_changed: usize,
    },
    /// No confident match; the record was appended to the end.
    Appended,
}

/// Reconcile one scraped record against the stored collection.
pub fn merge_record(
    catalog: &mut Vec<Product>,
    incoming: Product,
    options: &MergeOptions,
) -> MergeOutcome {
    let outcome = best_match(&incoming.title, catalog, &HashSet::new(), &options.config);
    match outcome.index {
        Some(idx) => {
            let fields_changed = update_product(&mut catalog[idx], &incoming, options);
            debug!(
                title = %incoming.title,
                score = outcome.best_score,
                fields_changed,
                "scraped record merged into existing entry"
            );
            MergeOutcome::Updated {
                index: idx,
                score: outcome.best_score,
                fields_changed,
            }
        }
        None => {
            debug!(
                title = %incoming.title,
                best_score = outcome.best_score,
                "scraped record appended as new entry"
            );
            catalog.push(incoming);
            MergeOutcome::Appended
        }
    }
}

fn update_string(existing: &mut Option<String>, incoming: &Option<String>, fill_only: bool) -> usize {
    match incoming {
        Some(value) if !value.is_empty() => {
            if existing.as_deref() == Some(value.as_str()) {
                return 0;
            }
            if fill_only && existing.as_ref().is_some_and(|v| !v.is_empty()) {
                return 0;
            }
            *existing = Some(value.clone());
            1
        }
        _ => 0,
    }
}

fn update_product(existing: &mut Product, incoming: &Product, options: &MergeOptions) -> usize {
    let mut changed = 0;

    // a matched record with a fuller title keeps the incoming spelling,
    // unless the caller asked for fill-only
    if !incoming.title.trim().is_empty()
        && incoming.title != existing.title
        && (!options.fill_only || existing.title.trim().is_empty())
    {
        existing.title = incoming.title.clone();
        changed += 1;
    }

    changed += update_string(&mut existing.sku, &incoming.sku, options.fill_only);
    changed += update_string(&mut existing.image, &incoming.image, options.fill_only);
    changed += update_string(&mut existing.permalink, &incoming.permalink, options.fill_only);
    if options.overwrite_slug || existing.slug.as_deref().unwrap_or("").is_empty() {
        changed += update_string(&mut existing.slug, &incoming.slug, options.fill_only);
    }

    for (key, value) in &incoming.extra {
        if value.is_null() {
            continue;
        }
        let current = existing.extra.get(key);
        let absent = current.map_or(true, Value::is_null);
        if options.fill_only && !absent {
            continue;
        }
        if current != Some(value) {
            existing.extra.insert(key.clone(), value.clone());
            changed += 1;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scraped(title: &str) -> Product {
        let mut p = Product::new(title);
        p.sku = Some("9786500000001".into());
        p.extra.insert("price".into(), json!(74.9));
        p
    }

    #[test]
    fn test_match_updates_in_place() {
        let mut catalog = vec![Product::new("Outro livro"), Product::new("Mil platôs")];
        let outcome = merge_record(&mut catalog, scraped("Mil platôs"), &MergeOptions::default());
        match outcome {
            MergeOutcome::Updated { index, score, fields_changed } => {
                assert_eq!(index, 1);
                assert_eq!(score, 1.0);
                assert_eq!(fields_changed, 2); // sku + price
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].sku.as_deref(), Some("9786500000001"));
        assert_eq!(catalog[1].extra.get("price"), Some(&json!(74.9)));
    }

    #[test]
    fn test_no_match_appends() {
        let mut catalog = vec![Product::new("Mil platôs")];
        let outcome = merge_record(
            &mut catalog,
            scraped("Título completamente diferente"),
            &MergeOptions::default(),
        );
        assert_eq!(outcome, MergeOutcome::Appended);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut catalog = vec![Product::new("Mil platôs")];
        merge_record(&mut catalog, scraped("Mil platôs"), &MergeOptions::default());
        let second = merge_record(&mut catalog, scraped("Mil platôs"), &MergeOptions::default());
        match second {
            MergeOutcome::Updated { fields_changed, .. } => assert_eq!(fields_changed, 0),
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_fill_only_keeps_existing_values() {
        let mut existing = Product::new("Mil platôs");
        existing.sku = Some("old-sku".into());
        existing.extra.insert("price".into(), json!(50.0));
        let mut catalog = vec![existing];

        let options = MergeOptions {
            fill_only: true,
            ..Default::default()
        };
        merge_record(&mut catalog, scraped("Mil platôs"), &options);
        assert_eq!(catalog[0].sku.as_deref(), Some("old-sku"));
        assert_eq!(catalog[0].extra.get("price"), Some(&json!(50.0)));
    }

    #[test]
    fn test_slug_is_stable_unless_overwrite_requested() {
        let mut existing = Product::new("Mil platôs");
        existing.slug = Some("mil-platos".into());
        let mut catalog = vec![existing];

        let mut incoming = Product::new("Mil platôs");
        incoming.slug = Some("mil-platos-v2".into());
        merge_record(&mut catalog, incoming.clone(), &MergeOptions::default());
        assert_eq!(catalog[0].slug.as_deref(), Some("mil-platos"));

        let options = MergeOptions {
            overwrite_slug: true,
            ..Default::default()
        };
        merge_record(&mut catalog, incoming, &options);
        assert_eq!(catalog[0].slug.as_deref(), Some("mil-platos-v2"));
    }

    #[test]
    fn test_subtitle_variant_updates_same_record() {
        let mut catalog = vec![Product::new("Sonhos em série")];
        let outcome = merge_record(
            &mut catalog,
            Product::new("Sonhos em série: arquitetura e pré-fabricação nas margens do"),
            &MergeOptions::default(),
        );
        assert!(matches!(outcome, MergeOutcome::Updated { .. }));
        assert_eq!(catalog.len(), 1);
        // the fuller spelling wins
        assert_eq!(
            catalog[0].title,
            "Sonhos em série: arquitetura e pré-fabricação nas margens do"
        );
    }
}
