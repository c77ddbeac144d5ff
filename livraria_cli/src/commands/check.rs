//! The `check` subcommand: catalog invariants and ordering, read-only.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use livraria_lib::audit::{audit_catalog, check_order, AuditReport, OrderReport};
use livraria_lib::{store, MatchConfig, DEFAULT_MATCH_THRESHOLD};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_score, print_json, print_table, OutputFormat};

/// Arguments for the `check` subcommand.
#[derive(Args)]
pub struct CheckArgs {
    /// Catalog JSON path
    #[arg(long, default_value = "catalog-products.json")]
    pub catalog: PathBuf,

    /// Optional reference list to verify ordering against
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Minimum similarity score to accept a match (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
    pub threshold: f64,
}

#[derive(Tabled)]
struct DuplicateSlugRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Occurrences")]
    occurrences: usize,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Reference Title")]
    reference_title: String,
    #[tabled(rename = "Matched")]
    matched: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "In Place")]
    in_place: String,
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    audit: &'a AuditReport,
    order: Option<&'a OrderReport>,
}

pub fn run(args: &CheckArgs, format: &OutputFormat) -> Result<()> {
    let config = MatchConfig::with_threshold(args.threshold)?;
    let catalog = store::load_catalog(&args.catalog)?;

    let audit = audit_catalog(&catalog);
    let order = match &args.reference {
        Some(path) => {
            let reference = store::load_reference(path)?;
            Some(check_order(&catalog, &reference, &config))
        }
        None => None,
    };

    if let OutputFormat::Json = format {
        print_json(&CheckSummary {
            audit: &audit,
            order: order.as_ref(),
        });
        return Ok(());
    }

    eprintln!("{} records", audit.record_count);
    if audit.is_clean() {
        eprintln!("No duplicate slugs, no missing titles");
    }
    if !audit.duplicate_slugs.is_empty() {
        eprintln!("Duplicate slugs:");
        let rows: Vec<DuplicateSlugRow> = audit
            .duplicate_slugs
            .iter()
            .map(|(slug, occurrences)| DuplicateSlugRow {
                slug: slug.clone(),
                occurrences: *occurrences,
            })
            .collect();
        print_table(&rows);
    }
    if !audit.missing_titles.is_empty() {
        eprintln!(
            "{} record(s) with missing titles at indices {:?}",
            audit.missing_titles.len(),
            audit.missing_titles
        );
    }

    if let Some(order) = &order {
        eprintln!(
            "Order: {} in place, {} out of place, {} missing",
            order.in_place, order.out_of_place, order.missing
        );
        let rows: Vec<OrderRow> = order
            .checks
            .iter()
            .filter(|check| !check.in_place)
            .map(|check| OrderRow {
                position: check.position,
                reference_title: check.reference_title.clone(),
                matched: check.catalog_title.clone().unwrap_or_else(|| "-".into()),
                score: format_score(check.score),
                in_place: if check.in_place { "yes" } else { "no" }.into(),
            })
            .collect();
        if !rows.is_empty() {
            print_table(&rows);
        }
    }

    Ok(())
}
