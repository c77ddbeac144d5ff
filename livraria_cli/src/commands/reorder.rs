//! The `reorder` subcommand: rewrite catalog order from a reference list.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use livraria_lib::reorder::{reorder, ReorderOptions};
use livraria_lib::{store, MatchConfig, UnmatchedReference, DEFAULT_MATCH_THRESHOLD};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_score, print_json, print_table, OutputFormat};

/// Arguments for the `reorder` subcommand.
#[derive(Args)]
pub struct ReorderArgs {
    /// Catalog JSON path
    #[arg(long, default_value = "catalog-products.json")]
    pub catalog: PathBuf,

    /// Reference list JSON path (array of titles, or of objects with
    /// title/slug/cover_image)
    #[arg(long)]
    pub reference: PathBuf,

    /// Minimum similarity score to accept a match (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
    pub threshold: f64,

    /// Overwrite slugs from the reference entries
    #[arg(long)]
    pub update_slugs: bool,

    /// Overwrite cover images from the reference entries
    #[arg(long)]
    pub update_covers: bool,

    /// Create stub records for reference titles with no catalog match
    #[arg(long)]
    pub create_stubs: bool,

    /// Compute and report without writing the catalog back
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Tabled)]
struct MissRow {
    #[tabled(rename = "Reference Title")]
    title: String,
    #[tabled(rename = "Best Score")]
    best_score: String,
    #[tabled(rename = "Closest Catalog Title")]
    closest: String,
}

#[derive(Serialize)]
struct ReorderSummary<'a> {
    total_records: usize,
    matched: usize,
    unmatched: usize,
    stubs_created: usize,
    updated_slugs: usize,
    updated_covers: usize,
    misses: &'a [UnmatchedReference],
}

pub fn run(args: &ReorderArgs, format: &OutputFormat) -> Result<()> {
    let config = MatchConfig::with_threshold(args.threshold)?;
    let catalog = store::load_catalog(&args.catalog)?;
    let reference = store::load_reference(&args.reference)?;

    let options = ReorderOptions {
        config,
        update_slugs: args.update_slugs,
        update_covers: args.update_covers,
        create_stubs: args.create_stubs,
    };
    let report = reorder(catalog, &reference, &options);

    eprintln!(
        "Matched {} of {} reference titles ({} records total)",
        report.matched,
        reference.len(),
        report.catalog.len()
    );
    if report.updated_slugs > 0 || report.updated_covers > 0 {
        eprintln!(
            "Updated {} slug(s), {} cover(s)",
            report.updated_slugs, report.updated_covers
        );
    }
    if report.stubs_created > 0 {
        eprintln!("Created {} stub record(s)", report.stubs_created);
    }

    match format {
        OutputFormat::Json => print_json(&ReorderSummary {
            total_records: report.catalog.len(),
            matched: report.matched,
            unmatched: report.unmatched_references.len(),
            stubs_created: report.stubs_created,
            updated_slugs: report.updated_slugs,
            updated_covers: report.updated_covers,
            misses: &report.unmatched_references,
        }),
        OutputFormat::Table => {
            if !report.unmatched_references.is_empty() {
                eprintln!("Unmatched reference titles:");
                let rows: Vec<MissRow> = report
                    .unmatched_references
                    .iter()
                    .map(|miss| MissRow {
                        title: miss.title.clone(),
                        best_score: format_score(miss.best_score),
                        closest: miss.best_title.clone().unwrap_or_else(|| "-".into()),
                    })
                    .collect();
                print_table(&rows);
            }
        }
    }

    if args.dry_run {
        eprintln!("Dry run: catalog not written");
    } else {
        store::save_catalog(&args.catalog, &report.catalog)?;
    }
    Ok(())
}
