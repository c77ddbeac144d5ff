//! The `import` subcommand: merge scraped records into the catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use livraria_lib::merge::{merge_record, MergeOptions, MergeOutcome};
use livraria_lib::{store, ImportProgress, MatchConfig, DEFAULT_MATCH_THRESHOLD};
use serde::Serialize;

use crate::output::{print_json, OutputFormat};

/// Arguments for the `import` subcommand.
#[derive(Args)]
pub struct ImportArgs {
    /// Catalog JSON path
    #[arg(long, default_value = "catalog-products.json")]
    pub catalog: PathBuf,

    /// JSON array of scraped product records to merge
    #[arg(long)]
    pub records: PathBuf,

    /// Minimum similarity score to accept a match (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
    pub threshold: f64,

    /// Only fill fields the stored records are missing
    #[arg(long)]
    pub fill_only: bool,

    /// Allow matched records' slugs to be replaced
    #[arg(long)]
    pub overwrite_slug: bool,

    /// Resume from the progress file instead of starting at record 0
    #[arg(long)]
    pub resume: bool,

    /// Progress file path
    #[arg(long, default_value = "import_progress.json")]
    pub progress: PathBuf,

    /// Compute and report without writing anything back
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ImportSummary {
    processed: usize,
    updated: usize,
    appended: usize,
    skipped: usize,
    catalog_records: usize,
}

pub fn run(args: &ImportArgs, format: &OutputFormat) -> Result<()> {
    let config = MatchConfig::with_threshold(args.threshold)?;
    let mut catalog = store::load_catalog(&args.catalog)?;
    let records = store::load_catalog(&args.records)?;

    let mut progress = if args.resume {
        store::load_progress(&args.progress)?.unwrap_or_default()
    } else {
        ImportProgress::default()
    };
    let start = if args.resume { progress.next_index() } else { 0 };
    if start > 0 {
        eprintln!("Resuming at record {}", start);
    }

    let options = MergeOptions {
        config,
        fill_only: args.fill_only,
        overwrite_slug: args.overwrite_slug,
    };

    let mut updated = 0;
    let mut appended = 0;
    let mut skipped = 0;
    for (idx, record) in records.into_iter().enumerate().skip(start) {
        if record.title.trim().is_empty() {
            // a scrape that produced no title is useless as a record
            skipped += 1;
            progress.total_errors += 1;
        } else {
            match merge_record(&mut catalog, record, &options) {
                MergeOutcome::Updated { .. } => updated += 1,
                MergeOutcome::Appended => appended += 1,
            }
        }
        progress.last_processed_idx = idx;
        progress.total_processed += 1;
    }
    progress.touch();

    let summary = ImportSummary {
        processed: updated + appended + skipped,
        updated,
        appended,
        skipped,
        catalog_records: catalog.len(),
    };
    eprintln!(
        "Import complete: {} updated, {} appended, {} skipped ({} records total)",
        summary.updated, summary.appended, summary.skipped, summary.catalog_records
    );
    if let OutputFormat::Json = format {
        print_json(&summary);
    }

    if args.dry_run {
        eprintln!("Dry run: nothing written");
    } else {
        store::save_catalog(&args.catalog, &catalog)?;
        store::save_progress(&args.progress, &progress)?;
    }
    Ok(())
}
