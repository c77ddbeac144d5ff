//! The `fix-content` subcommand: clean up stored product HTML.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use livraria_lib::content::fix_product_content;
use livraria_lib::store;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_json, print_table, OutputFormat};

/// Arguments for the `fix-content` subcommand.
#[derive(Args)]
pub struct FixContentArgs {
    /// Catalog JSON path
    #[arg(long, default_value = "catalog-products.json")]
    pub catalog: PathBuf,

    /// Compute and report without writing the catalog back
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Tabled, Serialize)]
struct ChangedRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "title")]
    title: String,
    #[tabled(rename = "srcset Removed")]
    #[serde(rename = "srcset_removed")]
    srcset_removed: usize,
    #[tabled(rename = "URLs Rewritten")]
    #[serde(rename = "urls_rewritten")]
    urls_rewritten: usize,
}

pub fn run(args: &FixContentArgs, format: &OutputFormat) -> Result<()> {
    let mut catalog = store::load_catalog(&args.catalog)?;

    let mut rows = Vec::new();
    for product in &mut catalog {
        let changes = fix_product_content(product)?;
        if changes.total() > 0 {
            rows.push(ChangedRow {
                title: product.title.clone(),
                srcset_removed: changes.srcset_removed,
                urls_rewritten: changes.urls_rewritten,
            });
        }
    }

    eprintln!("{} record(s) changed", rows.len());
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => print_table(&rows),
    }

    if args.dry_run {
        eprintln!("Dry run: catalog not written");
    } else if !rows.is_empty() {
        store::save_catalog(&args.catalog, &catalog)?;
    }
    Ok(())
}
