//! The `status` subcommand: show the import progress file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use livraria_lib::store;

use crate::output::{print_json, OutputFormat};

/// Arguments for the `status` subcommand.
#[derive(Args)]
pub struct StatusArgs {
    /// Progress file path
    #[arg(long, default_value = "import_progress.json")]
    pub progress: PathBuf,
}

pub fn run(args: &StatusArgs, format: &OutputFormat) -> Result<()> {
    match store::load_progress(&args.progress)? {
        None => eprintln!("No progress recorded; starting from scratch."),
        Some(progress) => match format {
            OutputFormat::Json => print_json(&progress),
            OutputFormat::Table => {
                println!("Last processed index: {}", progress.last_processed_idx);
                println!("Total processed:      {}", progress.total_processed);
                println!("Total errors:         {}", progress.total_errors);
                if let Some(updated_at) = progress.updated_at {
                    println!("Updated at:           {}", updated_at);
                }
            }
        },
    }
    Ok(())
}
