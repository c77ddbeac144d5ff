mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "livraria")]
#[command(about = "Maintain the livraria storefront catalog JSON")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder the catalog to match a reference title list
    Reorder(commands::reorder::ReorderArgs),
    /// Merge scraped product records into the catalog
    Import(commands::import::ImportArgs),
    /// Check catalog invariants and ordering
    Check(commands::check::CheckArgs),
    /// Clean up stored product HTML (srcset, external image URLs)
    FixContent(commands::fix_content::FixContentArgs),
    /// Show import progress
    Status(commands::status::StatusArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("livraria_lib=info".parse().unwrap())
                .add_directive("livraria_cli=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Reorder(args) => commands::reorder::run(args, &format)?,
        Commands::Import(args) => commands::import::run(args, &format)?,
        Commands::Check(args) => commands::check::run(args, &format)?,
        Commands::FixContent(args) => commands::fix_content::run(args, &format)?,
        Commands::Status(args) => commands::status::run(args, &format)?,
    }

    Ok(())
}
