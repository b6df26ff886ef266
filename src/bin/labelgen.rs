//! CLI tool to annotate a part-catalog CSV export.
//!
//! Usage:
//!   labelgen digikey -i parts.csv -o labels.csv
//!   labelgen supernode -i inventory.csv -o labels.csv
//!
//! Runs the catalog's full annotator sequence over the input table and
//! writes the enriched table. Exits non-zero on any annotation failure;
//! no output file is produced in that case.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use labelgen::{Pipeline, Result, csvio, digikey, supernode};

#[derive(Parser)]
#[command(name = "labelgen", about = "Generate label fields from part-catalog CSV exports")]
struct Cli {
    #[command(subcommand)]
    catalog: Catalog,
}

#[derive(Subcommand)]
enum Catalog {
    /// Annotate a Digi-Key parametric export.
    Digikey(IoArgs),
    /// Annotate a merged inventory export with manual override columns.
    Supernode(IoArgs),
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input CSV file.
    #[arg(short, long)]
    input: PathBuf,
    /// Output CSV file.
    #[arg(short, long)]
    output: PathBuf,
}

fn run(pipeline: Pipeline, args: &IoArgs) -> Result<()> {
    let loaded = csvio::read_table(&args.input)?;
    let input_count = loaded.records.len();

    let table = pipeline.run(loaded.header, loaded.records)?;

    csvio::write_table(&args.output, &table)?;
    info!(
        input = input_count,
        output = table.rows.len(),
        columns = table.header.len(),
        "annotation complete"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.catalog {
        Catalog::Digikey(args) => digikey::pipeline().and_then(|p| run(p, args)),
        Catalog::Supernode(args) => supernode::pipeline().and_then(|p| run(p, args)),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}
