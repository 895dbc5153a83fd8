use clap::Parser;
use dcmtags_core::cli::{self, EXIT_FAILURE};
use dcmtags_core::{DiffReport, TagClassification, TagDiffEngine};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

/// CLI tool for comparing the tags of two DICOM files
#[derive(Parser, Debug)]
#[command(name = "dcmdiff")]
#[command(about = "Compare the DICOM tags of two files")]
#[command(version)]
struct Cli {
    /// First file (A)
    #[arg(value_name = "FILE1")]
    left: PathBuf,

    /// Second file (B)
    #[arg(value_name = "FILE2")]
    right: PathBuf,

    /// Also list common tags and tags unique to either file
    #[arg(short, long)]
    all: bool,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let classification = match TagDiffEngine::compare_files(&cli.left, &cli.right) {
        Ok(c) => c,
        Err(e) => cli::fail(e),
    };
    info!(
        "{} common, {} differing, {} only in A, {} only in B",
        classification.common.len(),
        classification.differing.len(),
        classification.unique_to_a.len(),
        classification.unique_to_b.len()
    );

    if cli.json {
        output_json(&classification);
    } else {
        output_text(&cli, &classification, &cli.left, &cli.right);
    }
}

fn output_text(cli: &Cli, classification: &TagClassification, left: &Path, right: &Path) {
    let report = DiffReport::new(classification, left, right)
        .all(cli.all)
        .color(!cli.no_color);
    print!("{}", report);
}

fn output_json(classification: &TagClassification) {
    #[cfg(feature = "json")]
    {
        match serde_json::to_string_pretty(classification) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(EXIT_FAILURE);
            }
        }
    }
    #[cfg(not(feature = "json"))]
    {
        let _ = classification;
        error!("JSON output requested without the 'json' feature");
        eprintln!("Error: JSON output requires the 'json' feature");
        eprintln!("Rebuild with: cargo build --features json");
        process::exit(EXIT_FAILURE);
    }
}
