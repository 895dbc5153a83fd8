use clap::Parser;
use dcmtags_core::cli::{self, WalkArgs, EXIT_FAILURE, EXIT_OK};
use dcmtags_core::{ConsistencySummary, UidCoordinator};
use log::warn;
use std::path::PathBuf;
use std::process;

/// CLI tool for checking identifier consistency
#[derive(Parser, Debug)]
#[command(name = "dcmcheck")]
#[command(about = "Check study, series, frame-of-reference and instance UIDs under a directory")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    #[command(flatten)]
    walk: WalkArgs,

    /// Exit with status 1 on inconsistent identifiers or unreadable files
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let config = cli.walk.to_config();
    let coordinator = UidCoordinator::new(config).unwrap_or_else(|e| cli::fail(e));
    let report = match coordinator.check_consistency(&cli.directory) {
        Ok(report) => report,
        Err(e) => cli::fail(e),
    };

    print!("{}", ConsistencySummary::new(&report));

    let failed = !report.is_consistent() || !report.unreadable.is_empty();
    if failed {
        warn!("Identifier check found problems under {}", cli.directory.display());
    }
    process::exit(if cli.strict && failed {
        EXIT_FAILURE
    } else {
        EXIT_OK
    });
}
