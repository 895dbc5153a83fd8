use clap::Parser;
use dcmtags_core::cli::{self, BatchArgs};
use dcmtags_core::{default_profile, AnonymizationProfile, BatchSummary, BatchTagMutator};
use log::info;
use std::path::PathBuf;
use std::process;

/// CLI tool for anonymizing a directory of DICOM files
#[derive(Parser, Debug)]
#[command(name = "dcmanon")]
#[command(about = "Replace patient and staff identifiers with fixed values")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Profile file (Keyword=value lines, or JSON with the 'json' feature)
    #[arg(short, long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Print the profile and exit without touching any file
    #[arg(long)]
    show_profile: bool,

    #[command(flatten)]
    batch: BatchArgs,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let profile = match &cli.profile {
        Some(path) => {
            info!("Loading profile {}", path.display());
            AnonymizationProfile::load(path).unwrap_or_else(|e| cli::fail(e))
        }
        None => default_profile(),
    };

    if cli.show_profile {
        for entry in profile.entries() {
            println!("{}={}", entry.target.name, entry.value);
        }
        return;
    }

    let config = cli.batch.to_config().unwrap_or_else(|e| cli::fail(e));
    let mutator = BatchTagMutator::new(config).unwrap_or_else(|e| cli::fail(e));
    let result = match profile.apply(&mutator, &cli.directory) {
        Ok(result) => result,
        Err(e) => cli::fail(e),
    };

    print!("{}", BatchSummary::new(&result));
    process::exit(cli::batch_exit_code(&result, cli.batch.strict));
}
