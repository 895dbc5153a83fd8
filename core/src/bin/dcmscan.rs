use clap::Parser;
use dcmtags_core::cli::{self, WalkArgs};
use dcmtags_core::{lookup, scan_two_tags, GroupReport};
use log::info;
use std::path::PathBuf;

/// CLI tool for grouping one tag's values by another's
#[derive(Parser, Debug)]
#[command(name = "dcmscan")]
#[command(about = "List, for each value of KEY, the values of VALUE seen under a directory")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Tag to group by, e.g. Modality
    #[arg(value_name = "KEY")]
    key: String,

    /// Tag whose values are collected, e.g. BodyPartExamined
    #[arg(value_name = "VALUE")]
    value: String,

    #[command(flatten)]
    walk: WalkArgs,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let key = lookup(&cli.key).unwrap_or_else(|e| cli::fail(e));
    let value = lookup(&cli.value).unwrap_or_else(|e| cli::fail(e));
    let config = cli.walk.to_config();

    let groups = match scan_two_tags(&cli.directory, &key, &value, &config) {
        Ok(groups) => groups,
        Err(e) => cli::fail(e),
    };
    info!("{} distinct {} value(s)", groups.len(), key.name);
    print!("{}", GroupReport::new(&groups));
}
