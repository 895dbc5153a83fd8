use clap::{Parser, ValueEnum};
use dcmtags_core::cli::{self, BatchArgs};
use dcmtags_core::{AssignmentReport, IdentifierScope, UidCoordinator};
use std::path::PathBuf;
use std::process;

/// CLI tool for assigning one shared identifier to a directory of files
#[derive(Parser, Debug)]
#[command(name = "dcmframeref")]
#[command(about = "Assign a new shared FrameOfReferenceUID to every file under a directory")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Identifier to assign
    #[arg(short, long, default_value = "frame-of-reference")]
    scope: ScopeArg,

    #[command(flatten)]
    batch: BatchArgs,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared identifier scopes
#[derive(Debug, Clone, ValueEnum)]
enum ScopeArg {
    /// StudyInstanceUID
    Study,
    /// SeriesInstanceUID
    Series,
    /// FrameOfReferenceUID
    FrameOfReference,
}

impl From<ScopeArg> for IdentifierScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Study => IdentifierScope::Study,
            ScopeArg::Series => IdentifierScope::Series,
            ScopeArg::FrameOfReference => IdentifierScope::FrameOfReference,
        }
    }
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let config = cli.batch.to_config().unwrap_or_else(|e| cli::fail(e));
    let coordinator = UidCoordinator::new(config).unwrap_or_else(|e| cli::fail(e));

    let scope: IdentifierScope = cli.scope.clone().into();
    let assignment = match coordinator.assign_shared(&cli.directory, scope) {
        Ok(assignment) => assignment,
        Err(e) => cli::fail(e),
    };

    print!("{}", AssignmentReport::new(&assignment));
    process::exit(cli::batch_exit_code(&assignment.result, cli.batch.strict));
}
