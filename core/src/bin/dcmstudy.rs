use clap::Parser;
use dcmtags_core::cli::{self, BatchArgs};
use dcmtags_core::{AssignmentReport, UidCoordinator};
use std::path::PathBuf;
use std::process;

/// CLI tool for moving a directory of files into a new study
#[derive(Parser, Debug)]
#[command(name = "dcmstudy")]
#[command(about = "Give every file under a directory one new StudyInstanceUID")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Use this StudyInstanceUID instead of generating one
    #[arg(long, value_name = "UID")]
    new_study_uid: Option<String>,

    /// Also set PatientID and PatientName to this value
    #[arg(long, value_name = "ID")]
    new_patient_id: Option<String>,

    #[command(flatten)]
    batch: BatchArgs,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let config = cli.batch.to_config().unwrap_or_else(|e| cli::fail(e));
    let coordinator = UidCoordinator::new(config).unwrap_or_else(|e| cli::fail(e));

    let assignment = match coordinator.new_study(
        &cli.directory,
        cli.new_study_uid.as_deref(),
        cli.new_patient_id.as_deref(),
    ) {
        Ok(assignment) => assignment,
        Err(e) => cli::fail(e),
    };

    print!("{}", AssignmentReport::new(&assignment));
    process::exit(cli::batch_exit_code(&assignment.result, cli.batch.strict));
}
