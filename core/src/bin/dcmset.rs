use clap::{ArgMatches, Parser};
use dcmtags_core::cli::{self, BatchArgs};
use dcmtags_core::error::{DcmTagsError, Result};
use dcmtags_core::{lookup, BatchSummary, BatchTagMutator, MutationSpec};
use log::info;
use std::path::PathBuf;
use std::process;

/// CLI tool for setting DICOM tags across a directory
#[derive(Parser, Debug)]
#[command(name = "dcmset")]
#[command(about = "Set, remove or regenerate DICOM tags in every file under a directory")]
#[command(after_help = "Mutations are applied in command-line order; a later one on the same tag wins.")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Tag names and values, in pairs: TAG VALUE [TAG VALUE ...]
    #[arg(value_name = "TAG VALUE")]
    assignments: Vec<String>,

    /// Generate a new UID per file for this tag
    #[arg(long, value_name = "TAG")]
    new_uid: Vec<String>,

    /// Remove this tag from every file
    #[arg(long, value_name = "TAG")]
    remove: Vec<String>,

    #[command(flatten)]
    batch: BatchArgs,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Values of `id` paired with their command-line positions
fn positioned<'a>(matches: &'a ArgMatches, id: &str) -> Vec<(usize, &'a String)> {
    match (matches.indices_of(id), matches.get_many::<String>(id)) {
        (Some(indices), Some(values)) => indices.zip(values).collect(),
        _ => Vec::new(),
    }
}

/// Mutations in the order they were given on the command line
fn build_specs(matches: &ArgMatches) -> Result<Vec<MutationSpec>> {
    let assignments = positioned(matches, "assignments");
    if assignments.len() % 2 != 0 {
        return Err(DcmTagsError::Usage(format!(
            "expected TAG VALUE pairs, got {} argument(s)",
            assignments.len()
        )));
    }

    let mut specs: Vec<(usize, MutationSpec)> = Vec::new();
    for pair in assignments.chunks(2) {
        let (index, name) = pair[0];
        specs.push((index, MutationSpec::parse_literal(name, pair[1].1)?));
    }
    for (index, name) in positioned(matches, "new_uid") {
        specs.push((index, MutationSpec::new_uid(lookup(name)?)));
    }
    for (index, name) in positioned(matches, "remove") {
        specs.push((index, MutationSpec::remove(lookup(name)?)));
    }
    if specs.is_empty() {
        return Err(DcmTagsError::Usage(
            "nothing to do: give TAG VALUE pairs, --new-uid or --remove".to_string(),
        ));
    }

    specs.sort_by_key(|(index, _)| *index);
    Ok(specs.into_iter().map(|(_, spec)| spec).collect())
}

fn main() {
    let (cli, matches): (Cli, ArgMatches) = cli::parse_args_with_matches();
    cli::setup_logging(cli.verbose);

    let specs = build_specs(&matches).unwrap_or_else(|e| cli::fail(e));
    let config = cli.batch.to_config().unwrap_or_else(|e| cli::fail(e));
    let mutator = BatchTagMutator::new(config).unwrap_or_else(|e| cli::fail(e));

    info!(
        "Applying {} mutation(s) under {}",
        specs.len(),
        cli.directory.display()
    );
    let result = match mutator.mutate(&cli.directory, &specs) {
        Ok(result) => result,
        Err(e) => cli::fail(e),
    };

    print!("{}", BatchSummary::new(&result));
    process::exit(cli::batch_exit_code(&result, cli.batch.strict));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dcmtags_core::MutationValue;

    fn matches(args: &[&str]) -> ArgMatches {
        Cli::command()
            .try_get_matches_from(std::iter::once("dcmset").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_build_specs_keeps_command_line_order() {
        let specs = build_specs(&matches(&[
            "dir",
            "--remove",
            "PatientComments",
            "PatientName",
            "anonymous",
            "--new-uid",
            "SOPInstanceUID",
            "--remove",
            "PatientName",
        ]))
        .unwrap();

        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0].value, MutationValue::Remove);
        assert_eq!(specs[0].target.name, "PatientComments");
        assert_eq!(specs[1].value, MutationValue::Literal("anonymous".to_string()));
        assert_eq!(specs[2].value, MutationValue::NewUid);
        assert_eq!(specs[3].value, MutationValue::Remove);
        assert_eq!(specs[3].target.name, "PatientName");
    }

    #[test]
    fn test_build_specs_pairs_literals() {
        let specs = build_specs(&matches(&["dir", "PatientName", "a", "PatientID", "b"])).unwrap();
        assert_eq!(specs[0].target.name, "PatientName");
        assert_eq!(specs[1].target.name, "PatientID");
        assert_eq!(specs[1].value, MutationValue::Literal("b".to_string()));
    }

    #[test]
    fn test_build_specs_rejects_odd_pairs() {
        assert!(matches!(
            build_specs(&matches(&["dir", "PatientName"])),
            Err(DcmTagsError::Usage(_))
        ));
    }

    #[test]
    fn test_build_specs_rejects_unknown_tag() {
        assert!(matches!(
            build_specs(&matches(&["dir", "NotATag", "x"])),
            Err(DcmTagsError::UnknownTag(_))
        ));
    }

    #[test]
    fn test_build_specs_requires_work() {
        assert!(matches!(
            build_specs(&matches(&["dir"])),
            Err(DcmTagsError::Usage(_))
        ));
    }
}
