pub mod report;

use crate::error::{DcmTagsError, Result};
use crate::types::{BatchConfig, BatchResult, DEFAULT_UID_PREFIX};
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser};
use log::error;
use std::process;

/// Exit status for success
pub const EXIT_OK: i32 = 0;

/// Exit status for usage errors, missing inputs and fatal preconditions
pub const EXIT_FAILURE: i32 = 1;

/// Directory traversal options, shared by every directory-wide tool
#[derive(Args, Debug, Clone)]
pub struct WalkArgs {
    /// Follow symbolic links while walking the directory
    #[arg(long)]
    pub follow_symlinks: bool,
}

impl WalkArgs {
    pub fn to_config(&self) -> BatchConfig {
        BatchConfig::default().follow_symlinks(self.follow_symlinks)
    }
}

/// Options of the tools that rewrite files
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Root for generated UIDs, ending in '.'
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_UID_PREFIX)]
    pub uid_prefix: String,

    /// Exit with status 1 if any file failed
    #[arg(long)]
    pub strict: bool,
}

impl BatchArgs {
    /// Builds the batch configuration these options describe
    pub fn to_config(&self) -> Result<BatchConfig> {
        self.walk.to_config().with_uid_prefix(&self.uid_prefix)
    }
}

/// Initialises `env_logger`; `RUST_LOG` still overrides the level
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Parses command-line arguments, mapping clap usage errors to exit code 1
///
/// `--help` and `--version` still exit with 0.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => exit_on_clap_error(e),
    }
}

/// Like [`parse_args`], also returning the raw matches
///
/// The matches carry argument positions, for tools whose options apply in
/// command-line order.
pub fn parse_args_with_matches<T: Parser>() -> (T, ArgMatches) {
    let parsed = T::command()
        .try_get_matches()
        .and_then(|matches| T::from_arg_matches(&matches).map(|args| (args, matches)));
    match parsed {
        Ok(parsed) => parsed,
        Err(e) => exit_on_clap_error(e),
    }
}

fn exit_on_clap_error(e: clap::Error) -> ! {
    let code = if e.use_stderr() { EXIT_FAILURE } else { EXIT_OK };
    // printing can only fail if the terminal is gone
    let _ = e.print();
    process::exit(code);
}

/// Reports a fatal error and exits
pub fn fail(err: DcmTagsError) -> ! {
    error!("{}", err);
    eprintln!("Error: {}", err);
    process::exit(err.exit_code());
}

/// Exit status for a finished batch
///
/// Per-file failures only change the status when `strict` is set.
pub fn batch_exit_code(result: &BatchResult, strict: bool) -> i32 {
    if strict && result.had_failures() {
        EXIT_FAILURE
    } else {
        EXIT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileOutcome;
    use std::path::{Path, PathBuf};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        batch: BatchArgs,
    }

    #[derive(Parser)]
    struct ReadOnlyCli {
        #[command(flatten)]
        walk: WalkArgs,
    }

    #[test]
    fn test_batch_args_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert!(!cli.batch.strict);
        assert_eq!(cli.batch.to_config().unwrap(), BatchConfig::default());
    }

    #[test]
    fn test_batch_args_rejects_bad_prefix() {
        let cli = TestCli::try_parse_from(["test", "--uid-prefix", "abc", "--strict"]).unwrap();
        assert!(cli.batch.strict);
        assert!(matches!(cli.batch.to_config(), Err(DcmTagsError::Usage(_))));
    }

    #[test]
    fn test_batch_args_include_walk_options() {
        let cli = TestCli::try_parse_from(["test", "--follow-symlinks"]).unwrap();
        assert!(cli.batch.to_config().unwrap().follow_symlinks);
    }

    #[test]
    fn test_walk_args_have_no_mutation_options() {
        let cli = ReadOnlyCli::try_parse_from(["test", "--follow-symlinks"]).unwrap();
        assert!(cli.walk.to_config().follow_symlinks);
        assert!(ReadOnlyCli::try_parse_from(["test", "--uid-prefix", "1.2."]).is_err());
        assert!(ReadOnlyCli::try_parse_from(["test", "--strict"]).is_err());
    }

    #[test]
    fn test_batch_exit_code() {
        let mut result = BatchResult::new();
        result.push(FileOutcome::success(PathBuf::from("a.dcm")));
        assert_eq!(batch_exit_code(&result, true), EXIT_OK);

        result.push(FileOutcome::failed(
            PathBuf::from("b.dcm"),
            DcmTagsError::parse(Path::new("b.dcm"), "bad"),
        ));
        assert_eq!(batch_exit_code(&result, false), EXIT_OK);
        assert_eq!(batch_exit_code(&result, true), EXIT_FAILURE);
    }
}
