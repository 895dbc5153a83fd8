use clap::Parser;
use dcmtags_core::cli::{self, WalkArgs};
use dcmtags_core::dictionary::lookup_all;
use dcmtags_core::error::{DcmTagsError, Result};
use dcmtags_core::TagTable;
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// CLI tool for tabulating tag values over a directory
#[derive(Parser, Debug)]
#[command(name = "dcmreport")]
#[command(about = "Write the values of selected tags for every file under a directory")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Tag names, one column each
    #[arg(value_name = "TAG", required = true)]
    tags: Vec<String>,

    /// One row per distinct combination of values
    #[arg(short, long)]
    dedup: bool,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    walk: WalkArgs,

    /// Exit with status 1 if any file could not be read
    #[arg(long)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(DcmTagsError::Usage(format!(
            "delimiter '{}' is not an ASCII character",
            c
        )))
    }
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let delimiter = delimiter_byte(cli.delimiter).unwrap_or_else(|e| cli::fail(e));
    let tags = lookup_all(&cli.tags).unwrap_or_else(|e| cli::fail(e));
    let config = cli.walk.to_config();

    let table = match TagTable::project(&cli.directory, &tags, cli.dedup, &config) {
        Ok(table) => table,
        Err(e) => cli::fail(e),
    };
    for (path, reason) in &table.skipped {
        eprintln!("Skipped {}: {}", path.display(), reason);
    }

    let written = match &cli.output {
        Some(path) => {
            info!("Writing {} rows to {}", table.rows.len(), path.display());
            File::create(path)
                .map_err(|e| DcmTagsError::write(path, e))
                .and_then(|f| table.write_delimited(BufWriter::new(f), delimiter))
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            table
                .write_delimited(&mut lock, delimiter)
                .and_then(|_| lock.flush().map_err(DcmTagsError::from))
        }
    };
    if let Err(e) = written {
        cli::fail(e);
    }

    if !table.skipped.is_empty() {
        warn!("{} file(s) could not be read", table.skipped.len());
        if cli.strict {
            process::exit(cli::EXIT_FAILURE);
        }
    }
}
