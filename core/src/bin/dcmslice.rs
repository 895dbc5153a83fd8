use clap::Parser;
use dcmtags_core::cli;
use dcmtags_core::types::DEFAULT_UID_PREFIX;
use dcmtags_core::{insert_into_series, SliceOptions, UidGenerator};
use std::path::PathBuf;

/// CLI tool for adding an image to an existing series
#[derive(Parser, Debug)]
#[command(name = "dcmslice")]
#[command(about = "Copy a template's attributes onto a new image so it joins the template's series")]
#[command(version)]
struct Cli {
    /// File providing the pixel data
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Instance of the target series
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Where to write the new instance
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Mark the pixel data as interleaved RGB
    #[arg(long)]
    rgb: bool,

    /// Root for the generated SOPInstanceUID, ending in '.'
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_UID_PREFIX)]
    uid_prefix: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = cli::parse_args();
    cli::setup_logging(cli.verbose);

    let generator = UidGenerator::new(&cli.uid_prefix).unwrap_or_else(|e| cli::fail(e));
    let options = SliceOptions { force_rgb: cli.rgb };

    match insert_into_series(&cli.input, &cli.template, &cli.output, &generator, options) {
        Ok(uid) => println!("{} SOPInstanceUID={}", cli.output.display(), uid),
        Err(e) => cli::fail(e),
    }
}
