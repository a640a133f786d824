//! Thumbnailizer CLI - converts box art into Analogue Pocket library thumbnails.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use thumbnailizer_core::{
    load_datafile, process_catalog, BatchConfig, BatchSummary, CatalogEntry, Checksum,
    SourceLocation,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the thumbnailizer tool.
#[derive(Parser, Debug)]
#[command(name = "thumbnailizer")]
#[command(version)]
#[command(about = "Generate Analogue Pocket library thumbnails from box art")]
#[command(long_about = "Converts box art images into the .bin thumbnails used by the \
    Analogue Pocket library.\n\n\
    EXAMPLES:\n    \
    thumbnailizer -d gb.dat -i boxart/ -o System/Library/Images/GB\n    \
    thumbnailizer -c 0x46DF91AD -i tetris.png -o out/ --upscale")]
#[command(group(ArgGroup::new("mode").required(true).args(["datafile", "crc"])))]
struct Args {
    /// dat-o-matic datafile listing the games to convert
    #[arg(short, long, value_name = "FILE")]
    datafile: Option<PathBuf>,

    /// CRC32 of a single game (with or without a 0x prefix)
    #[arg(short, long, value_parser = parse_checksum)]
    crc: Option<Checksum>,

    /// Image directory (datafile mode) or image file (crc mode)
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Output directory, created if missing
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Resize every image to the full thumbnail height
    #[arg(short, long)]
    upscale: bool,

    /// Report skipped games and per-entry details
    #[arg(short, long)]
    verbose: bool,
}

fn parse_checksum(raw: &str) -> Result<Checksum, String> {
    Checksum::parse(raw).map_err(|e| e.to_string())
}

/// What the arguments ask for once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Catalog { datafile: PathBuf },
    Single { checksum: Checksum },
}

impl Args {
    /// Check the filesystem side of the arguments. Failures are usage
    /// errors and exit like any other clap error.
    fn validate(&self) -> Result<Mode, clap::Error> {
        let mode = match (&self.datafile, &self.crc) {
            (Some(datafile), _) => {
                if !datafile.exists() {
                    return Err(usage_error(format!(
                        "datafile {} does not exist",
                        datafile.display()
                    )));
                }
                if datafile.is_dir() {
                    return Err(usage_error(format!(
                        "datafile {} is a directory",
                        datafile.display()
                    )));
                }
                if !self.input.is_dir() {
                    return Err(usage_error(format!(
                        "input {} must be an existing directory when using a datafile",
                        self.input.display()
                    )));
                }
                Mode::Catalog {
                    datafile: datafile.clone(),
                }
            }
            (None, Some(checksum)) => {
                if !self.input.is_file() {
                    return Err(usage_error(format!(
                        "input {} must be an existing image file when using a crc",
                        self.input.display()
                    )));
                }
                Mode::Single {
                    checksum: checksum.clone(),
                }
            }
            // Unreachable through clap: the mode group is required
            (None, None) => {
                return Err(Args::command().error(
                    ClapErrorKind::MissingRequiredArgument,
                    "one of --datafile or --crc is required",
                ))
            }
        };
        Ok(mode)
    }

    fn batch_config(&self, mode: &Mode) -> BatchConfig {
        let source = match mode {
            Mode::Catalog { .. } => SourceLocation::Directory(self.input.clone()),
            Mode::Single { .. } => SourceLocation::File(self.input.clone()),
        };
        BatchConfig {
            source,
            out_dir: self.out.clone(),
            upscale: self.upscale,
            verbose: self.verbose,
        }
    }
}

fn usage_error(message: String) -> clap::Error {
    Args::command().error(ClapErrorKind::ValueValidation, message)
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn load_entries(args: &Args, mode: &Mode) -> anyhow::Result<Vec<CatalogEntry>> {
    match mode {
        Mode::Catalog { datafile } => load_datafile(datafile)
            .with_context(|| format!("Failed to load datafile {}", datafile.display())),
        Mode::Single { checksum } => Ok(vec![CatalogEntry::for_image(
            &args.input,
            checksum.clone(),
        )]),
    }
}

fn run(args: &Args, mode: &Mode) -> anyhow::Result<BatchSummary> {
    let entries = load_entries(args, mode)?;
    println!("Found {} entries", entries.len());

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory {}", args.out.display()))?;

    let config = args.batch_config(mode);
    info!(
        input = %args.input.display(),
        out = %args.out.display(),
        upscale = args.upscale,
        "starting thumbnail generation"
    );

    match process_catalog(&entries, &config) {
        Ok(summary) => {
            println!(
                "Successfully processed {} of {} entries",
                summary.processed, summary.total
            );
            Ok(summary)
        }
        Err(err) => {
            error!(
                entry = %err.entry,
                kind = %err.kind(),
                processed = err.processed,
                "processing stopped"
            );
            Err(anyhow::Error::new(err).context("Thumbnail generation aborted"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = args.validate().unwrap_or_else(|e| e.exit());

    init_logging(args.verbose)?;

    run(&args, &mode)?;
    Ok(())
}
