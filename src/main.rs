use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sats_reshape::io::excel_read::SheetSelector;
use sats_reshape::io::json::load_json;
use sats_reshape::pipeline::{self, TransformRequest};
use sats_reshape::reshape::ReshapeOptions;
use sats_reshape::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Transform(args) => execute_transform(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_transform(args: TransformArgs) -> Result<()> {
    args.sources.ensure_exist()?;
    let options = args.reshape_options()?;

    let request = TransformRequest {
        mapping: args.sources.mapping,
        mapping_sheet: args.sources.mapping_sheet,
        input: args.sources.input,
        input_sheet: args.sources.sheet,
        output: args.output,
        options,
    };
    pipeline::transform(&request)?;
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    args.sources.ensure_exist()?;
    let options = resolve_options(args.config.as_deref(), None, args.label_column)?;

    let report = pipeline::inspect(
        &args.sources.mapping,
        &args.sources.mapping_sheet,
        &args.sources.input,
        &args.sources.sheet,
        &options,
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn resolve_options(
    config: Option<&Path>,
    marker_column: Option<String>,
    label_column: Option<String>,
) -> Result<ReshapeOptions> {
    let mut options = match config {
        Some(path) => {
            if !path.exists() {
                return Err(ToolError::MissingInput(path.to_path_buf()));
            }
            load_json::<ReshapeOptions>(path)?
        }
        None => ReshapeOptions::default(),
    };
    if let Some(marker_column) = marker_column {
        options.marker_column = marker_column;
    }
    if let Some(label_column) = label_column {
        options.label_column = label_column;
    }
    Ok(options)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reshape wide SATS survey exports into one row per respondent and destination."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reshape a survey export using a mapping sheet.
    Transform(TransformArgs),
    /// Print the resolved column mapping as JSON without reshaping.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Mapping workbook with FINAL / ORIGINAL_1 / ORIGINAL_2 columns.
    #[arg(long)]
    mapping: PathBuf,

    /// Sheet of the mapping workbook, by position or name.
    #[arg(long, default_value = "0")]
    mapping_sheet: SheetSelector,

    /// Survey export workbook.
    #[arg(long)]
    input: PathBuf,

    /// Sheet of the survey export, by position or name.
    #[arg(long, default_value = "0")]
    sheet: SheetSelector,
}

impl SourceArgs {
    fn ensure_exist(&self) -> Result<()> {
        for path in [&self.mapping, &self.input] {
            if !path.exists() {
                return Err(ToolError::MissingInput(path.clone()));
            }
        }
        Ok(())
    }
}

#[derive(clap::Args)]
struct TransformArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// Output path; `.json` writes JSON records, anything else a workbook.
    #[arg(long)]
    output: PathBuf,

    /// JSON file with reshape options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column holding the destination markers.
    #[arg(long)]
    marker_column: Option<String>,

    /// Output column receiving the destination label.
    #[arg(long)]
    label_column: Option<String>,
}

impl TransformArgs {
    fn reshape_options(&self) -> Result<ReshapeOptions> {
        resolve_options(
            self.config.as_deref(),
            self.marker_column.clone(),
            self.label_column.clone(),
        )
    }
}

#[derive(clap::Args)]
struct InspectArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// JSON file with reshape options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output column receiving the destination label.
    #[arg(long)]
    label_column: Option<String>,
}
