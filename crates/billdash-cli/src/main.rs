mod render;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use billdash_core::{
    compute_view_from_bytes, export_csv, MonthSelection, SourceFormat, ViewModel,
    DEFAULT_CREDIT_NOTE, DEFAULT_HEADER_SKIP, EXPORT_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Month-wise billing analysis for messy spreadsheets",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the cleaned table, summary figures and charts
    Show(ShowArgs),
    /// Write the cleaned, filtered rows as CSV
    Export(ExportArgs),
    /// List the distinct billing months in a file
    Months(MonthsArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Billing spreadsheet (.csv or .xlsx) with the header on row 6
    file: PathBuf,

    /// Restrict the view to a month (repeatable; default: all months)
    #[arg(long = "month", value_name = "LABEL")]
    months: Vec<String>,

    /// Credit note subtracted from total sales
    #[arg(long, default_value_t = DEFAULT_CREDIT_NOTE, allow_negative_numbers = true)]
    credit_note: f64,

    /// Print the full view model as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Billing spreadsheet (.csv or .xlsx) with the header on row 6
    file: PathBuf,

    /// Restrict the export to a month (repeatable; default: all months)
    #[arg(long = "month", value_name = "LABEL")]
    months: Vec<String>,

    /// Output path
    #[arg(long, short, default_value = EXPORT_FILE_NAME)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct MonthsArgs {
    /// Billing spreadsheet (.csv or .xlsx) with the header on row 6
    file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Export(args) => handle_export(args),
        Command::Months(args) => handle_months(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<()> {
    let selection = selection_from_flags(args.months);
    let view = load_view(&args.file, &selection, args.credit_note)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    render::print_view(&view);
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<()> {
    let selection = selection_from_flags(args.months);
    let view = load_view(&args.file, &selection, DEFAULT_CREDIT_NOTE)?;

    let bytes = export_csv(&view.records)?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Wrote {} rows to {}", view.records.len(), args.output.display());
    Ok(())
}

fn handle_months(args: MonthsArgs) -> Result<()> {
    let view = load_view(&args.file, &MonthSelection::All, DEFAULT_CREDIT_NOTE)?;
    for month in view.months {
        println!("{month}");
    }
    Ok(())
}

fn load_view(path: &Path, selection: &MonthSelection, credit_note: f64) -> Result<ViewModel> {
    let format = SourceFormat::from_path(path)?;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(bytes = bytes.len(), ?format, "Loaded upload");

    let view = compute_view_from_bytes(&bytes, format, DEFAULT_HEADER_SKIP, selection, credit_note)
        .with_context(|| format!("failed to ingest {}", path.display()))?;
    Ok(view)
}

fn selection_from_flags(months: Vec<String>) -> MonthSelection {
    if months.is_empty() {
        MonthSelection::All
    } else {
        MonthSelection::only(months)
    }
}
