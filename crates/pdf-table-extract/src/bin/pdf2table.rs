use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use pdf_table_extract::{
    ExportPaths, ExtractMode, ExtractOptions, ExtractionReport, PageSelection, export_pdf_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2table",
    version,
    about = "Extract records or tables from PDFs into CSV and XLSX"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse "<serial> <name> <email> <details>" report lines.
    Records(CommonArgs),
    /// Merge every detected table into one dataset, first row as header.
    Tables {
        #[command(flatten)]
        common: CommonArgs,

        /// Minimum cells required per candidate table row.
        #[arg(long, default_value_t = 2)]
        min_cols: usize,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Input PDF path; outputs are written next to it.
    #[arg(short, long, default_value = "file_name.pdf")]
    input: PathBuf,

    /// Password for protected documents.
    #[arg(long, env = "PDF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Print extraction warnings.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &CommonArgs, mode: ExtractMode, min_cols: usize) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("delimiter must be a single ASCII character"))?;

    Ok(ExtractOptions {
        mode,
        password: None,
        pages,
        delimiter,
        min_cols,
    }
    .with_password(args.password.clone()))
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!("  - {warning}");
        }
    }
}

fn run(args: &CommonArgs, options: &ExtractOptions) -> Result<(ExportPaths, ExtractionReport)> {
    export_pdf_file(&args.input, options).with_context(|| {
        format!(
            "failed to extract {} from '{}'",
            options.mode,
            args.input.display()
        )
    })
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_table_extract=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let (args, mode, min_cols) = match &cli.command {
        Commands::Records(common) => (common, ExtractMode::Records, 2),
        Commands::Tables { common, min_cols } => (common, ExtractMode::Tables, *min_cols),
    };

    let result = parse_options(args, mode, min_cols).and_then(|options| run(args, &options));
    match result {
        Ok((paths, report)) => {
            log_report(&report, args.verbose);
            println!("Saved CSV to: {}", paths.csv.display());
            println!("Saved Excel to: {}", paths.xlsx.display());
            if report.row_count == 0 {
                eprintln!("warning: no rows were extracted");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
