mod dataset;
mod decrypt;
mod error;
mod export;
mod model;
mod options;
mod pdf_reader;
mod reconcile;
mod record_parser;
mod table_detect;
mod table_parse;
mod warning;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::table_detect::LOW_CONFIDENCE_THRESHOLD;

pub use dataset::{Dataset, RECORD_COLUMNS};
pub use decrypt::prepare;
pub use error::ExtractError;
pub use export::{ExportFormat, write_csv, write_xlsx};
pub use model::{Cell, Grid, PageText, RawPage, Record, Row};
pub use options::{ExtractMode, ExtractOptions, PageSelection};
pub use pdf_reader::{ContentStreamReader, PageReader, PdfExtractReader, ReadOutcome, ReaderChain};
pub use reconcile::{Reconciled, reconcile_tables};
pub use record_parser::{ParsedRecords, RecordParser};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

use crate::warning::WarningCode;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub table_count: usize,
    pub page_count: usize,
    pub reader: &'static str,
    pub warnings: Vec<ExtractWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub dataset: Dataset,
    pub report: ExtractionReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }
    if matches!(options.delimiter, b'"' | b'\n' | b'\r') {
        return Err(ExtractError::InvalidOption(format!(
            "'{}' cannot be used as a CSV delimiter",
            options.delimiter.escape_ascii()
        )));
    }
    Ok(())
}

pub fn dataset_from_pages(
    pages: &[RawPage],
    mode: ExtractMode,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<(Dataset, usize), ExtractError> {
    match mode {
        ExtractMode::Records => {
            let parsed = RecordParser::new().parse(pages.iter().flat_map(|page| &page.lines));
            if parsed.dropped_lines > 0 {
                warnings.push(ExtractWarning::new(
                    WarningCode::DroppedLeadingLines,
                    format!(
                        "{} line(s) before the first record were discarded",
                        parsed.dropped_lines
                    ),
                ));
            }
            Ok((Dataset::from_records(&parsed.records), 0))
        }
        ExtractMode::Tables => {
            for grid in pages.iter().flat_map(|page| &page.grids) {
                if grid.confidence < LOW_CONFIDENCE_THRESHOLD {
                    warnings.push(
                        ExtractWarning::new(
                            WarningCode::LowConfidence,
                            "table rows have inconsistent widths",
                        )
                        .with_page(grid.page)
                        .with_confidence(grid.confidence),
                    );
                }
            }
            let reconciled = reconcile_tables(pages, warnings)?;
            Ok((reconciled.dataset, reconciled.table_count))
        }
    }
}

pub fn extract_dataset(pdf: &[u8], options: &ExtractOptions) -> Result<Extraction, ExtractError> {
    validate_options(options)?;

    let prepared = prepare(pdf, options.password.as_deref())?;
    let outcome = ReaderChain::default().read_pages(&prepared, options.pages.as_ref())?;

    let mut warnings = outcome
        .skipped
        .iter()
        .map(|failure| {
            ExtractWarning::new(
                WarningCode::ReaderFallback,
                format!("fell back to {}: {failure}", outcome.reader),
            )
        })
        .collect::<Vec<_>>();

    let pages = outcome
        .pages
        .iter()
        .map(|page| RawPage::from_text(page, options.min_cols))
        .collect::<Vec<_>>();
    let (dataset, table_count) = dataset_from_pages(&pages, options.mode, &mut warnings)?;

    info!(
        mode = %options.mode,
        reader = outcome.reader,
        pages = pages.len(),
        rows = dataset.row_count(),
        tables = table_count,
        "extraction completed"
    );

    Ok(Extraction {
        report: ExtractionReport {
            row_count: dataset.row_count(),
            table_count,
            page_count: pages.len(),
            reader: outcome.reader,
            warnings,
        },
        dataset,
    })
}

pub fn export_pdf_bytes(
    pdf: &[u8],
    options: &ExtractOptions,
    format: ExportFormat,
) -> Result<(Vec<u8>, ExtractionReport), ExtractError> {
    let extraction = extract_dataset(pdf, options)?;
    let bytes = format.render(&extraction.dataset, options.delimiter)?;
    Ok((bytes, extraction.report))
}

pub fn export_pdf_file(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<(ExportPaths, ExtractionReport), ExtractError> {
    let pdf = fs::read(input_pdf)?;
    let extraction = extract_dataset(&pdf, options)?;

    let csv = ExportFormat::Csv.render(&extraction.dataset, options.delimiter)?;
    let xlsx = ExportFormat::Xlsx.render(&extraction.dataset, options.delimiter)?;

    let paths = ExportPaths {
        csv: input_pdf.with_extension(ExportFormat::Csv.extension()),
        xlsx: input_pdf.with_extension(ExportFormat::Xlsx.extension()),
    };
    fs::write(&paths.csv, csv)?;
    fs::write(&paths.xlsx, xlsx)?;

    Ok((paths, extraction.report))
}
