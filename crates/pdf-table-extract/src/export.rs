use std::fmt;
use std::str::FromStr;

use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

use crate::dataset::Dataset;
use crate::error::ExtractError;

const WORKSHEET_NAME: &str = "Data";
const MAX_XLSX_ROWS: usize = 1_048_576;
const MAX_XLSX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn render(self, dataset: &Dataset, delimiter: u8) -> Result<Vec<u8>, ExtractError> {
        match self {
            Self::Csv => write_csv(dataset, delimiter),
            Self::Xlsx => write_xlsx(dataset),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("unsupported export format '{other}'")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn write_csv(dataset: &Dataset, delimiter: u8) -> Result<Vec<u8>, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(dataset.header())?;
    for row in dataset.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))
}

pub fn write_xlsx(dataset: &Dataset) -> Result<Vec<u8>, ExtractError> {
    if dataset.column_count() > MAX_XLSX_COLUMNS {
        return Err(ExtractError::InvalidOption(format!(
            "{} columns exceed the spreadsheet limit of {MAX_XLSX_COLUMNS}",
            dataset.column_count()
        )));
    }
    if dataset.row_count() + 1 > MAX_XLSX_ROWS {
        return Err(ExtractError::InvalidOption(format!(
            "{} rows exceed the spreadsheet limit of {}",
            dataset.row_count(),
            MAX_XLSX_ROWS - 1
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    let lines = std::iter::once(dataset.header())
        .chain(dataset.rows().iter().map(Vec::as_slice));
    for (row_index, values) in (0_u32..).zip(lines) {
        for (col_index, value) in (0_u16..).zip(values) {
            if !value.is_empty() {
                worksheet.write_string(row_index, col_index, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
