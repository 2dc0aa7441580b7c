use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("CSV write error")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet write error")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to load PDF")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to decode PDF: {0}")]
    Decode(String),

    #[error("document is password protected; a password is required")]
    AuthenticationRequired,

    #[error("the supplied password was rejected by the document")]
    AuthenticationFailed,

    #[error("no tables were found in the document")]
    NoTablesFound,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}

impl ExtractError {
    #[must_use]
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
