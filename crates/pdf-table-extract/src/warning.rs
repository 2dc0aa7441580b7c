use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    ReaderFallback,
    DroppedLeadingLines,
    RaggedRow,
    LowConfidence,
}

impl WarningCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReaderFallback => "reader_fallback",
            Self::DroppedLeadingLines => "dropped_leading_lines",
            Self::RaggedRow => "ragged_row",
            Self::LowConfidence => "low_confidence",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
    pub confidence: Option<f32>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            confidence: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code)?;
        if let Some(page) = self.page {
            write!(f, " page {page}")?;
        }
        if let Some(confidence) = self.confidence {
            write!(f, " (confidence {confidence:.2})")?;
        }
        write!(f, ": {}", self.message)
    }
}
