use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use encoding_rs::{BIG5, UTF_16BE, UTF_16LE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSelection;

pub trait PageReader {
    fn name(&self) -> &'static str;

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<PageText>, ExtractError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractReader;

impl PageReader for PdfExtractReader {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
        let document = Document::load_mem(pdf)?;
        let page_numbers = document.get_pages().into_keys().collect::<Vec<_>>();

        // pdf-extract panics on some malformed fonts instead of returning an error.
        let texts = match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf)
        })) {
            Ok(Ok(texts)) => texts,
            Ok(Err(error)) => return Err(ExtractError::Decode(error.to_string())),
            Err(_) => {
                return Err(ExtractError::Decode(
                    "pdf-extract panicked on a malformed document".to_string(),
                ));
            }
        };

        if texts.len() != page_numbers.len() {
            return Err(ExtractError::Decode(format!(
                "pdf-extract reported {} page(s) for a {}-page document",
                texts.len(),
                page_numbers.len()
            )));
        }

        Ok(page_numbers
            .into_iter()
            .zip(texts)
            .map(|(page_number, text)| PageText { page_number, text })
            .collect())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ContentStreamReader;

impl PageReader for ContentStreamReader {
    fn name(&self) -> &'static str {
        "lopdf-content"
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
        let document = Document::load_mem(pdf)?;
        let pages: Vec<PageText> = document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| PageText {
                page_number,
                text: extract_text_from_page_content(&document, page_id).unwrap_or_default(),
            })
            .collect();
        Ok(pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub pages: Vec<PageText>,
    pub reader: &'static str,
    pub skipped: Vec<String>,
}

pub struct ReaderChain {
    readers: Vec<Box<dyn PageReader>>,
}

impl Default for ReaderChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(PdfExtractReader),
            Box::new(ContentStreamReader),
        ])
    }
}

impl ReaderChain {
    #[must_use]
    pub fn new(readers: Vec<Box<dyn PageReader>>) -> Self {
        Self { readers }
    }

    pub fn read_pages(
        &self,
        pdf: &[u8],
        selection: Option<&PageSelection>,
    ) -> Result<ReadOutcome, ExtractError> {
        let mut skipped = Vec::new();

        for reader in &self.readers {
            debug!(reader = reader.name(), "reading PDF pages");
            match reader.read_pages(pdf) {
                Ok(pages) => {
                    let pages = pages
                        .into_iter()
                        .filter(|page| selection.is_none_or(|sel| sel.contains(page.page_number)))
                        .collect::<Vec<_>>();
                    if pages.is_empty() {
                        return Err(ExtractError::NoPagesSelected);
                    }
                    return Ok(ReadOutcome {
                        pages,
                        reader: reader.name(),
                        skipped,
                    });
                }
                Err(error) => {
                    warn!(reader = reader.name(), error = %error.report(), "page reader failed");
                    skipped.push(format!("{}: {}", reader.name(), error.report()));
                }
            }
        }

        Err(ExtractError::Decode(if skipped.is_empty() {
            "no page readers configured".to_string()
        } else {
            skipped.join("; ")
        }))
    }
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let with_bom = bytes
        .strip_prefix(&[0xFE, 0xFF])
        .map(|rest| (UTF_16BE, rest))
        .or_else(|| bytes.strip_prefix(&[0xFF, 0xFE]).map(|rest| (UTF_16LE, rest)));
    if let Some((encoding, without_bom)) = with_bom {
        let (utf16, had_errors) = encoding.decode_without_bom_handling(without_bom);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    let hint = encoding.map(str::to_ascii_lowercase).unwrap_or_default();
    if ["utf16", "ucs2", "identity-h", "unicode"]
        .iter()
        .any(|marker| hint.contains(marker))
    {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }
    if ["big5", "b5", "eten", "cns"]
        .iter()
        .any(|marker| hint.contains(marker))
    {
        let (big5, _, had_errors) = BIG5.decode(bytes);
        if !had_errors && !big5.is_empty() {
            return big5.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

fn collect_operand_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
            Object::Array(items) => {
                collect_operand_text(text, encoding, items);
                text.push(' ');
            }
            // Large negative kerning in a TJ array is a visual word gap.
            Object::Integer(value) if *value < -100 => text.push(' '),
            _ => {}
        }
    }
}

fn extract_text_from_page_content(document: &Document, page_id: ObjectId) -> Option<String> {
    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                current_encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|font_name| encodings.get(font_name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_operand_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}
