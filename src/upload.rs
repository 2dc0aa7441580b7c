use pdf_table_extract::{ExportFormat, ExtractError, ExtractMode};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub stem: String,
    pub bytes: Vec<u8>,
}

const PDF_MAGIC: &[u8] = b"%PDF-";
// Readers accept junk before the header.
const MAGIC_SEARCH_WINDOW: usize = 1024;

// Drops any client-side directory prefix (`C:\fakepath\x.pdf`, `a/b.pdf`).
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim()
}

pub fn validate_upload(
    file_name: &str,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> Result<Upload, ExtractError> {
    let name = base_name(file_name);
    let stem = name
        .len()
        .checked_sub(4)
        .filter(|&split| name.is_char_boundary(split))
        .filter(|&split| name[split..].eq_ignore_ascii_case(".pdf"))
        .map(|split| &name[..split])
        .ok_or_else(|| {
            ExtractError::MalformedInput(format!("'{name}' is not a .pdf file"))
        })?;

    if bytes.is_empty() {
        return Err(ExtractError::MalformedInput(format!("'{name}' is empty")));
    }
    if bytes.len() > max_bytes {
        return Err(ExtractError::MalformedInput(format!(
            "'{name}' is {} bytes; the limit is {max_bytes}",
            bytes.len()
        )));
    }

    let window = &bytes[..bytes.len().min(MAGIC_SEARCH_WINDOW)];
    if !window.windows(PDF_MAGIC.len()).any(|chunk| chunk == PDF_MAGIC) {
        return Err(ExtractError::MalformedInput(format!(
            "'{name}' does not look like a PDF document"
        )));
    }

    let stem = if stem.trim().is_empty() { "extracted" } else { stem };
    Ok(Upload {
        stem: stem.to_string(),
        bytes,
    })
}

pub fn content_disposition(stem: &str, format: ExportFormat) -> String {
    let file_name = format!("{stem}.{}", format.extension());
    let ascii_fallback = file_name
        .chars()
        .map(|ch| {
            if ch == ' ' || (ch.is_ascii_graphic() && ch != '"' && ch != '\\') {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>();

    format!(
        "attachment; filename=\"{ascii_fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(&file_name)
    )
}

pub fn parse_export_query(
    url: &Url,
    fixed_format: Option<ExportFormat>,
    default_format: ExportFormat,
) -> Result<(ExportFormat, ExtractMode), ExtractError> {
    let mut format = fixed_format.unwrap_or(default_format);
    let mut mode = ExtractMode::Tables;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "format" if fixed_format.is_none() => {
                format = value.parse().map_err(ExtractError::InvalidOption)?;
            }
            "mode" => mode = value.parse().map_err(ExtractError::InvalidOption)?,
            _ => {}
        }
    }

    Ok((format, mode))
}
