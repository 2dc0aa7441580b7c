use serde::{Deserialize, Serialize};

pub const MULTIPART_FILE_FIELD: &str = "file";
pub const MULTIPART_PASSWORD_FIELD: &str = "password";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_MIN_TABLE_COLUMNS: usize = 2;

pub const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
