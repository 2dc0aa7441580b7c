use pdf_table_extract::ExportFormat;
use worker::Env;

use crate::error::ApiError;
use crate::models::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MIN_TABLE_COLUMNS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub default_format: ExportFormat,
    pub min_table_columns: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Xlsx,
            min_table_columns: DEFAULT_MIN_TABLE_COLUMNS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    pub fn from_env(env: &Env) -> Result<Self, ApiError> {
        Self::from_lookup(|name| env.var(name).ok().map(|value| value.to_string()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_format = match lookup("DEFAULT_FORMAT") {
            Some(raw) => raw.parse::<ExportFormat>().map_err(ApiError::Internal)?,
            None => defaults.default_format,
        };
        let min_table_columns = parse_number(&lookup, "MIN_TABLE_COLUMNS")?
            .unwrap_or(defaults.min_table_columns);
        let max_upload_bytes =
            parse_number(&lookup, "MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes);

        if min_table_columns < 2 {
            return Err(ApiError::Internal(
                "MIN_TABLE_COLUMNS must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            default_format,
            min_table_columns,
            max_upload_bytes,
        })
    }
}

fn parse_number<F>(lookup: &F, name: &str) -> Result<Option<usize>, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|error| ApiError::Internal(format!("{name} is not a number: {error}")))
        })
        .transpose()
}
