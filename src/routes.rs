use pdf_table_extract::{ExportFormat, ExtractError, ExtractOptions, export_pdf_bytes};
use worker::{Context, Env, FormEntry, Request, Response, Result, RouteContext, Router};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::models::{INDEX_HTML, MULTIPART_FILE_FIELD, MULTIPART_PASSWORD_FIELD};
use crate::upload::{content_disposition, parse_export_query, validate_upload};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServiceConfig,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let config = match ServiceConfig::from_env(&env) {
        Ok(config) => config,
        Err(error) => return error.into_response(),
    };

    Router::with_data(AppState { config })
        .get("/", index_route)
        .post_async("/extract", extract_route)
        .post_async("/extract-xlsx", extract_xlsx_route)
        .post_async("/extract-csv", extract_csv_route)
        .run(req, env)
        .await
}

fn index_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    Response::from_html(INDEX_HTML)
}

async fn extract_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    respond(extract_response(req, &ctx.data, None).await)
}

async fn extract_xlsx_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    respond(extract_response(req, &ctx.data, Some(ExportFormat::Xlsx)).await)
}

async fn extract_csv_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    respond(extract_response(req, &ctx.data, Some(ExportFormat::Csv)).await)
}

fn respond(result: Result<Response, ApiError>) -> Result<Response> {
    match result {
        Ok(response) => Ok(response),
        Err(error) => {
            worker::console_error!("extraction request failed: {error}");
            error.into_response()
        }
    }
}

async fn extract_response(
    mut req: Request,
    state: &AppState,
    fixed_format: Option<ExportFormat>,
) -> Result<Response, ApiError> {
    let url = req.url()?;
    let (format, mode) = parse_export_query(&url, fixed_format, state.config.default_format)?;

    let form = req.form_data().await?;
    let Some(FormEntry::File(file)) = form.get(MULTIPART_FILE_FIELD) else {
        return Err(ExtractError::MalformedInput(format!(
            "multipart field '{MULTIPART_FILE_FIELD}' with a PDF file is required"
        ))
        .into());
    };
    let password = match form.get(MULTIPART_PASSWORD_FIELD) {
        Some(FormEntry::Field(value)) => Some(value),
        _ => None,
    };

    let upload = validate_upload(
        &file.name(),
        file.bytes().await?,
        state.config.max_upload_bytes,
    )?;

    let options = ExtractOptions {
        mode,
        min_cols: state.config.min_table_columns,
        ..ExtractOptions::default()
    }
    .with_password(password);
    let (body, report) = export_pdf_bytes(&upload.bytes, &options, format)?;

    worker::console_log!(
        "extracted '{}.pdf': mode={}, format={}, rows={}, tables={}, reader={}, warnings={}",
        upload.stem,
        mode,
        format,
        report.row_count,
        report.table_count,
        report.reader,
        report.warnings.len()
    );

    let mut response = Response::from_bytes(body)?;
    let headers = response.headers_mut();
    headers.set("Content-Type", format.content_type())?;
    headers.set(
        "Content-Disposition",
        &content_disposition(&upload.stem, format),
    )?;
    headers.set("X-Row-Count", &report.row_count.to_string())?;
    headers.set("Cache-Control", "no-store")?;
    Ok(response)
}
