use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, HeaderName, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::batch::archive::sanitize_file_name;
use crate::batch::exporter::{ResultTable, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::batch::pipeline::{process_archive, FailurePolicy};
use crate::batch::staging::default_staging_dir;
use crate::errors::AppError;
use crate::state::AppState;

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const FAILURES_HEADER: &str = "x-resume-failures";

const UPLOAD_FORM: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Resume batch extraction</title>
  </head>
  <body>
    <h1>Upload a ZIP of resumes</h1>
    <form action="/upload" method="post" enctype="multipart/form-data">
      <input type="file" name="file" accept=".zip">
      <button type="submit">Extract</button>
    </form>
  </body>
</html>
"#;

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// POST /upload
/// Takes a ZIP of resumes in the `file` part and answers with the extracted
/// spreadsheet as an attachment.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let Ok(mut multipart) = multipart else {
        return Ok(NO_FILE_PART.into_response());
    };

    let upload_path = loop {
        let Some(field) = multipart.next_field().await.map_err(malformed)? else {
            return Ok(NO_FILE_PART.into_response());
        };
        if field.name() != Some("file") {
            continue;
        }
        // A part without a filename is a plain form value, not a file.
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if raw_name.is_empty() {
            return Ok(NO_SELECTED_FILE.into_response());
        }
        let file_name = sanitize_file_name(&raw_name).ok_or_else(|| {
            AppError::Validation(format!("'{raw_name}' is not a usable file name"))
        })?;
        break save_upload(&state.config.upload_dir, &file_name, field).await?;
    };

    let policy = state.config.failure_policy;
    let outcome = process_archive(
        &upload_path,
        state.extractor.as_ref(),
        &default_staging_dir(),
        policy,
    )
    .await?;

    let failures = outcome.failures.len();
    let bytes = export_table(outcome.table).await?;

    let mut response = (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response();
    if policy == FailurePolicy::BestEffort {
        response
            .headers_mut()
            .insert(HeaderName::from_static(FAILURES_HEADER), HeaderValue::from(failures));
    }
    Ok(response)
}

fn malformed(err: MultipartError) -> AppError {
    AppError::Validation(err.body_text())
}

/// Streams the part to `dir/<uuid>-<file_name>` and returns that path.
async fn save_upload(dir: &Path, file_name: &str, mut field: Field<'_>) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{}-{file_name}", Uuid::new_v4()));
    let mut file = tokio::fs::File::create(&path).await?;
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        file.write_all(&chunk).await?;
        size += chunk.len();
    }
    file.flush().await?;

    info!(path = %path.display(), size, "Saved uploaded archive");
    Ok(path)
}

/// Writes the workbook into a fresh directory and reads it back. The
/// directory is removed before this returns.
async fn export_table(table: ResultTable) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
        let dir = tempfile::tempdir()?;
        let path = table.write_xlsx(dir.path())?;
        Ok(std::fs::read(path)?)
    })
    .await
    .context("spreadsheet export task failed")?
}
