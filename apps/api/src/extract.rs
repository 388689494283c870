//! PDF text extraction — multipart upload in, raw resume text out.
//!
//! Extraction happens in-memory on a blocking worker; the pipeline treats
//! the result as correct raw text from here on.

use axum::extract::Multipart;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub filename: String,
    pub file_size: usize,
    pub text: String,
    pub text_length: usize,
}

/// POST /api/v1/extract
///
/// Accepts a single `file` field containing a PDF and returns the extracted
/// text.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::InvalidArgument(
                "only PDF files (.pdf) are accepted".to_string(),
            ));
        }

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidArgument(format!("failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::InvalidArgument("uploaded file is empty".to_string()));
        }
        if data.len() > MAX_PDF_BYTES {
            return Err(AppError::InvalidArgument(format!(
                "file too large, maximum size is {}MB",
                MAX_PDF_BYTES / (1024 * 1024)
            )));
        }

        let file_size = data.len();
        let text = extract_text(data).await?;

        info!(
            %filename,
            file_size,
            text_length = text.len(),
            "extracted text from PDF"
        );

        return Ok(Json(ExtractResponse {
            success: true,
            filename,
            file_size,
            text_length: text.len(),
            text,
        }));
    }

    Err(AppError::InvalidArgument(
        "multipart field 'file' is required".to_string(),
    ))
}

/// Runs the CPU-bound extraction off the async runtime.
async fn extract_text(data: Bytes) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
        .map_err(|e| {
            AppError::UnprocessableEntity(format!(
                "failed to extract text from PDF: {e}"
            ))
        })
}
