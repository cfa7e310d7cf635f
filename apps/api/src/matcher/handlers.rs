//! Axum route handler for the Matcher API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::matcher::interpreter::interpret;
use crate::matcher::models::MatchResult;
use crate::matcher::prompts::build_match_prompt;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file part as received, before any validation.
#[derive(Debug)]
struct UploadedFile {
    content_type: Option<String>,
    bytes: Bytes,
}

#[derive(Debug, Default)]
struct MatchUpload {
    file: Option<UploadedFile>,
    jd: Option<String>,
}

/// POST /api/matcher/match
///
/// Multipart fields: `file` (the résumé, `application/pdf`) and `jd` (job description text).
/// Extracts the résumé text, asks the model to compare it with the JD and returns
/// the interpreted `MatchResult`.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let (pdf, jd) = validate_upload(upload)?;

    let resume_text = state.extractor.extract_text(&pdf).await?;
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from PDF. Please ensure the PDF contains readable text."
                .to_string(),
        ));
    }

    let prompt = build_match_prompt(&resume_text, &jd);
    info!(
        "Calling AI gateway with prompt length: {} chars",
        prompt.chars().count()
    );
    let reply = state.gateway.complete(&prompt).await?;
    info!("Received AI gateway reply ({} chars)", reply.chars().count());

    Ok(Json(interpret(&reply)))
}

async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<MatchUpload, AppError> {
    let mut upload = MatchUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body", limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            // First `file` part wins; later ones are skipped unread.
            "file" if upload.file.is_none() => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read file data", limit))?;
                upload.file = Some(UploadedFile {
                    content_type,
                    bytes,
                });
            }
            "jd" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read job description", limit))?;
                upload.jd = Some(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Body-limit overruns are reported as such; anything else is a malformed request.
fn multipart_error(err: MultipartError, context: &str, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the maximum request size of {limit} bytes"
        ))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

/// Checks run in a fixed order: file present, job description present, PDF content type.
fn validate_upload(upload: MatchUpload) -> Result<(Bytes, String), AppError> {
    let file = match upload.file {
        Some(file) if !file.bytes.is_empty() => file,
        _ => return Err(AppError::Validation("Resume file is required".to_string())),
    };

    let jd = match upload.jd {
        Some(jd) if !jd.trim().is_empty() => jd,
        _ => {
            return Err(AppError::Validation(
                "Job description is required".to_string(),
            ))
        }
    };

    if file.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(AppError::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }

    Ok((file.bytes, jd))
}
