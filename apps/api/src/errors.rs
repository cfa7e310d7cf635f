use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Fixed checklist appended to every gateway failure surfaced to the client.
const GATEWAY_TROUBLESHOOTING: &[&str] = &[
    "Verify your Google Gemini API key is valid (GEMINI_API_KEY)",
    "Check that the API key has Gemini API access enabled",
    "Ensure you haven't exceeded API quota limits",
    "Check backend logs for more details",
];

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Extraction(e) => {
                tracing::error!("PDF extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    format!("Error processing PDF: {e}"),
                )
            }
            AppError::Gateway(e) => {
                tracing::error!("AI gateway error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GATEWAY_ERROR",
                    gateway_diagnostic(e),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Builds the client-facing message for a failed model call: the error itself,
/// every cause in its `source()` chain, then the troubleshooting checklist.
pub fn gateway_diagnostic(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = format!("Error calling AI service: {err}");

    let mut cause = err.source();
    while let Some(c) = cause {
        message.push_str(&format!(" (Cause: {c})"));
        cause = c.source();
    }

    message.push_str("\n\nTroubleshooting:\n");
    let steps: Vec<String> = GATEWAY_TROUBLESHOOTING
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect();
    message.push_str(&steps.join("\n"));
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Root;

    #[derive(Debug, Error)]
    #[error("transport failed")]
    struct Middle(#[source] Root);

    #[derive(Debug, Error)]
    #[error("request to model failed")]
    struct Top(#[source] Middle);

    #[test]
    fn test_gateway_diagnostic_walks_cause_chain() {
        let err = Top(Middle(Root));
        let message = gateway_diagnostic(&err);
        assert!(message.starts_with(
            "Error calling AI service: request to model failed \
             (Cause: transport failed) (Cause: connection reset)"
        ));
    }

    #[test]
    fn test_gateway_diagnostic_has_four_step_checklist() {
        let message = gateway_diagnostic(&LlmError::EmptyContent);
        let (_, checklist) = message.split_once("\n\nTroubleshooting:\n").unwrap();
        let lines: Vec<&str> = checklist.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1. Verify your Google Gemini API key"));
        assert!(lines[3].starts_with("4. Check backend logs"));
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("Job description is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let response = AppError::PayloadTooLarge("too big".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_gateway_maps_to_server_error() {
        let response = AppError::Gateway(LlmError::EmptyContent).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_extraction_maps_to_server_error() {
        let err = ExtractionError::Pdf("invalid file header".into());
        let response = AppError::Extraction(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
