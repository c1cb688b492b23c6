use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Everything a handler can surface to a client.
///
/// Upstream detail is logged server-side before mapping to `Upstream`;
/// the client only ever sees the generic message.
#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Query parameter is required")]
    MissingQuery,

    #[error("API key not configured")]
    MissingApiKey,

    #[error("License verification service temporarily unavailable")]
    Upstream,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingQuery => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey | AppError::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(
            AppError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::MissingQuery.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingApiKey.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::MethodNotAllowed.to_string(), "Method not allowed");
        assert_eq!(
            AppError::MissingQuery.to_string(),
            "Query parameter is required"
        );
        assert_eq!(AppError::MissingApiKey.to_string(), "API key not configured");
        assert_eq!(
            AppError::Upstream.to_string(),
            "License verification service temporarily unavailable"
        );
    }
}
