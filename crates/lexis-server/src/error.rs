//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lexis_core::LexisError;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
#[error("[{status}] {code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", message)
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<LexisError> for ApiError {
    fn from(err: LexisError) -> Self {
        let mut details = serde_json::json!({ "errorCode": err.code().as_str() });
        if let Some(suggestion) = err.suggestion() {
            details["suggestion"] = serde_json::Value::String(suggestion.to_string());
        }

        let api = match err {
            LexisError::NotFound { message, .. } => ApiError::not_found(message),
            LexisError::StoreUnavailable { message, .. } => ApiError::unavailable(message),
            LexisError::InvalidInput { message, field, .. } => {
                if let Some(field) = field {
                    details["field"] = serde_json::Value::String(field);
                }
                ApiError::validation(message)
            }
            LexisError::Configuration(msg) => ApiError::bad_request(msg),
            LexisError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            LexisError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            LexisError::Internal(msg) => ApiError::internal(msg),
        };

        api.with_details(details)
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LexisError::word_not_found("chat")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LexisError::store("disk full")).status,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(LexisError::Configuration("bad".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LexisError::Internal("boom".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_details_carry_field() {
        let err = ApiError::from(LexisError::out_of_range("dailyGoal", "too big"));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let details = err.details.unwrap();
        assert_eq!(details["errorCode"], "VAL_002");
        assert_eq!(details["field"], "dailyGoal");
    }
}
