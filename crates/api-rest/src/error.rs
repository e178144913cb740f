//! HTTP error handling and conversion.
//!
//! This module provides the error type for the REST API and maps repository
//! and domain failures onto status codes:
//! `Conflict` → 400, `NotFound` → 404, `NotSupported` → 501, validation and
//! binding failures → 400, anything else → 500.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
};
use gala_domain::DomainError;
use gala_infrastructure::Error as StoreError;
use thiserror::Error;
use tracing::{error, warn};

use crate::responses::{ErrorMap, Response};

/// API-specific error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Repository or store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request failed validation, by field
    #[error("Validation failed")]
    Validation(ErrorMap),

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A validation failure on a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ErrorMap::new();
        errors.insert(field.into(), message.into());
        Self::Validation(errors)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Domain(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::NotFound(_)) => "NOT_FOUND",
            Self::Store(StoreError::NotSupported(_)) => "NOT_SUPPORTED",
            Self::Store(_) => "STORE_ERROR",
            Self::Domain(err) => err.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn errors(&self) -> ErrorMap {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::Internal(_) => {
                let mut errors = ErrorMap::new();
                errors.insert("error".to_string(), "an unexpected error occurred".to_string());
                errors
            }
            other => {
                let mut errors = ErrorMap::new();
                errors.insert(other.error_code().to_lowercase(), other.to_string());
                errors
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            warn!(error = %self, code = self.error_code(), "Request rejected");
        }

        (status, Response::failure(status, self.errors())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::field("query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::field("path", rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let message = failures
                    .iter()
                    .map(|failure| {
                        failure
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| failure.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                (field.to_string(), message)
            })
            .collect();
        Self::Validation(errors)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_mapping() {
        let cases = [
            (StoreError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::NotSupported("x".into()), StatusCode::NOT_IMPLEMENTED),
            (StoreError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_domain_error_is_bad_request() {
        let err = ApiError::from(DomainError::YearOutOfRange(1900));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_field_error() {
        let err = ApiError::field("data", "no request data");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.errors().get("data").unwrap(), "no request data");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal("secret".into());
        assert!(!err.errors().values().any(|v| v.contains("secret")));
    }
}
