//! Error types for albumcat-cms
//!
//! Every handler failure becomes a JSON body of the form `{"error": "<message>"}`.
//! Messages of server errors are passed through unsanitized; the API is meant
//! for a localhost development server only.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use albumcat_common::api::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Album id not in the catalog (404)
    #[error("Not found")]
    NotFound,

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Write would break catalog invariants (409)
    #[error("{0}")]
    Conflict(String),

    /// Request body over the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// IO error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// albumcat-common error
    #[error("{0}")]
    Common(#[from] albumcat_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use albumcat_common::Error as CommonError;

        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Common(err) => match err {
                CommonError::NotFound(_) => StatusCode::NOT_FOUND,
                CommonError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                CommonError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        use albumcat_common::Error as CommonError;

        match self {
            ApiError::Common(CommonError::NotFound(_)) => "Not found".to_string(),
            ApiError::Common(CommonError::InvalidInput(msg))
            | ApiError::Common(CommonError::Conflict(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!("Request failed ({}): {}", status, message);
        } else {
            warn!("Request rejected ({}): {}", status, message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use albumcat_common::Error as CommonError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(CommonError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(CommonError::InvalidInput("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PayloadTooLarge("big".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_is_fixed() {
        assert_eq!(ApiError::NotFound.message(), "Not found");
        assert_eq!(
            ApiError::from(CommonError::NotFound("album 5".into())).message(),
            "Not found"
        );
    }

    #[test]
    fn test_io_message_exposes_cause() {
        let err = ApiError::from(CommonError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "catalog.json: permission denied",
        )));
        assert!(err.message().contains("permission denied"));
    }
}
