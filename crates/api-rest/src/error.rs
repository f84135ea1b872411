//! Conversion of failures into JSON error responses.
//!
//! Every non-2xx response from a JSON endpoint has the body `{"message": "..."}`. Internal
//! failures are logged and answered with a generic message.

use crate::schema::MessageRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tuneful_core::{CoreError, FilesError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SongNotFound(_) | CoreError::FileNotFound(_) => {
                Self::not_found(err.to_string())
            }
            CoreError::UnknownFileReference(_) => Self::unprocessable(err.to_string()),
            CoreError::Schema(message) | CoreError::InvalidInput(message) => {
                Self::unprocessable(message)
            }
            CoreError::FileInUse(_) => Self::new(StatusCode::CONFLICT, err.to_string()),
            CoreError::Files(FilesError::InvalidFilename(_)) => {
                Self::unprocessable("Invalid filename")
            }
            CoreError::Files(FilesError::NotFound(name)) => {
                Self::not_found(format!("Could not find upload {name}"))
            }
            other => {
                tracing::error!("internal error: {:?}", other);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(MessageRes {
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_errors_map_to_404() {
        let err = ApiError::from(CoreError::SongNotFound(4));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Could not find song with id 4");
    }

    #[test]
    fn test_schema_and_reference_errors_map_to_422() {
        let err = ApiError::from(CoreError::Schema("missing required property 'file'".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "missing required property 'file'");

        let err = ApiError::from(CoreError::UnknownFileReference(9));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Could not find file with id 9");
    }

    #[test]
    fn test_storage_errors_do_not_leak() {
        let err = ApiError::from(CoreError::LockPoisoned);
        assert_eq!(err, ApiError::internal());

        let err = ApiError::from(CoreError::DanglingFileReference {
            song_id: 1,
            file_id: 2,
        });
        assert_eq!(err.message(), "Internal error");
    }
}
