//! Error types with HTTP status code mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Error type for cadastro operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Validation errors
    #[error("{message}")]
    MissingField {
        field: &'static str,
        message: &'static str,
    },

    #[error("ID não encontrado")]
    IdNotFound(i64),

    // Request errors
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: expected {expected}")]
    UnsupportedMediaType { expected: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Validation errors -> 4xx
            Error::MissingField { .. } | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::IdNotFound(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // Config errors -> 500 (startup only, shouldn't happen at runtime)
            Error::Config(_) | Error::AddrParse(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // System errors -> 500
            Error::Io(_) | Error::Json(_) | Error::Database(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert error into HTTP response.
    ///
    /// Storage errors keep their message so clients can see what the
    /// database rejected. Every other server-side error is logged and
    /// replaced by a generic message.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let message = match &self {
            Error::MissingField { field, .. } => {
                tracing::debug!("Rejected request without {field}");
                self.to_string()
            }
            Error::IdNotFound(id) => {
                tracing::debug!("No row with id {id}");
                self.to_string()
            }
            Error::Database(_) => {
                tracing::error!("{self}");
                self.to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let body = serde_json::json!({
            "error": message
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }
}

/// Result type alias using cadastro's Error.
pub type Result<T> = std::result::Result<T, Error>;
