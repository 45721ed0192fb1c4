use std::fmt::Display;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Any failure inside the catalog store. Callers treat every variant the same;
/// the variants only keep the source around for the log line.
#[derive(Error, Debug)]
pub(crate) enum StorageError {
    #[error("connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("query: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("nutrients column: {0}")]
    Nutrients(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Logs the underlying cause and hides it behind a generic message.
    pub(crate) fn internal(message: &'static str, cause: impl Display) -> Self {
        log::error!("{message}: {cause}");
        ApiError::Internal(message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
