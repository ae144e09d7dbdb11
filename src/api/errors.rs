//! API Error Handling
//!
//! Maps service failures onto HTTP status codes with a `{status, detail}` body.

use crate::errors::{BetError, StoreError, TableError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Problem-style error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

/// API error with the id of the request that produced it
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    InternalError(String),
}

impl ApiError {
    pub fn new(request_id: String, kind: ApiErrorKind) -> Self {
        Self { kind, request_id }
    }

    pub fn bad_request(request_id: String, message: String) -> Self {
        Self::new(request_id, ApiErrorKind::BadRequest(message))
    }

    pub fn from_table_error(request_id: String, err: TableError) -> Self {
        Self::new(request_id, ApiErrorKind::from(&err))
    }

    pub fn from_bet_error(request_id: String, err: BetError) -> Self {
        Self::new(request_id, ApiErrorKind::from(&err))
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::Conflict(_) => StatusCode::CONFLICT,
            ApiErrorKind::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match &self.kind {
            ApiErrorKind::NotFound(msg)
            | ApiErrorKind::BadRequest(msg)
            | ApiErrorKind::Conflict(msg)
            | ApiErrorKind::InternalError(msg) => msg,
        }
    }
}

impl From<&TableError> for ApiErrorKind {
    fn from(err: &TableError) -> Self {
        match err {
            TableError::NotSpun(_) => ApiErrorKind::Conflict(err.to_string()),
            other => match other.store_error() {
                Some(source) => {
                    let message = format!("{}: {}", other, source);
                    if source.is_not_found() {
                        ApiErrorKind::NotFound(message)
                    } else {
                        ApiErrorKind::InternalError(message)
                    }
                }
                None => ApiErrorKind::InternalError(other.to_string()),
            },
        }
    }
}

impl From<&BetError> for ApiErrorKind {
    fn from(err: &BetError) -> Self {
        match err {
            BetError::TableClosed(_) => ApiErrorKind::Conflict(err.to_string()),
            BetError::Store(source @ StoreError::NotFound { .. }) => {
                ApiErrorKind::NotFound(source.to_string())
            }
            BetError::Store(source) => ApiErrorKind::InternalError(source.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.request_id, self.status_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(request_id = %self.request_id, detail = %self.message(), "request failed");
        }

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            detail: self.message().to_string(),
        });

        (status, body).into_response()
    }
}
