//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type used by every handler, the token
//! service and the access gate. Each variant maps onto one HTTP status code and
//! one JSON envelope, so a handler can bail out with `?` and still answer the
//! caller with a well-formed body.
//!
//! Failures are rendered as `{"success": false, "message": ...}`. The one
//! exception is `Unauthorized`, produced by the access gate, which renders as
//! `{"message": ...}` without the `success` field.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to callers for every 500-class failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Message returned by the access gate for every rejected request.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access!";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or empty (HTTP 400).
    BadRequest(String),
    /// The record being created already exists (HTTP 409).
    Conflict(String),
    /// Missing, malformed, forged or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Unexpected server-side failure such as token signing (HTTP 500).
    /// The message is logged, never sent to the caller.
    InternalServerError(String),
    /// Failure reported by the persistence gateway (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::BadRequest(msg) | AppError::Conflict(msg) => builder.json(json!({
                "success": false,
                "message": msg
            })),
            AppError::Unauthorized(msg) => builder.json(json!({
                "message": msg
            })),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                builder.json(json!({
                    "success": false,
                    "message": INTERNAL_ERROR_MESSAGE
                }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("migration failed: {}", error))
    }
}

/// Presence checks are expressed with `validator`; the field-level message
/// (e.g. "invalid email") is what the caller sees.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::BadRequest(message)
    }
}

/// Any token verification failure collapses to the same 401.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
    }
}
