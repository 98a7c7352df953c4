use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::Document;
use crate::error::AppError;

pub const INVALID_EMAIL: &str = "invalid email";

/// The only field the server reads from a user or token payload.
/// All other fields are kept verbatim by the caller of `require_email`.
#[derive(Debug, Deserialize, Validate)]
pub struct UserEmail {
    #[validate(length(min = 1, message = "invalid email"))]
    pub email: String,
}

/// Extracts a non-empty `email` string from a request body.
///
/// Missing, empty or non-string values, as well as non-object bodies, are all
/// reported as `BadRequest("invalid email")`.
pub fn require_email(body: &Value) -> Result<String, AppError> {
    let input = UserEmail::deserialize(body)
        .map_err(|_| AppError::BadRequest(INVALID_EMAIL.to_string()))?;
    input.validate()?;
    Ok(input.email)
}

/// Equality filter on the `email` field of the Users collection.
pub fn email_filter(email: &str) -> Document {
    let mut filter = Document::new();
    filter.insert("email".to_string(), json!(email));
    filter
}
