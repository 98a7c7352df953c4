pub mod task;
pub mod user;

use serde_json::{Map, Value};

use crate::error::AppError;

pub use task::{require_task, category_filter, TODO_CATEGORY};
pub use user::{email_filter, require_email, UserEmail};

/// A free-form JSON object, the unit stored in every collection.
pub type Document = Map<String, Value>;

/// Name of the identifier field added to every stored document.
pub const ID_FIELD: &str = "_id";

/// Unwraps a request body into a `Document`, rejecting anything that is not a
/// JSON object with `BadRequest(message)`.
pub fn into_document(body: Value, message: &str) -> Result<Document, AppError> {
    match body {
        Value::Object(document) => Ok(document),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}
