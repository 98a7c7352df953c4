use serde_json::{json, Value};

use super::{into_document, Document};
use crate::error::AppError;

/// Category value served by `GET /tasks/to-do`.
pub const TODO_CATEGORY: &str = "To-Do";

pub const EMPTY_TASK: &str = "task body must be a non-empty object";

/// Tasks are free-form; the only requirement is a non-empty JSON object.
pub fn require_task(body: Value) -> Result<Document, AppError> {
    let task = into_document(body, EMPTY_TASK)?;
    if task.is_empty() {
        return Err(AppError::BadRequest(EMPTY_TASK.to_string()));
    }
    Ok(task)
}

/// Equality filter on the `category` field of the Tasks collection.
pub fn category_filter(category: &str) -> Document {
    let mut filter = Document::new();
    filter.insert("category".to_string(), json!(category));
    filter
}
