use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{category_filter, require_task, Document, TODO_CATEGORY},
    routes::Ack,
    store::{Collection, DocumentStore},
};

/// Create a task
///
/// Stores any non-empty JSON object as a task. The body is not otherwise
/// inspected; `category` is the only field other routes read back.
///
/// ## Responses:
/// - `201 Created`: `{"success": true}`.
/// - `400 Bad Request`: empty or non-object body.
/// - `500 Internal Server Error`: store failure.
#[post("/tasks")]
pub async fn create_task(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let task = require_task(body.into_inner())?;
    let id = store.insert_one(Collection::Tasks, task).await?;
    log::info!("created task {}", id);
    Ok(HttpResponse::Created().json(Ack::ok()))
}

/// List all tasks, unfiltered. Query parameters are ignored.
#[get("/tasks")]
pub async fn list_tasks(store: web::Data<dyn DocumentStore>) -> Result<impl Responder, AppError> {
    let tasks = store.find(Collection::Tasks, &Document::new()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// List tasks whose `category` is exactly `"To-Do"`.
#[get("/tasks/to-do")]
pub async fn list_todo_tasks(
    store: web::Data<dyn DocumentStore>,
) -> Result<impl Responder, AppError> {
    let tasks = store
        .find(Collection::Tasks, &category_filter(TODO_CATEGORY))
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}
