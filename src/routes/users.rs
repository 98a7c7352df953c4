use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::Value;

use crate::{
    auth::AuthenticatedClaims,
    error::AppError,
    models::{email_filter, into_document, require_email, user::INVALID_EMAIL, Document},
    routes::Ack,
    store::{Collection, DocumentStore},
};

/// Create a user
///
/// Stores the submitted object as a new user unless a user with the same
/// `email` already exists. The lookup and the insert are two separate store
/// calls, so simultaneous submissions of one email can both succeed.
///
/// ## Responses:
/// - `201 Created`: `{"success": true}`.
/// - `400 Bad Request`: missing or empty `email`.
/// - `409 Conflict`: a user with this email exists.
/// - `500 Internal Server Error`: store failure.
#[post("/users")]
pub async fn create_user(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let email = require_email(&body)?;
    let user = into_document(body.into_inner(), INVALID_EMAIL)?;

    if store
        .find_one(Collection::Users, &email_filter(&email))
        .await?
        .is_some()
    {
        log::info!("rejected duplicate user {}", email);
        return Err(AppError::Conflict("user already exists".into()));
    }

    let id = store.insert_one(Collection::Users, user).await?;
    log::info!("created user {} ({})", id, email);

    Ok(HttpResponse::Created().json(Ack::ok()))
}

/// List users
///
/// Returns every stored user. Requires a bearer token.
///
/// ## Responses:
/// - `200 OK`: JSON array of user documents.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: store failure.
#[get("/users")]
pub async fn list_users(
    store: web::Data<dyn DocumentStore>,
    caller: AuthenticatedClaims,
) -> Result<impl Responder, AppError> {
    log::debug!("user list requested by {:?}", caller.0.email());
    let users = store.find(Collection::Users, &Document::new()).await?;
    Ok(HttpResponse::Ok().json(users))
}
