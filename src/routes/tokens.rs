use actix_web::{post, web, HttpResponse, Responder};
use serde_json::Value;

use crate::{
    auth::{TokenResponse, TokenService},
    error::AppError,
    models::{into_document, user::INVALID_EMAIL},
};

/// Mint a token
///
/// Signs the submitted object, which must carry a non-empty `email`, into a
/// bearer token valid for 24 hours. No credential check precedes minting.
///
/// ## Responses:
/// - `200 OK`: `{"success": true, "token": "..."}`.
/// - `400 Bad Request`: missing or empty `email`.
/// - `500 Internal Server Error`: signing failed (e.g. no secret configured).
#[post("/jwt")]
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    body: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let payload = into_document(body.into_inner(), INVALID_EMAIL)?;
    let token = tokens.issue(payload)?;
    Ok(HttpResponse::Ok().json(TokenResponse::new(token)))
}
