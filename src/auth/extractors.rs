use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::{AppError, UNAUTHORIZED_MESSAGE};

/// Claims of the caller, as decoded by `AuthMiddleware`.
///
/// Only routes declared `Access::Bearer` carry claims; using this extractor on
/// any other route answers 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedClaims(pub Claims);

impl FromRequest for AuthenticatedClaims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedClaims(claims))),
            None => {
                log::warn!("{} reached a handler without decoded claims", req.path());
                let err = AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into());
                ready(Err(err.into()))
            }
        }
    }
}
