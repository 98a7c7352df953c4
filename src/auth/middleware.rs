use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::{AppError, UNAUTHORIZED_MESSAGE};
use crate::routes::{required_access, Access, RouteRule, ROUTE_TABLE};

/// Access gate for the whole application.
///
/// Every request is looked up in a route table; routes marked
/// `Access::Bearer` must present `Authorization: <scheme> <token>` with a
/// token accepted by the `TokenService` registered as app data. The decoded
/// claims are then stored in the request extensions. Rejections are answered
/// directly with a 401 response so outer middleware (CORS, logging) still
/// decorates them.
#[derive(Clone, Copy)]
pub struct AuthMiddleware {
    rules: &'static [RouteRule],
}

impl AuthMiddleware {
    pub fn new(rules: &'static [RouteRule]) -> Self {
        Self { rules }
    }
}

impl Default for AuthMiddleware {
    fn default() -> Self {
        Self::new(ROUTE_TABLE)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            rules: self.rules,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    rules: &'static [RouteRule],
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if required_access(self.rules, req.method(), req.path()) == Access::Public {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let credential = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| bearer_credential(value.to_str().unwrap_or_default()));

        let verified = match credential {
            None => {
                log::debug!("{} {}: missing Authorization header", req.method(), req.path());
                Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into()))
            }
            Some(None) => {
                log::debug!("{} {}: malformed Authorization header", req.method(), req.path());
                Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into()))
            }
            Some(Some(token)) => match req.app_data::<web::Data<TokenService>>() {
                Some(tokens) => tokens.verify(token),
                None => Err(AppError::InternalServerError(
                    "TokenService is not registered as app data".into(),
                )),
            },
        };

        match verified {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                let res = req.error_response(app_err).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// Returns the second whitespace-separated segment of an `Authorization`
/// header value. The scheme word itself is not checked.
pub fn bearer_credential(header_value: &str) -> Option<&str> {
    header_value.split_whitespace().nth(1)
}
