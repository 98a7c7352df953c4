pub mod health;
pub mod tasks;
pub mod tokens;
pub mod users;

use actix_web::{http::Method, web};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// What a caller must present to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// A verified bearer token in the `Authorization` header.
    Bearer,
}

/// One entry of the route protection table.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
}

const fn rule(method: Method, path: &'static str, access: Access) -> RouteRule {
    RouteRule {
        method,
        path,
        access,
    }
}

/// Every route the server exposes and the access it requires.
/// `AuthMiddleware` enforces this table; `config` registers the same routes.
pub const ROUTE_TABLE: &[RouteRule] = &[
    rule(Method::GET, "/", Access::Public),
    rule(Method::GET, "/health", Access::Public),
    rule(Method::POST, "/jwt", Access::Public),
    rule(Method::POST, "/users", Access::Public),
    rule(Method::GET, "/users", Access::Bearer),
    rule(Method::POST, "/tasks", Access::Public),
    rule(Method::GET, "/tasks", Access::Public),
    rule(Method::GET, "/tasks/to-do", Access::Public),
];

/// Looks up the access level for a request. Unlisted routes are public and
/// end up as 404s in the router.
pub fn required_access(rules: &[RouteRule], method: &Method, path: &str) -> Access {
    rules
        .iter()
        .find(|rule| rule.method == *method && rule.path == path)
        .map(|rule| rule.access)
        .unwrap_or(Access::Public)
}

/// Body of a successful creation.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Body extraction settings shared by every JSON route: malformed bodies are
/// answered with the standard 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("{}: rejected request body: {}", req.path(), err);
        AppError::BadRequest(format!("invalid request body: {}", err)).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::index)
        .service(health::health)
        .service(tokens::issue_token)
        .service(users::create_user)
        .service(users::list_users)
        .service(tasks::create_task)
        .service(tasks::list_todo_tasks)
        .service(tasks::list_tasks);
}
