#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Token issuance and verification, the bearer-token access gate, the document"]
#![doc = "store gateway and the user/task handlers. `main.rs` wires them into an"]
#![doc = "actix-web server; the integration tests wire them into test services."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
