//! Persistence gateway.
//!
//! Handlers depend on the `DocumentStore` trait only; the concrete backend is
//! chosen once at startup and injected as `web::Data<dyn DocumentStore>`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Document;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// The two independent collections the server reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tasks,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tasks => "tasks",
        }
    }
}

/// Document store with find/insert semantics over named collections.
///
/// Filters follow JSONB containment: every filter field must be present and
/// contain the filter value (scalars compare equal, objects match on the
/// listed keys, arrays match when each filter element is found). An empty
/// filter matches every document. Results come back in insertion order and
/// are not paginated.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document matching `filter`, if any.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<Document>, AppError>;

    /// Returns every document matching `filter`.
    async fn find(&self, collection: Collection, filter: &Document)
        -> Result<Vec<Document>, AppError>;

    /// Stores `document` under a freshly generated `_id` and returns that id.
    async fn insert_one(&self, collection: Collection, document: Document)
        -> Result<Uuid, AppError>;
}

/// True when `document` contains `filter`, with the same rules as Postgres
/// `jsonb @>` applied below the top-level object.
pub fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| {
        document
            .get(key)
            .map_or(false, |actual| contains(actual, expected))
    })
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => matches(actual, expected),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|wanted| actual.iter().any(|item| contains(item, wanted))),
        // jsonb compares numbers by value, so 2 and 2.0 are equal
        (Value::Number(actual), Value::Number(expected)) => {
            actual == expected || actual.as_f64() == expected.as_f64()
        }
        _ => actual == expected,
    }
}

/// Stamps a new `_id` onto `document`, replacing any caller-supplied one.
pub(crate) fn assign_id(document: &mut Document) -> Uuid {
    let id = Uuid::new_v4();
    document.insert(
        crate::models::ID_FIELD.to_string(),
        Value::String(id.to_string()),
    );
    id
}
