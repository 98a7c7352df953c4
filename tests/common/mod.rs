#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use taskdesk::auth::{AuthMiddleware, TokenService};
use taskdesk::routes;
use taskdesk::store::DocumentStore;

pub const SECRET: &str = "integration_test_secret";

pub fn tokens() -> TokenService {
    TokenService::new(Some(SECRET))
}

/// Builds the same application `main.rs` serves, on top of `store`.
pub async fn init_app(
    store: Arc<dyn DocumentStore>,
    tokens: TokenService,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(tokens))
            .wrap(AuthMiddleware::default())
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config),
    )
    .await
}

/// Calls the service and returns status and JSON body (`Null` if the body is
/// not JSON). Errors raised by middleware are rendered the way the server
/// would render them.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, bytes) = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body())
                .await
                .unwrap_or_else(|_| panic!("failed to read error body"));
            (status, bytes)
        }
    };
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn create_user<S, B>(app: &S, body: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&body)
        .to_request();
    send(app, req).await
}

pub async fn create_task<S, B>(app: &S, body: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(&body)
        .to_request();
    send(app, req).await
}

/// Mints a token through `POST /jwt` and returns it.
pub async fn mint_token<S, B>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(&json!({ "email": email }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "minting failed: {}", body);
    body["token"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| panic!("no token in {}", body))
}

pub async fn get<S, B>(app: &S, uri: &str, authorization: Option<&str>) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(value) = authorization {
        req = req.append_header(("Authorization", value));
    }
    send(app, req.to_request()).await
}

fn object(value: Value) -> taskdesk::models::Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

fn titles(documents: &[taskdesk::models::Document]) -> Vec<&str> {
    documents
        .iter()
        .filter_map(|doc| doc.get("title").and_then(Value::as_str))
        .collect()
}

/// Checks the `DocumentStore` contract against any backend. Every document
/// inserted here carries a fresh `run` value, which is returned so callers
/// sharing a database can clean up.
pub async fn exercise_document_store(store: &dyn DocumentStore) -> String {
    use taskdesk::models::Document;
    use taskdesk::store::Collection;

    let run = uuid::Uuid::new_v4().to_string();
    let inserted = vec![
        json!({
            "run": run,
            "title": "Buy milk",
            "category": "To-Do",
            "tags": ["home", "shop"],
            "estimate": { "hours": 1, "unit": "h" }
        }),
        json!({ "run": run, "title": "File taxes", "category": "Done", "tags": ["work"] }),
        json!({ "run": run, "title": "Call mom", "category": "To-Do", "priority": 2 }),
    ];

    let mut ids = Vec::new();
    for task in &inserted {
        let id = store
            .insert_one(Collection::Tasks, object(task.clone()))
            .await
            .expect("insert_one failed");
        ids.push(id.to_string());
    }

    let everything = store
        .find(Collection::Tasks, &Document::new())
        .await
        .expect("find failed");
    let ours: Vec<Document> = everything
        .into_iter()
        .filter(|doc| doc.get("run") == Some(&json!(run)))
        .collect();
    assert_eq!(titles(&ours), vec!["Buy milk", "File taxes", "Call mom"]);

    for ((stored, expected), id) in ours.iter().zip(&inserted).zip(&ids) {
        let mut stored = stored.clone();
        assert_eq!(stored.remove("_id"), Some(json!(id)));
        assert_eq!(Value::Object(stored), *expected);
    }

    let cases = vec![
        (json!({ "category": "To-Do" }), vec!["Buy milk", "Call mom"]),
        (json!({ "category": "to-do" }), vec![]),
        (json!({ "tags": ["shop"] }), vec!["Buy milk"]),
        (json!({ "estimate": { "hours": 1 } }), vec!["Buy milk"]),
        (json!({ "priority": 2.0 }), vec!["Call mom"]),
        (json!({ "priority": "2" }), vec![]),
    ];
    for (filter, expected) in cases {
        let mut scoped = object(filter.clone());
        scoped.insert("run".to_string(), json!(run));
        let found = store
            .find(Collection::Tasks, &scoped)
            .await
            .expect("find failed");
        assert_eq!(titles(&found), expected, "filter: {}", filter);
    }

    let mut todo = object(json!({ "category": "To-Do" }));
    todo.insert("run".to_string(), json!(run));
    let first = store
        .find_one(Collection::Tasks, &todo)
        .await
        .expect("find_one failed")
        .expect("a To-Do task should exist");
    assert_eq!(first.get("_id"), Some(&json!(ids[0])));

    let mut missing = object(json!({ "category": "Someday" }));
    missing.insert("run".to_string(), json!(run));
    let none = store
        .find_one(Collection::Tasks, &missing)
        .await
        .expect("find_one failed");
    assert!(none.is_none());

    let users = store
        .find(Collection::Users, &object(json!({ "run": run })))
        .await
        .expect("find failed");
    assert!(users.is_empty(), "collections must be independent");

    run
}
