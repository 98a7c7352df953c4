use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use taskdesk::{
    auth::{AuthMiddleware, TokenService},
    config::Config,
    routes,
    store::{DocumentStore, PostgresStore},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let tokens = web::Data::new(TokenService::new(config.token_secret.as_deref()));
    if !tokens.is_configured() {
        log::warn!(
            "ACCESS_SEC_TOKEN is not set; POST /jwt and GET /users will fail"
        );
    }

    let postgres = Arc::new(
        PostgresStore::connect(&config.database_url, config.max_connections)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    let store: Arc<dyn DocumentStore> = postgres.clone();
    let store = web::Data::from(store);

    log::info!("Starting server at {}", config.server_url());
    let result = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens.clone())
            .wrap(AuthMiddleware::default())
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await;

    postgres.close().await;
    result
}
