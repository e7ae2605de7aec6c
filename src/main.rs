use actix_cors::Cors;
use actix_web::{web, HttpServer};
use std::{io, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod assembly;
mod autosave;
mod catalog;
mod classify;
mod config;
mod database;
mod enhance;
mod error;
mod export;
mod models;
mod routes;
mod sanitize;
mod wizard;

use config::{AppConfig, StoreBackend};
use models::{
    document::{DocumentStore, MemoryDocumentStore, MongoDocumentStore},
    user::TokenVerifier,
};
use routes::AppState;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn startup_error(error: impl std::fmt::Display) -> io::Error {
    error!(%error, "startup failed");
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let config: AppConfig = AppConfig::from_env().map_err(startup_error)?;
    let verifier: TokenVerifier = TokenVerifier::from_key(&config.auth_key).map_err(startup_error)?;

    let store: Arc<dyn DocumentStore> = match config.store {
        StoreBackend::Mongo => {
            database::connect(&config.mongodb_uri, &config.mongodb_database)
                .await
                .map_err(startup_error)?;
            Arc::new(MongoDocumentStore)
        }
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
    };
    if config.ai.api_key.is_none() {
        info!("AI_API_KEY not set, text enhancement disabled");
    }
    let state = web::Data::new(AppState::new(
        store,
        enhance::from_config(&config.ai),
        Arc::new(export::HttpPdfRenderer::new(config.pdf_renderer_url.clone())),
        Arc::new(export::WordRenderer),
        config.autosave_delay,
        config.ai.timeout,
        config.asset_dir.clone(),
    ));

    let origins: Vec<String> = config.allowed_origins.clone();
    let max_body_bytes: usize = config.max_body_bytes;
    info!(address = %config.bind_address, port = config.port, "starting server");

    HttpServer::new(move || {
        let cors = if origins.is_empty() {
            Cors::permissive()
        } else {
            origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        routes::build_app(state.clone(), verifier.clone(), max_body_bytes).wrap(cors)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
