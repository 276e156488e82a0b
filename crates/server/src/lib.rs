//! Scholarlink HTTP Server
//!
//! Actix-web REST API over the recommendation engine, plus the background
//! embedding reload task.

pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use scholarlink_common::{AppConfig, Result};
use scholarlink_encoder::OllamaEncoder;
use scholarlink_engine::{artifacts, EmbeddingStore, Reloader};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::state::AppState;

/// Start the HTTP server and the background reload loop
pub async fn start_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let encoder = Arc::new(OllamaEncoder::new(
        &config.ollama_base_url,
        &config.embedding_model,
    )?);

    // Serve persisted artifacts immediately if a previous run left any;
    // otherwise start empty and let the first reload cycle populate
    let store = match artifacts::load_snapshot(&config.artifacts_dir).await? {
        Some(snapshot) => Arc::new(EmbeddingStore::new(snapshot)),
        None => {
            info!("No persisted artifacts found; serving empty snapshot until first reload");
            Arc::new(EmbeddingStore::empty())
        }
    };

    let reloader = Reloader::new(&config, encoder, store.clone());
    let reload_status = reloader.status_handle();
    tokio::spawn(reloader.run());

    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config, store, reload_status));

    info!("Starting server on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .service(routes::recommend::recommend_professors)
            .service(routes::recommend::recommend_students)
            .service(routes::recommend::recommend_similar_students)
            .service(routes::recommend::recommend_similar_professors)
            .service(routes::system::health)
            .service(routes::system::status)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
