#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the canvass map application.
//!
//! Serves the areas graph of canvassing assignments: per-area progress
//! computed on every request from the canvass store (`SQLite`) and the
//! person directory (REST).

pub mod config;
mod handlers;
pub mod interactive;
pub mod service;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use canvass_map_database::CanvassStore;
use canvass_map_database::queries::SqliteStore;
use canvass_map_graph::AreaVisitAggregator;
use canvass_map_people::{PersonDirectory, RestPersonDirectory};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Canvass document store.
    pub store: Arc<dyn CanvassStore>,
    /// Person directory used to resolve session assignees.
    pub people: Arc<dyn PersonDirectory>,
    /// Aggregator configured with the overlap policy.
    pub aggregator: AreaVisitAggregator,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route(
                "/orgs/{org_id}/areaassignments/{assignment_id}/areasgraph",
                web::get().to(handlers::areas_graph),
            ),
    );
}

/// Starts the canvass map API server.
///
/// Opens the `SQLite` store at the configured path, builds the person
/// directory from the environment, and starts the Actix-Web HTTP server.
/// This is a regular async function; the caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the store cannot be opened, the
/// HTTP server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Opening canvass store at {}...", config.database_path.display());
    let store = SqliteStore::open(&config.database_path)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to open canvass store: {e}")))?;

    let people = RestPersonDirectory::from_env();

    let aggregator = AreaVisitAggregator::new(config.overlap_policy);
    log::info!("Overlapping areas policy: {}", aggregator.policy());

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        people: Arc::new(people),
        aggregator,
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
