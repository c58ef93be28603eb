#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the edustats dashboard.
//!
//! Serves the read-only REST API over the student statistics tables:
//! filter options, the raw statistics table, summary cards, yearly trends,
//! the per-province map, multi-group comparison and per-school listings.
//! Every endpoint answers with `{success, data, pagination?}` or
//! `{success: false, error}`.

pub mod error;
mod handlers;
pub mod interactive;
mod params;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use edustats_database::db;
use edustats_geography_models::sido::SidoTable;
use edustats_school_models::DEFAULT_REPORTING_YEAR;
use switchy_database::Database;

use crate::error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Statistics database connection.
    pub db: Arc<dyn Database>,
    /// Province name lookup for the map.
    pub sidos: Arc<SidoTable>,
    /// Year used when a request names none.
    pub default_year: i32,
}

/// Registers the `/api` routes.
///
/// Rejected query strings and unmatched paths answer with the same JSON
/// error body as the handlers.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|e, _req| ApiError::BadRequest(e.to_string()).into()),
            )
            .route("/health", web::get().to(handlers::health))
            .route("/regions", web::get().to(handlers::regions))
            .route("/regions/tree", web::get().to(handlers::region_tree))
            .route("/statistics", web::get().to(handlers::statistics))
            .route(
                "/statistics/summary",
                web::get().to(handlers::statistics_summary),
            )
            .route("/statistics/trend", web::get().to(handlers::statistics_trend))
            .route("/statistics/map", web::get().to(handlers::statistics_map))
            .route(
                "/statistics/compare",
                web::get().to(handlers::statistics_compare),
            )
            .route("/schools", web::get().to(handlers::schools_list))
            .route(
                "/schools/{name}/detail",
                web::get().to(handlers::school_detail),
            ),
    )
    .default_service(web::to(handlers::not_found));
}

/// Reads `EDUSTATS_DEFAULT_YEAR`, falling back to the reporting year.
fn default_year_from_env() -> i32 {
    match std::env::var("EDUSTATS_DEFAULT_YEAR") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid EDUSTATS_DEFAULT_YEAR '{raw}'");
            DEFAULT_REPORTING_YEAR
        }),
        Err(_) => DEFAULT_REPORTING_YEAR,
    }
}

/// Starts the edustats API server.
///
/// Connects to the database (ensuring the schema exists), builds the
/// province lookup table, and starts the Actix-Web HTTP server. The
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the database cannot be opened,
/// the province table fails validation, or the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env().await.map_err(|e| {
        log::error!("Failed to connect to database: {e}");
        io::Error::other(e.to_string())
    })?;

    let sidos = SidoTable::standard().map_err(|e| io::Error::other(e.to_string()))?;
    let default_year = default_year_from_env();
    log::info!(
        "Loaded {} provinces, default year {default_year}",
        sidos.len()
    );

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        sidos: Arc::new(sidos),
        default_year,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
