mod config;
mod db;
mod error;
mod handlers;
mod models;
mod ranking;
mod services;
mod templates;
mod validation;

use config::Config;
use db::Db;
use ntex::web;
use ntex_cors::Cors;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = Config::load();
    let db = Arc::new(Db::open(&config.database_path).map_err(std::io::Error::other)?);
    info!(path = %config.database_path, "database ready");

    if config.seed_demo {
        match services::seed::seed_demo(&db) {
            Ok(created) => info!(created, "demo seed finished"),
            Err(e) => error!("demo seed failed: {e}"),
        }
    }

    let addr = config.bind_addr();
    info!("OpenScore server starting on {}", addr);

    web::HttpServer::new(move || {
        web::App::new()
            .state(db.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            .route("/api/templates", web::get().to(handlers::leaderboards::list_templates))
            // Leaderboards
            .service(
                web::resource("/api/leaderboards")
                    .route(web::get().to(handlers::leaderboards::list_leaderboards))
                    .route(web::post().to(handlers::leaderboards::create_leaderboard)),
            )
            .route("/api/leaderboards/{id}", web::get().to(handlers::leaderboards::get_leaderboard))
            .route(
                "/api/leaderboards/{id}/view",
                web::get().to(handlers::leaderboards::get_leaderboard_view),
            )
            // Entries
            .route("/api/leaderboards/{id}/entries", web::post().to(handlers::entries::add_entry))
            .service(
                web::resource("/api/leaderboards/{id}/entries/{entry_id}")
                    .route(web::patch().to(handlers::entries::update_entry))
                    .route(web::delete().to(handlers::entries::remove_entry)),
            )
    })
    .bind(addr)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
