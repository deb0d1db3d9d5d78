mod config;
mod db;
mod error;
mod models;
mod routes;
mod scrapers;
mod services;
mod store;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};
use crate::routes::AppState;
use crate::scrapers::linkedin::LinkedInScraper;
use crate::store::PgJobStore;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(pool: PgPool) -> impl IntoResponse {
    let result: Result<(i32,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;
    match result {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scrape_service=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    let state = AppState {
        store: Arc::new(PgJobStore::new(pool.clone())),
        scraper: Arc::new(LinkedInScraper::new(&config.scraper)?),
    };

    match config.resolved_command() {
        Command::Serve { listen_addr } => serve(pool, state, &listen_addr).await,
        Command::Ingest => {
            let result =
                services::ingest::ingest_new_jobs(state.store.as_ref(), state.scraper.as_ref())
                    .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Describe { job_id } => {
            let description = services::description::fetch_and_store_description(
                state.store.as_ref(),
                state.scraper.as_ref(),
                job_id,
            )
            .await?;
            println!("{}", description.job_description);
            Ok(())
        }
    }
}

async fn serve(pool: PgPool, state: AppState, listen_addr: &str) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(move || readyz(pool.clone())))
        .merge(routes::api::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting gracefully");
        })
        .await?;

    Ok(())
}
