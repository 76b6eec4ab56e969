//! Stay Vista API server
//!
//! REST backend for the room rental platform: accounts, listings, paid
//! bookings and dashboard statistics.

mod auth;
mod config;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stay_api=debug,stay_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let port = config.port;
    let cors = cors_layer(&config);

    let app_state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    app_state.notifier().verify().await;

    let resumed = app_state
        .checkout()
        .reconcile()
        .await
        .context("Failed to reconcile pending bookings")?;
    if resumed > 0 {
        tracing::info!("Confirmed {} pending bookings left from a previous run", resumed);
    }

    let app = routes::router()
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Stay Vista is sitting on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
