use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use seatlock_api::{app, worker::start_expiry_sweeper, AppState};
use seatlock_core::SystemClock;
use seatlock_store::{Config, ReservationStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatlock_api=debug,seatlock_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(
        "Starting Seatlock with {} seats, {}s locks",
        config.reservation.total_seats,
        config.reservation.lock_seconds
    );

    let store = Arc::new(ReservationStore::from_config(&config.reservation, Arc::new(SystemClock)));

    tokio::spawn(start_expiry_sweeper(store.clone(), config.reservation.sweep_interval()));

    let app = app(AppState { store });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Ticket booking system running on http://localhost:{}", config.server.port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
