//! Casting Agency
//!
//! Entry point for the actors and movies API.

use casting_agency::config::Config;
use casting_agency::observability::metrics::init_metrics_recorder;
use casting_agency::routes::{self, AppState};
use common::secret::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env must be loaded before the filter reads RUST_LOG
    let dotenv_result = dotenvy::dotenv();

    init_tracing();

    match dotenv_result {
        Ok(path) => info!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }

    info!("Starting Casting Agency");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        jwt_issuer = %config.jwt_issuer,
        jwks_url = %config.jwks_url,
        jwt_clock_skew_seconds = config.jwt_clock_skew.as_secs(),
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    info!("Connecting to database...");
    let db_url_with_timeout = add_query_timeout(config.database_url.expose_secret(), 5);
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&db_url_with_timeout)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Database connection established");

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;
    let drain = config.drain;

    let state = Arc::new(AppState {
        pool: db_pool.clone(),
        config,
    });

    let app = routes::build_routes(state, metrics_handle);

    info!("Casting Agency listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain))
        .await?;

    db_pool.close().await;
    info!("Casting Agency shutdown complete");

    Ok(())
}

/// Plain text logs by default, JSON with `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "casting_agency=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Listens for shutdown signals (SIGTERM, SIGINT), then waits out the drain period.
async fn shutdown_signal(drain: Duration) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    if drain.is_zero() {
        info!("Skipping drain period (DRAIN_SECONDS=0)");
    } else {
        warn!("Draining connections for {} seconds...", drain.as_secs());
        tokio::time::sleep(drain).await;
        info!("Drain period complete");
    }
}

/// Adds statement_timeout to the database URL so queries cannot hang.
fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}options=-c%20statement_timeout%3D{timeout_secs}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_query_timeout() {
        assert_eq!(
            add_query_timeout("postgresql://db/casting", 5),
            "postgresql://db/casting?options=-c%20statement_timeout%3D5s"
        );
        assert_eq!(
            add_query_timeout("postgresql://db/casting?sslmode=require", 5),
            "postgresql://db/casting?sslmode=require&options=-c%20statement_timeout%3D5s"
        );
    }
}
