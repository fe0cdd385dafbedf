use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use rentals_backend::{
    app::create_router,
    app_state::AppState,
    config::Config,
    db::{self, PgRentalStore},
    telemetry::init_telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let telemetry = init_telemetry(None).await?;

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        app = %config.app.name,
        environment = ?config.app.environment,
        database_endpoint = %config.database.endpoint_masked(),
        database_name = %config.database.name,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let pool = db::init_pool(&config.database).await?;
    info!("Database connection pool established");

    let store = PgRentalStore::new(pool.clone(), config.database.retry_policy());
    let app = create_router(AppState::new(Arc::new(store)));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("{} listening on {}", config.app.name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    pool.close().await;
    telemetry.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
