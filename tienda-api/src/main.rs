//! # Tienda API Server
//!
//! The administration backend for the Tienda store: customer and product
//! CRUD, user registration and session login, and free-text search.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tienda cargo run -p tienda-api
//! ```

use tienda_api::app::{build_router, AppState};
use tienda_api::config::Config;
use tienda_shared::db::migrations::{ensure_database_exists, run_migrations};
use tienda_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use tienda_shared::models::session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tienda_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Tienda API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let purged = Session::delete_expired(&pool).await?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves when ctrl-c is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    } else {
        tracing::info!("Shutdown signal received");
    }
}
