use item_service::config::Config;
use item_service::db::{ItemStore, MemoryItemStore, PgItemStore};
use item_service::routes::{create_app, urls::UrlTable};
use item_service::state::AppState;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let loaded = Config::load();
    let log_level = loaded
        .as_ref()
        .map(|config| config.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("item_service=debug,tower_http=debug,axum::rejection=trace,{}", log_level).into()
        }))
        .init();

    info!("Starting server...");

    let config = match loaded {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            warn!("Using default configuration");
            Config::default()
        }
    };

    // Initialize database connection if URL is provided
    let store: Arc<dyn ItemStore> = match &config.db_url {
        Some(db_url) => match PgItemStore::connect(db_url).await {
            Ok(store) => {
                info!("Database initialized successfully");
                Arc::new(store)
            }
            Err(e) => {
                error!("Failed to initialize database: {}", e);
                warn!("Falling back to the in-memory item store");
                Arc::new(MemoryItemStore::new())
            }
        },
        None => {
            warn!("No database URL configured - items are kept in memory only");
            Arc::new(MemoryItemStore::new())
        }
    };

    if config.is_production() && config.db_url.is_none() {
        warn!("Running in production without a database - items will not survive a restart");
    }

    let urls = UrlTable::new(&config.mount_prefix);
    info!("Item routes mounted at '{}/'", urls.prefix());

    let state = AppState::new(store, urls);
    let app_routes = create_app(state, &config.cors_origin_list());

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📚 OpenAPI document at http://{}/api-docs/openapi.json", config.server_address());

    axum::serve(listener, app_routes)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
