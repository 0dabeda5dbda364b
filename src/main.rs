use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rider_finance::{build_router, init_storage, AppConfig, AppState, Storage};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("rider_finance=debug".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = AppConfig::from_env();

    info!("🏍️ Starting rider finance tracker...");
    info!("   Commission 15% • Saldo 10% • BBM 10% • Oli 10%");
    info!("   Data directory: {}", config.data_dir.display());
    info!("");

    info!("Initializing storage...");
    let storage = Storage::new(&config.data_dir);
    if let Err(e) = init_storage(&storage) {
        error!("Failed to initialize storage: {}", e);
        return;
    }
    info!("Storage initialized successfully");

    let listener = match TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr(), e);
            return;
        }
    };
    info!("🌐 Dashboard available at http://{}", config.bind_addr());

    let app = build_router(AppState::new(storage));
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("👋 Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
