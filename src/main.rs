//! Countdown - a concurrent timer-lifecycle engine
//! 
//! This is the main entry point for the countdown server.

use tokio::net::TcpListener;
use tracing::info;

use countdown::{
    config::Config,
    state::TimerManager,
    api::create_router,
    tasks::attach_event_logger,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    let manager = TimerManager::new();

    // Loggers stay registered for the lifetime of the process
    for device_id in config.logged_scopes() {
        attach_event_logger(&manager, device_id);
    }

    // Create HTTP router with all endpoints
    let app = create_router(manager);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timers                     - Start a timer");
    info!("  GET    /timers                     - List running timers");
    info!("  POST   /timers/find                - Find a timer by name or start time");
    info!("  DELETE /timers/:id                 - Cancel a timer");
    info!("  POST   /timers/:id/add             - Add time to a timer");
    info!("  POST   /timers/:id/remove          - Remove time from a timer");
    info!("  GET    /events                     - Event stream for unscoped timers");
    info!("  GET    /devices/:device_id/events  - Event stream for a device");
    info!("  GET    /health                     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
