//! Chat mirror entry point
//!
//! Run with:
//! ```bash
//! cargo run -p mirror-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use mirror_common::{try_init_tracing, MirrorConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the mirror
    if let Err(e) = run().await {
        error!(error = %e, "Mirror failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting chat mirror...");

    // Load configuration
    let config = MirrorConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        server_id = %config.server_id,
        routes = config.routes.len(),
        gateway_url = %config.gateway.url,
        "Configuration loaded"
    );

    // Run until the operator stops the process
    tokio::select! {
        () = mirror_gateway::run(config) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
