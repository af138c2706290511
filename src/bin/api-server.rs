//! Levelscope API Server
//!
//! Serves the support/resistance dashboard and its JSON API. The service is
//! stateless and request-per-interaction; nothing runs in the background.

use dotenvy::dotenv;
use levelscope::config::Config;
use levelscope::core::http::start_server;
use levelscope::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;

    let env = levelscope::config::get_environment();
    info!("Starting Levelscope API Server");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
