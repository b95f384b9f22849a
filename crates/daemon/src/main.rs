//! webrpc Example Server - Main Entry Point

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use webrpc_example_schema::example_service_at;
use webrpc_example_server::telemetry::{init_logging, LogFormat};
use webrpc_example_server::ExampleService;
use webrpc_server::{RpcServer, RpcServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    init_logging(LogFormat::from_env())?;
    info!("webrpc example server v{} starting...", webrpc_core::VERSION);

    // 2. Configuration
    let config = RpcServerConfig::from_env();

    // 3. Services (handler sets are checked here, before binding)
    let example = example_service_at(Arc::new(ExampleService::new()), &config.base_path)
        .context("Example service registration failed")?;

    // 4. HTTP host
    let handle = RpcServer::new(config)
        .register(example)
        .start()
        .await
        .context("Server start failed")?;

    info!(url = %handle.url(), "Ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    handle.stop().await.context("Server stop failed")?;
    info!("Shutdown complete.");

    Ok(())
}
