//! Service binary: runs the user-lifecycle webhook service until ctrl-c.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use expresscare::api::{start_service, MemoryProfileStore, ProfileStore, ServiceContext};
use expresscare::config::{self, ServiceConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} service starting v{}", config::APP_NAME, config::APP_VERSION);

    let service_config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let bind_addr = service_config.bind_addr.clone();
    let store = Arc::new(MemoryProfileStore::new()) as Arc<dyn ProfileStore>;
    let ctx = ServiceContext::new(store, service_config);

    let mut server = match start_service(ctx, &bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start service: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
}
