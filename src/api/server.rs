//! Service lifecycle — binds the listener, mounts `service_router()`,
//! and runs axum in a background task with a graceful-shutdown channel.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::api::router::{service_router, ServiceContext};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Handle to a running service. Dropping it does not stop the server;
/// call [`ServiceServer::shutdown`].
pub struct ServiceServer {
    pub local_addr: std::net::SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServiceServer {
    /// Signal the server to stop accepting connections and drain.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Service shutdown signal sent");
        }
    }
}

/// Bind `bind_addr` and serve the router in a background tokio task.
pub async fn start_service(
    ctx: ServiceContext,
    bind_addr: &str,
) -> Result<ServiceServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.to_string(),
            source,
        })?;

    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
        addr: bind_addr.to_string(),
        source,
    })?;

    let app = service_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Service received shutdown signal");
        };

        tracing::info!(%local_addr, "Service started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Service error: {e}");
        }

        tracing::info!("Service stopped");
    });

    Ok(ServiceServer {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
