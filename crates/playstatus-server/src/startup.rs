//! Background startup helper for embedding the server.
//!
//! [`spawn_server`] binds before it spawns, so a port conflict is reported
//! to the caller instead of being logged from a background task.
//!
//! ```rust,ignore
//! let (addr, handle) = spawn_server(&config, state, shutdown).await?;
//! // ... later, after triggering shutdown:
//! handle.await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the status server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),

    /// The bound listener did not report its address.
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[from] std::io::Error),
}

/// Bind the status server and run it on a background task.
///
/// Returns the bound address (useful with port `0`) and the task handle.
/// The task ends once `shutdown` resolves and in-flight connections have
/// drained.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be bound.
pub async fn spawn_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(SocketAddr, JoinHandle<()>), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = server::bind(config).await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "Status server exited with error");
        }
    });

    tracing::info!(%addr, "Status server spawned on background task");
    Ok((addr, handle))
}
