use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::context::ServiceContext;
use crate::http::connection::Connection;

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the TCP endpoint. Failure here is fatal for startup.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding TCP endpoint {}", cfg.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts connections forever, one task per connection.
pub async fn serve(
    listener: TcpListener,
    cfg: &ServerConfig,
    ctx: Arc<ServiceContext>,
) -> anyhow::Result<()> {
    let slots = Arc::new(Semaphore::new(cfg.max_connections.max(1)));
    let idle_timeout = cfg.idle_timeout();

    loop {
        let permit = Arc::clone(&slots).acquire_owned().await?;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, ctx).with_idle_timeout(Some(idle_timeout));
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            tracing::debug!(%peer, "Connection finished");
            drop(permit);
        });
    }
}

pub async fn run(cfg: &ServerConfig, ctx: Arc<ServiceContext>) -> anyhow::Result<()> {
    let listener = bind(cfg).await?;
    serve(listener, cfg, ctx).await
}
