use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use homecontrol::config::Config;
use homecontrol::context::ServiceContext;
use homecontrol::server::{listener, network};
use homecontrol::tasks;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.logging.max_level()?)
        .init();

    let host_ip = cfg
        .server
        .listen_addr
        .parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let mut link = network::HostLink::new(host_ip);
    network::bring_up(&mut link, &cfg.wifi).await?;

    let ctx = Arc::new(ServiceContext::from_config(&cfg));
    let _tasks = tasks::spawn_all(cfg.tasks.period());

    tokio::select! {
        res = listener::run(&cfg.server, ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
