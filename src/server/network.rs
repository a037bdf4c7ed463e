//! Wireless link bring-up.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::bail;

use crate::config::WifiConfig;

/// A network interface that must be associated before serving.
pub trait WirelessLink {
    /// Joins `ssid` and returns the address assigned to the interface.
    fn associate(&mut self, ssid: &str, password: &str, timeout: Duration) -> anyhow::Result<IpAddr>;
}

/// A host whose interface is already up; association always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct HostLink {
    addr: IpAddr,
}

impl HostLink {
    pub fn new(addr: IpAddr) -> Self {
        Self { addr }
    }
}

impl WirelessLink for HostLink {
    fn associate(&mut self, _ssid: &str, _password: &str, _timeout: Duration) -> anyhow::Result<IpAddr> {
        Ok(self.addr)
    }
}

/// Associates `link`, retrying with a fixed delay.
///
/// Gives up after `cfg.max_attempts` failures; the caller treats that as a
/// fatal startup error.
pub async fn bring_up<L: WirelessLink>(link: &mut L, cfg: &WifiConfig) -> anyhow::Result<IpAddr> {
    let attempts = cfg.max_attempts.max(1);

    for attempt in 1..=attempts {
        tracing::info!(ssid = %cfg.ssid, attempt, "Connecting to Wi-Fi");

        match link.associate(&cfg.ssid, &cfg.password, cfg.connect_timeout()) {
            Ok(addr) => {
                tracing::info!("Device IP: {}", addr);
                return Ok(addr);
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, max_attempts = attempts, "Wi-Fi connection failed");
                if attempt < attempts {
                    tokio::time::sleep(cfg.retry_delay()).await;
                }
            }
        }
    }

    bail!("could not join Wi-Fi network {:?} after {} attempts", cfg.ssid, attempts)
}
