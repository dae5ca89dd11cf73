/**
 * Network context and bring-up
 *
 * `NetworkContext` replaces the process-global readiness flag: it is created
 * once, shared through `Arc`, written only by the bring-up collaborator and
 * read by the ingress worker while it waits for the link.
 */

pub mod ingress;

pub use ingress::{IngressWorker, IngressState, IngressStats, RestartPolicy, NeverRestart, FixedBackoff};

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, Result};

/// Time given to the interface to come up before it is reported ready
pub const LINK_SETTLE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct NetworkContext {
    ready: AtomicBool,
}

impl NetworkContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A stale read only delays startup by one poll interval
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Single writer: the bring-up collaborator
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkConfig {
    Static {
        address: Ipv4Addr,
        netmask: Ipv4Addr,
        gateway: Ipv4Addr,
    },
    Dhcp,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig::Static {
            address: Ipv4Addr::new(192, 168, 1, 100),
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 1, 1),
        }
    }
}

fn parse_ipv4(label: &str, value: &str) -> Result<Ipv4Addr> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid {} format: {}", label, value)))
}

impl LinkConfig {
    pub fn from_static(address: &str, netmask: &str, gateway: &str) -> Result<Self> {
        Ok(LinkConfig::Static {
            address: parse_ipv4("IP address", address)?,
            netmask: parse_ipv4("netmask", netmask)?,
            gateway: parse_ipv4("gateway", gateway)?,
        })
    }
}

/// Bring the link up and raise the readiness flag once it has settled
///
/// Interface configuration itself belongs to the host; this logs what the
/// link is expected to look like and signals the ingress worker.
pub fn bring_up(ctx: Arc<NetworkContext>, link: LinkConfig, settle: Duration) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new().name("net-bringup".to_string()).spawn(move || {
        match &link {
            LinkConfig::Static { address, netmask, gateway } => {
                log::info!("Static IP configuration:");
                log::info!("  IP: {}", address);
                log::info!("  Netmask: {}", netmask);
                log::info!("  Gateway: {}", gateway);
            }
            LinkConfig::Dhcp => log::info!("Waiting for DHCP lease..."),
        }
        thread::sleep(settle);
        ctx.set_ready(true);
        log::info!("Network interface is up - network is ready");
    })
}

/// Interface went down; ingress already past the wait is unaffected
pub fn mark_down(ctx: &NetworkContext) {
    log::warn!("Network interface is down");
    ctx.set_ready(false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_starts_not_ready() {
        let ctx = NetworkContext::new();
        assert!(!ctx.is_ready());
        ctx.set_ready(true);
        assert!(ctx.is_ready());
        mark_down(&ctx);
        assert!(!ctx.is_ready());
    }

    #[test]
    fn test_bring_up_raises_flag() {
        let ctx = NetworkContext::new();
        let handle = bring_up(Arc::clone(&ctx), LinkConfig::Dhcp, Duration::from_millis(5)).unwrap();
        handle.join().unwrap();
        assert!(ctx.is_ready());
    }

    #[test]
    fn test_static_link_parsing() {
        let link = LinkConfig::from_static("192.168.1.100", "255.255.255.0", "192.168.1.1").unwrap();
        assert_eq!(link, LinkConfig::default());
        assert!(LinkConfig::from_static("192.168.1.300", "255.255.255.0", "192.168.1.1").is_err());
        assert!(LinkConfig::from_static("192.168.1.100", "mask", "192.168.1.1").is_err());
    }
}
