/**
 * ROV Firmware
 *
 * Starts the command pipeline with the fixed protocol constants:
 * 1. Brings the network link up (static IP)
 * 2. Ingress worker listens on UDP 12345 once the link is ready
 * 3. Control worker dispatches each validated command
 *
 * No arguments. Log level via RUST_LOG (default info).
 */

use rov_link::net::{self, LINK_SETTLE};
use rov_link::{Actuation, LinkConfig, NetworkContext, Pipeline, PipelineConfig};
use std::sync::Arc;
use std::thread;

fn main() -> rov_link::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("=== ROV firmware v{} starting ===", env!("CARGO_PKG_VERSION"));

    let ctx = NetworkContext::new();
    net::bring_up(Arc::clone(&ctx), LinkConfig::default(), LINK_SETTLE)?;

    let pipeline = Pipeline::start(PipelineConfig::default(), ctx, Actuation::logging())?;

    // Ingress only comes back after a terminal socket failure. Nothing
    // restarts it; the process stays up either way.
    let (result, _control) = pipeline.join_ingress();
    if let Err(e) = result {
        log::error!("UDP server stopped: {}", e);
    }

    loop {
        thread::park();
    }
}
