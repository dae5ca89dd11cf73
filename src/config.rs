//! Pipeline configuration
//!
//! The firmware runs with `PipelineConfig::default()`, which carries the fixed
//! protocol constants. The builder methods exist for integrators and tests.

use crate::error::{Error, Result};
use crate::protocol::UDP_PORT;
use crate::queue::QUEUE_CAPACITY;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

pub const READINESS_POLL: Duration = Duration::from_millis(100);
pub const RECEIVE_RETRY_DELAY: Duration = Duration::from_millis(100);
pub const DISPATCH_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Address the ingress socket binds to (all interfaces by default)
    pub bind_addr: SocketAddr,
    pub queue_capacity: usize,
    /// Interval between readiness flag checks before the socket is opened
    pub readiness_poll: Duration,
    /// Pause after a transport-level receive error
    pub receive_retry_delay: Duration,
    /// Pause after each dispatched command
    pub dispatch_delay: Duration,
    /// Nice value for the ingress thread (lower runs first)
    pub ingress_nice: i32,
    /// Nice value for the control thread
    pub control_nice: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, UDP_PORT)),
            queue_capacity: QUEUE_CAPACITY,
            readiness_poll: READINESS_POLL,
            receive_retry_delay: RECEIVE_RETRY_DELAY,
            dispatch_delay: DISPATCH_DELAY,
            ingress_nice: 0,
            control_nice: 5,
        }
    }
}

impl PipelineConfig {
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_readiness_poll(mut self, interval: Duration) -> Self {
        self.readiness_poll = interval;
        self
    }

    pub fn with_receive_retry_delay(mut self, delay: Duration) -> Self {
        self.receive_retry_delay = delay;
        self
    }

    pub fn with_dispatch_delay(mut self, delay: Duration) -> Self {
        self.dispatch_delay = delay;
        self
    }

    pub fn with_priorities(mut self, ingress_nice: i32, control_nice: i32) -> Self {
        self.ingress_nice = ingress_nice;
        self.control_nice = control_nice;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig("queue_capacity must be greater than 0".into()));
        }
        if self.ingress_nice >= self.control_nice {
            return Err(Error::InvalidConfig(format!(
                "ingress must outrank control (ingress_nice {} >= control_nice {})",
                self.ingress_nice, self.control_nice
            )));
        }
        Ok(())
    }
}
