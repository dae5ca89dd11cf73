//! Ingress worker
//!
//! Owns the UDP socket and walks the states
//! `WaitNetwork -> SocketOpen -> Listening`, falling into `Failed` when the
//! socket cannot be created or bound. Every datagram is length checked,
//! integrity checked and decoded before it is offered to the command queue.
//! Rejected datagrams are logged and counted, never answered.

use std::net::UdpSocket;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::protocol::{Command, WirePacket};
use crate::queue::CommandProducer;
use super::NetworkContext;

/// Large enough that oversized datagrams still show up as the wrong length
const RECV_BUFFER_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IngressState {
    WaitNetwork = 0,
    SocketOpen = 1,
    Listening = 2,
    Failed = 3,
}

impl IngressState {
    fn from_u8(val: u8) -> Self {
        match val {
            0 => IngressState::WaitNetwork,
            1 => IngressState::SocketOpen,
            2 => IngressState::Listening,
            _ => IngressState::Failed,
        }
    }
}

/// Read-only view of the worker's current state
#[derive(Debug, Clone)]
pub struct StateWatch(Arc<AtomicU8>);

impl StateWatch {
    pub fn get(&self) -> IngressState {
        IngressState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Decides whether a failed worker reopens its socket
pub trait RestartPolicy: Send {
    /// `attempt` counts consecutive failures, starting at 1.
    /// `None` leaves the worker in `Failed` for good.
    fn next_delay(&mut self, attempt: u32) -> Option<Duration>;
}

/// `Failed` is terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverRestart;

impl RestartPolicy for NeverRestart {
    fn next_delay(&mut self, _attempt: u32) -> Option<Duration> {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl RestartPolicy for FixedBackoff {
    fn next_delay(&mut self, attempt: u32) -> Option<Duration> {
        (attempt <= self.max_attempts).then_some(self.delay)
    }
}

/// Ingress counters, shared with whoever wants to observe them
#[derive(Debug, Default)]
pub struct IngressStats {
    received: AtomicU64,
    malformed: AtomicU64,
    integrity_failures: AtomicU64,
    enqueued: AtomicU64,
    dropped_full: AtomicU64,
    receive_errors: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngressCounters {
    pub received: u64,
    pub malformed: u64,
    pub integrity_failures: u64,
    pub enqueued: u64,
    pub dropped_full: u64,
    pub receive_errors: u64,
}

impl IngressStats {
    pub fn snapshot(&self) -> IngressCounters {
        IngressCounters {
            received: self.received.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            integrity_failures: self.integrity_failures.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped_full: self.dropped_full.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct IngressWorker {
    ctx: Arc<NetworkContext>,
    producer: CommandProducer,
    config: PipelineConfig,
    restart: Box<dyn RestartPolicy>,
    stats: Arc<IngressStats>,
    state: Arc<AtomicU8>,
}

impl IngressWorker {
    pub fn new(config: &PipelineConfig, ctx: Arc<NetworkContext>, producer: CommandProducer) -> Self {
        Self {
            ctx,
            producer,
            config: config.clone(),
            restart: Box::new(NeverRestart),
            stats: Arc::new(IngressStats::default()),
            state: Arc::new(AtomicU8::new(IngressState::WaitNetwork as u8)),
        }
    }

    pub fn with_restart_policy<P: RestartPolicy + 'static>(mut self, policy: P) -> Self {
        self.restart = Box::new(policy);
        self
    }

    pub fn stats(&self) -> Arc<IngressStats> {
        Arc::clone(&self.stats)
    }

    pub fn state_watch(&self) -> StateWatch {
        StateWatch(Arc::clone(&self.state))
    }

    pub fn state(&self) -> IngressState {
        IngressState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn enter(&self, state: IngressState) {
        self.state.store(state as u8, Ordering::Release);
        log::debug!("Ingress state -> {:?}", state);
    }

    /// Run the worker for the life of the process
    ///
    /// Only returns once the socket has failed and the restart policy
    /// declines another attempt; the error is the final socket failure.
    pub fn run(mut self) -> Result<()> {
        let mut attempt = 0u32;
        loop {
            self.enter(IngressState::WaitNetwork);
            self.wait_for_network();

            self.enter(IngressState::SocketOpen);
            let err = match self.open_socket() {
                Ok(socket) => {
                    self.enter(IngressState::Listening);
                    self.listen(&socket)
                }
                Err(e) => e,
            };

            //only a socket that could not be opened gets here
            self.enter(IngressState::Failed);
            log::error!("Ingress worker failed: {}", err);
            attempt += 1;
            match self.restart.next_delay(attempt) {
                Some(delay) => {
                    log::warn!("Restarting ingress in {:?} (attempt {})", delay, attempt);
                    thread::sleep(delay);
                }
                None => return Err(err),
            }
        }
    }

    /// Poll the readiness flag until the link is usable; no timeout
    pub fn wait_for_network(&self) {
        if !self.ctx.is_ready() {
            log::info!("Waiting for network...");
        }
        while !self.ctx.is_ready() {
            thread::sleep(self.config.readiness_poll);
        }
    }

    pub fn open_socket(&self) -> Result<UdpSocket> {
        log::info!("Starting UDP server on {}", self.config.bind_addr);
        let socket = UdpSocket::bind(self.config.bind_addr).map_err(Error::SocketFailure)?;
        match socket.local_addr() {
            Ok(addr) => log::info!("UDP server listening on {}", addr),
            Err(_) => log::info!("UDP server listening on {}", self.config.bind_addr),
        }
        Ok(socket)
    }

    fn listen(&mut self, socket: &UdpSocket) -> ! {
        loop {
            //transport errors are transient, receive_once already backed off
            let _ = self.receive_once(socket);
        }
    }

    /// Block for one datagram and process it
    ///
    /// A receive error is logged, followed by the retry delay, and returned
    /// so callers can see it. Rejected datagrams are not errors here.
    pub fn receive_once(&mut self, socket: &UdpSocket) -> Result<()> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match socket.recv_from(&mut buf) {
            Ok((n, peer)) => {
                log::trace!("{} bytes from {}: {:02X?}", n, peer, &buf[..n]);
                let _ = self.handle_datagram(&buf[..n]);
                Ok(())
            }
            Err(e) => {
                IngressStats::bump(&self.stats.receive_errors);
                log::error!("UDP receive error: {}", e);
                thread::sleep(self.config.receive_retry_delay);
                Err(Error::Io(e))
            }
        }
    }

    /// Validate, decode and enqueue one datagram
    ///
    /// Returns the queued command's sequence number. Every error has already
    /// been logged and counted when it is returned.
    pub fn handle_datagram(&self, data: &[u8]) -> Result<u32> {
        IngressStats::bump(&self.stats.received);

        let packet = match WirePacket::validate(data) {
            Ok(packet) => packet,
            Err(e) => {
                match &e {
                    Error::MalformedPacket { len } => {
                        IngressStats::bump(&self.stats.malformed);
                        log::warn!("Invalid packet size: {} bytes (expected {})", len, crate::protocol::PACKET_SIZE);
                    }
                    Error::IntegrityFailure { expected, actual } => {
                        IngressStats::bump(&self.stats.integrity_failures);
                        log::warn!(
                            "Checksum mismatch: calculated {:#010X}, received {:#010X} - packet dropped",
                            expected, actual
                        );
                    }
                    other => log::warn!("Packet rejected: {}", other),
                }
                return Err(e);
            }
        };

        let cmd = Command::from_packet(&packet);
        match self.producer.try_put(cmd) {
            Ok(()) => {
                IngressStats::bump(&self.stats.enqueued);
                log::debug!("6DOF command #{} queued", cmd.sequence);
                Ok(cmd.sequence)
            }
            Err(e) => {
                if matches!(e, Error::QueueFull { .. }) {
                    IngressStats::bump(&self.stats.dropped_full);
                }
                log::warn!("{}", e);
                Err(e)
            }
        }
    }
}
