pub mod error;
pub mod config;
pub mod protocol;
pub mod queue;
pub mod net;
pub mod control;
pub mod uart;
pub mod sched;
pub mod pipeline;
pub mod ffi;

#[cfg(feature = "python")]
pub mod python;

pub use error::{Error, Result};
pub use config::PipelineConfig;
pub use protocol::{Axes, Command, WirePacket, crc32, decode_payload, encode_payload, PACKET_SIZE, UDP_PORT};
pub use queue::{command_queue, CommandProducer, CommandConsumer, QUEUE_CAPACITY};
pub use net::{NetworkContext, LinkConfig, IngressWorker, IngressState};
pub use control::{Actuation, ControlWorker, ThrustStrategy, AuxiliaryDriver, Indicator, ThrustMixer};
pub use pipeline::{ControlHandle, Pipeline};
