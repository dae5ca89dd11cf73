pub mod crc;
pub mod packet;
pub mod command;

pub use crc::{crc32, crc32_bitwise};
pub use packet::{WirePacket, PACKET_SIZE, CHECKED_LEN};
pub use command::{Axes, Command, ControlPayload, decode_payload, encode_payload};

/// Well-known UDP port the firmware listens on
pub const UDP_PORT: u16 = 12345;
