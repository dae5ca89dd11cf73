//! Error taxonomy for the command pipeline

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Datagram was not exactly one wire packet long
    #[error("Malformed packet: expected 16 bytes, got {len}")]
    MalformedPacket { len: usize },

    /// Transmitted CRC-32 did not match the one computed over the header
    #[error("Integrity failure: expected {expected:#010x}, got {actual:#010x}")]
    IntegrityFailure {
        /// Checksum computed locally over bytes 0..12
        expected: u32,
        /// Checksum carried in the packet
        actual: u32,
    },

    /// Command queue at capacity, newest command shed
    #[error("Command queue full, command #{sequence} dropped")]
    QueueFull { sequence: u32 },

    /// Socket could not be created or bound
    #[error("Socket failure: {0}")]
    SocketFailure(#[source] std::io::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),

    /// Every producer or consumer of the queue is gone
    #[error("Command queue disconnected")]
    Disconnected,
}
