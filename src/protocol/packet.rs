//! Fixed 16-byte control datagram
//!
//! ```text
//! offset  size  field
//!   0      4    sequence   (big-endian u32)
//!   4      8    payload    (big-endian u64)
//!  12      4    checksum   (big-endian u32, CRC-32 over the raw bytes 0..12)
//! ```
//!
//! The checksum covers the bytes exactly as they appear on the wire, before
//! any byte-order conversion.

use crate::error::{Error, Result};
use super::crc::crc32;

pub const PACKET_SIZE: usize = 16;
/// Bytes covered by the checksum (sequence + payload)
pub const CHECKED_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WirePacket {
    pub sequence: u32,
    pub payload: u64,
    pub checksum: u32,
}

impl WirePacket {
    /// Build a packet with a correct checksum
    pub fn new(sequence: u32, payload: u64) -> Self {
        let header = Self::header_bytes(sequence, payload);
        WirePacket { sequence, payload, checksum: crc32(&header) }
    }

    /// Split a datagram into fields; only the length is checked here
    pub fn parse(data: &[u8]) -> Result<Self> {
        let bytes: &[u8; PACKET_SIZE] = data
            .try_into()
            .map_err(|_| Error::MalformedPacket { len: data.len() })?;

        let mut sequence = [0u8; 4];
        let mut payload = [0u8; 8];
        let mut checksum = [0u8; 4];
        sequence.copy_from_slice(&bytes[0..4]);
        payload.copy_from_slice(&bytes[4..CHECKED_LEN]);
        checksum.copy_from_slice(&bytes[CHECKED_LEN..PACKET_SIZE]);

        Ok(WirePacket {
            sequence: u32::from_be_bytes(sequence),
            payload: u64::from_be_bytes(payload),
            checksum: u32::from_be_bytes(checksum),
        })
    }

    /// Parse and check integrity in one step
    pub fn validate(data: &[u8]) -> Result<Self> {
        let packet = Self::parse(data)?;
        let expected = crc32(&data[..CHECKED_LEN]);
        if expected != packet.checksum {
            return Err(Error::IntegrityFailure { expected, actual: packet.checksum });
        }
        Ok(packet)
    }

    /// Serialize with whatever checksum the packet currently carries
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut out = [0u8; PACKET_SIZE];
        out[..CHECKED_LEN].copy_from_slice(&Self::header_bytes(self.sequence, self.payload));
        out[CHECKED_LEN..].copy_from_slice(&self.checksum.to_be_bytes());
        out
    }

    /// Encode a ready-to-send datagram
    pub fn encode(sequence: u32, payload: u64) -> [u8; PACKET_SIZE] {
        Self::new(sequence, payload).to_bytes()
    }

    fn header_bytes(sequence: u32, payload: u64) -> [u8; CHECKED_LEN] {
        let mut header = [0u8; CHECKED_LEN];
        header[0..4].copy_from_slice(&sequence.to_be_bytes());
        header[4..].copy_from_slice(&payload.to_be_bytes());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let bytes = WirePacket::encode(0x0102_0304, 0x1122_3344_5566_7788);
        assert_eq!(&bytes[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[4..12], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
        let crc = crc32(&bytes[..12]).to_be_bytes();
        assert_eq!(&bytes[12..], &crc);
    }

    #[test]
    fn test_validate_accepts_encoded() {
        let bytes = WirePacket::encode(100, 0x1234_5678_9ABC_DEF0);
        let packet = WirePacket::validate(&bytes).unwrap();
        assert_eq!(packet.sequence, 100);
        assert_eq!(packet.payload, 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn test_wrong_length_rejected() {
        for len in [0, 1, 12, 15, 17, 64] {
            let data = vec![0u8; len];
            match WirePacket::validate(&data) {
                Err(Error::MalformedPacket { len: got }) => assert_eq!(got, len),
                other => panic!("expected MalformedPacket, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_flipped_checksum_byte_rejected() {
        let mut bytes = WirePacket::encode(3, 0);
        bytes[15] ^= 0xFF;
        match WirePacket::validate(&bytes) {
            Err(Error::IntegrityFailure { expected, actual }) => {
                assert_eq!(expected, crc32(&bytes[..12]));
                assert_eq!(actual & 0xFF, expected & 0xFF ^ 0xFF);
            }
            other => panic!("expected IntegrityFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_body_rejected() {
        let mut bytes = WirePacket::encode(255, 0x5555_AAAA_5555_AAAA);
        bytes[5] ^= 0x01;
        assert!(matches!(WirePacket::validate(&bytes), Err(Error::IntegrityFailure { .. })));
    }

    #[test]
    fn test_sender_xor_corruption_rejected() {
        //bench client corrupts by xoring the crc with 0xDEADBEEF
        let mut packet = WirePacket::new(254, 0x5555_AAAA_5555_AAAA);
        packet.checksum ^= 0xDEAD_BEEF;
        assert!(WirePacket::validate(&packet.to_bytes()).is_err());
    }
}
