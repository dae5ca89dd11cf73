//! Decoded control command
//!
//! Payload layout (byte 0 is the least significant byte of the u64):
//! bytes 0..6 are surge, sway, heave, roll, pitch, yaw offset by +128,
//! byte 6 is light, byte 7 is manipulator.

use super::packet::WirePacket;

const AXIS_OFFSET: i16 = 128;

/// Six-axis motion intent, each in [-128, 127]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axes {
    pub surge: i8,
    pub sway: i8,
    pub heave: i8,
    pub roll: i8,
    pub pitch: i8,
    pub yaw: i8,
}

impl Axes {
    /// Order: surge, sway, heave, roll, pitch, yaw
    pub fn to_array(&self) -> [i8; 6] {
        [self.surge, self.sway, self.heave, self.roll, self.pitch, self.yaw]
    }

    pub fn from_array(values: [i8; 6]) -> Self {
        Axes {
            surge: values[0],
            sway: values[1],
            heave: values[2],
            roll: values[3],
            pitch: values[4],
            yaw: values[5],
        }
    }
}

/// Result of decoding a 64-bit payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlPayload {
    pub axes: Axes,
    pub light: u8,
    pub manipulator: u8,
}

fn payload_byte(payload: u64, index: u32) -> u8 {
    ((payload >> (8 * index)) & 0xFF) as u8
}

fn axis_from_raw(raw: u8) -> i8 {
    (raw as i16 - AXIS_OFFSET) as i8
}

fn axis_to_raw(value: i8) -> u8 {
    (value as i16 + AXIS_OFFSET) as u8
}

/// Total mapping from payload to axes and auxiliary values
pub fn decode_payload(payload: u64) -> ControlPayload {
    let mut axes = [0i8; 6];
    for (i, axis) in axes.iter_mut().enumerate() {
        *axis = axis_from_raw(payload_byte(payload, i as u32));
    }
    ControlPayload {
        axes: Axes::from_array(axes),
        light: payload_byte(payload, 6),
        manipulator: payload_byte(payload, 7),
    }
}

/// Inverse of `decode_payload`, used by senders
pub fn encode_payload(axes: &Axes, light: u8, manipulator: u8) -> u64 {
    let mut payload = 0u64;
    for (i, &value) in axes.to_array().iter().enumerate() {
        payload |= (axis_to_raw(value) as u64) << (8 * i);
    }
    payload |= (light as u64) << 48;
    payload |= (manipulator as u64) << 56;
    payload
}

/// One validated command, as handed from ingress to control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Command {
    pub sequence: u32,
    pub axes: Axes,
    pub light: u8,
    pub manipulator: u8,
}

impl Command {
    pub fn new(sequence: u32, payload: u64) -> Self {
        let decoded = decode_payload(payload);
        Command {
            sequence,
            axes: decoded.axes,
            light: decoded.light,
            manipulator: decoded.manipulator,
        }
    }

    /// Build from a packet that already passed integrity validation
    pub fn from_packet(packet: &WirePacket) -> Self {
        Self::new(packet.sequence, packet.payload)
    }

    pub fn to_payload(&self) -> u64 {
        encode_payload(&self.axes, self.light, self.manipulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_payload() {
        let cmd = Command::new(1, 0x0000_0000_0000_0000);
        assert_eq!(cmd.sequence, 1);
        assert_eq!(cmd.axes.to_array(), [-128; 6]);
        assert_eq!(cmd.light, 0);
        assert_eq!(cmd.manipulator, 0);
    }

    #[test]
    fn test_full_surge() {
        let cmd = Command::new(2, 0x0000_0000_0000_00FF);
        assert_eq!(cmd.axes.surge, 127);
        assert_eq!(cmd.axes.sway, -128);
        assert_eq!(cmd.axes.heave, -128);
        assert_eq!(cmd.axes.roll, -128);
        assert_eq!(cmd.axes.pitch, -128);
        assert_eq!(cmd.axes.yaw, -128);
    }

    #[test]
    fn test_neutral_is_0x80() {
        let decoded = decode_payload(0x0000_8080_8080_8080);
        assert_eq!(decoded.axes, Axes::default());
    }

    #[test]
    fn test_byte_mapping_matches_formula() {
        let samples = [
            0x1234_5678_90AB_CDEFu64,
            0xDEAD_BEEF_CAFE_BABE,
            0xFFFF_FFFF_FFFF_FFFF,
            0x1234_5678_9ABC_DEF0,
            0x5555_AAAA_5555_AAAA,
        ];
        for payload in samples {
            let d = decode_payload(payload);
            let axes = d.axes.to_array();
            for i in 0..6 {
                let raw = ((payload >> (8 * i)) & 0xFF) as i16;
                assert_eq!(axes[i] as i16, raw - 128, "payload {:#x} axis {}", payload, i);
            }
            assert_eq!(d.light as u64, (payload >> 48) & 0xFF);
            assert_eq!(d.manipulator as u64, (payload >> 56) & 0xFF);
        }
    }

    #[test]
    fn test_auxiliary_bytes() {
        let d = decode_payload(0xC840_0000_0000_0000);
        assert_eq!(d.light, 0x40);
        assert_eq!(d.manipulator, 0xC8);
    }

    #[test]
    fn test_to_payload_inverts_decode() {
        let cmd = Command {
            sequence: 9,
            axes: Axes { surge: 50, sway: -1, heave: 0, roll: 127, pitch: -128, yaw: 10 },
            light: 200,
            manipulator: 3,
        };
        assert_eq!(Command::new(9, cmd.to_payload()), cmd);
    }
}
