pub mod protocol;
pub use protocol::*;

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use serialport::SerialPort;

use crate::control::{AuxiliaryDriver, ThrustMixer, ThrustStrategy};
use crate::error::{Error, Result};
use crate::protocol::Axes;

pub const SYNC_BYTE: u8 = 0xAA;
pub const MAX_MSG_SIZE: usize = 244;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgType{
    Thruster = 0x03,
    Light = 0x20,
    Manipulator = 0x21,
}

impl MsgType{
    pub fn from_u8(val: u8) -> Option<Self>{
        match val{
            0x03 => Some(MsgType::Thruster),
            0x20 => Some(MsgType::Light),
            0x21 => Some(MsgType::Manipulator),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartFrame{
    pub msg_type: MsgType,
    pub payload: Vec<u8>,
}

pub fn calculate_checksum(data: &[u8]) -> u8{
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

//frame format: [SYNC][TYPE][LEN][PAYLOAD...][CHECKSUM]
//              0xAA  1byte 1byte  LEN bytes   1byte
pub fn encode_frame(msg_type: MsgType, payload: &[u8]) -> Result<Vec<u8>>{
    if payload.len() > MAX_MSG_SIZE{
        return Err(Error::InvalidConfig(format!(
            "payload of {} bytes exceeds frame limit {}", payload.len(), MAX_MSG_SIZE
        )));
    }

    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.push(SYNC_BYTE);
    frame.push(msg_type as u8);
    frame.push(payload.len() as u8);
    frame.extend_from_slice(payload);

    let checksum = calculate_checksum(&frame[1..]);
    frame.push(checksum);
    Ok(frame)
}

//pull one frame off the front of a byte stream (board replies, loopback checks)
pub fn try_parse_frame(buffer: &mut Vec<u8>) -> Option<UartFrame>{
    if buffer.len() < 4{
        return None;
    }

    //find sync byte
    let sync_pos = buffer.iter().position(|&b| b == SYNC_BYTE)?;
    if sync_pos > 0{
        buffer.drain(0..sync_pos);
    }

    if buffer.len() < 4{
        return None;
    }

    let msg_type_byte = buffer[1];
    let len = buffer[2] as usize;

    if len > MAX_MSG_SIZE{
        buffer.remove(0);
        return None;
    }

    let frame_len = 4 + len;
    if buffer.len() < frame_len{
        return None;
    }

    let checksum = buffer[3 + len];
    let calculated = calculate_checksum(&buffer[1..3 + len]);
    if checksum != calculated{
        buffer.remove(0);
        return None;
    }

    let payload = buffer[3..3 + len].to_vec();
    buffer.drain(0..frame_len);

    let msg_type = MsgType::from_u8(msg_type_byte)?;
    Some(UartFrame{ msg_type, payload })
}

//shared handle to the motor board link
pub struct SerialLink<W: Write + Send>{
    port: Arc<Mutex<W>>,
}

impl<W: Write + Send> Clone for SerialLink<W>{
    fn clone(&self) -> Self{
        SerialLink{ port: Arc::clone(&self.port) }
    }
}

impl SerialLink<Box<dyn SerialPort>>{
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self>{
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()?;
        log::info!("Motor board link open on {} at {} baud", port_name, baud_rate);
        Ok(SerialLink::new(port))
    }
}

impl<W: Write + Send> SerialLink<W>{
    pub fn new(port: W) -> Self{
        SerialLink{ port: Arc::new(Mutex::new(port)) }
    }

    pub fn send_frame(&self, msg_type: MsgType, payload: &[u8]) -> Result<()>{
        let frame = encode_frame(msg_type, payload)?;
        let mut port = self.port.lock().unwrap_or_else(|e| e.into_inner());
        port.write_all(&frame)?;
        port.flush()?;
        Ok(())
    }

    pub fn with_port<R>(&self, f: impl FnOnce(&mut W) -> R) -> R{
        let mut port = self.port.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *port)
    }
}

//thrust strategy: mix intents and forward PWM to the board
pub struct SerialThrust<W: Write + Send>{
    link: SerialLink<W>,
    mixer: ThrustMixer,
}

impl<W: Write + Send> SerialThrust<W>{
    pub fn new(link: SerialLink<W>, mixer: ThrustMixer) -> Self{
        SerialThrust{ link, mixer }
    }
}

impl<W: Write + Send> ThrustStrategy for SerialThrust<W>{
    fn apply_thrust(&mut self, axes: &Axes){
        let thrusts = self.mixer.mix(axes);
        let pwm = ThrusterPwmCmd::new(ThrustMixer::to_pwm(&thrusts));
        if let Err(e) = self.link.send_frame(MsgType::Thruster, &pwm.to_bytes()){
            log::error!("Thruster frame not sent: {}", e);
        }
    }
}

//light and manipulator over the same link
pub struct SerialAuxiliary<W: Write + Send>{
    link: SerialLink<W>,
}

impl<W: Write + Send> SerialAuxiliary<W>{
    pub fn new(link: SerialLink<W>) -> Self{
        SerialAuxiliary{ link }
    }
}

impl<W: Write + Send> AuxiliaryDriver for SerialAuxiliary<W>{
    fn set_light(&mut self, brightness: u8){
        let cmd = LightCmd{ brightness };
        if let Err(e) = self.link.send_frame(MsgType::Light, &cmd.to_bytes()){
            log::error!("Light frame not sent: {}", e);
        }
    }

    fn set_manipulator(&mut self, position: u8){
        let cmd = ManipulatorCmd{ position };
        if let Err(e) = self.link.send_frame(MsgType::Manipulator, &cmd.to_bytes()){
            log::error!("Manipulator frame not sent: {}", e);
        }
    }
}
