use std::ptr;
use crate::error::Error;
use crate::protocol::{crc32, Command, WirePacket, PACKET_SIZE};

pub const ROV_OK: i32 = 1;
pub const ROV_ERR_NULL: i32 = -1;
pub const ROV_ERR_LENGTH: i32 = -2;
pub const ROV_ERR_CHECKSUM: i32 = -3;

//C view of a decoded command
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RovCommand{
    pub sequence: u32,
    pub surge: i8,
    pub sway: i8,
    pub heave: i8,
    pub roll: i8,
    pub pitch: i8,
    pub yaw: i8,
    pub light: u8,
    pub manipulator: u8,
}

impl From<Command> for RovCommand{
    fn from(cmd: Command) -> Self{
        RovCommand{
            sequence: cmd.sequence,
            surge: cmd.axes.surge,
            sway: cmd.axes.sway,
            heave: cmd.axes.heave,
            roll: cmd.axes.roll,
            pitch: cmd.axes.pitch,
            yaw: cmd.axes.yaw,
            light: cmd.light,
            manipulator: cmd.manipulator,
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn rov_crc32(data: *const u8, len: usize) -> u32{
    if data.is_null() || len == 0{
        return crc32(&[]);
    }

    unsafe{
        let slice = std::slice::from_raw_parts(data, len);
        crc32(slice)
    }
}

//writes exactly 16 bytes, returns bytes written or a negative error
#[no_mangle]
pub unsafe extern "C" fn rov_packet_encode(
    sequence: u32,
    payload: u64,
    out_data: *mut u8,
    max_len: usize,
) -> i32{
    if out_data.is_null(){
        return ROV_ERR_NULL;
    }
    if max_len < PACKET_SIZE{
        return ROV_ERR_LENGTH;
    }

    let bytes = WirePacket::encode(sequence, payload);
    unsafe{
        ptr::copy_nonoverlapping(bytes.as_ptr(), out_data, PACKET_SIZE);
    }
    PACKET_SIZE as i32
}

#[no_mangle]
pub unsafe extern "C" fn rov_packet_decode(
    data: *const u8,
    len: usize,
    out_cmd: *mut RovCommand,
) -> i32{
    if data.is_null() || out_cmd.is_null(){
        return ROV_ERR_NULL;
    }

    unsafe{
        let slice = std::slice::from_raw_parts(data, len);
        match WirePacket::validate(slice){
            Ok(packet) =>{
                *out_cmd = Command::from_packet(&packet).into();
                ROV_OK
            }
            Err(Error::IntegrityFailure{ .. }) => ROV_ERR_CHECKSUM,
            Err(_) => ROV_ERR_LENGTH,
        }
    }
}
