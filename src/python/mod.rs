use pyo3::prelude::*;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::types::PyBytes;
use std::net::UdpSocket;
use crate::protocol::{self, Axes, Command, WirePacket};

#[pyfunction]
fn crc32(data: &[u8]) -> u32{
    protocol::crc32(data)
}

#[pyfunction]
fn encode_packet<'py>(py: Python<'py>, sequence: u32, payload: u64) -> &'py PyBytes{
    PyBytes::new(py, &WirePacket::encode(sequence, payload))
}

//(sequence, [surge, sway, heave, roll, pitch, yaw], light, manipulator)
#[pyfunction]
fn decode_packet(data: &[u8]) -> PyResult<(u32, Vec<i8>, u8, u8)>{
    let packet = WirePacket::validate(data).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let cmd = Command::from_packet(&packet);
    Ok((cmd.sequence, cmd.axes.to_array().to_vec(), cmd.light, cmd.manipulator))
}

#[pyfunction]
fn build_payload(axes: Vec<i8>, light: u8, manipulator: u8) -> PyResult<u64>{
    let values: [i8; 6] = axes.as_slice().try_into().map_err(|_|{
        PyValueError::new_err(format!("Expected 6 axis values, got {}", axes.len()))
    })?;
    Ok(protocol::encode_payload(&Axes::from_array(values), light, manipulator))
}

//bench client: sends packets to a running firmware
#[pyclass]
pub struct PyCommandSender{
    socket: UdpSocket,
    target: String,
}

#[pymethods]
impl PyCommandSender{
    #[new]
    fn new(target: &str) -> PyResult<Self>{
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| PyIOError::new_err(e.to_string()))?;
        Ok(PyCommandSender{ socket, target: target.to_string() })
    }

    #[pyo3(signature = (sequence, payload, corrupt_crc = false))]
    fn send(&self, sequence: u32, payload: u64, corrupt_crc: bool) -> PyResult<usize>{
        let mut packet = WirePacket::new(sequence, payload);
        if corrupt_crc{
            packet.checksum ^= 0xDEAD_BEEF;
        }
        self.socket
            .send_to(&packet.to_bytes(), self.target.as_str())
            .map_err(|e| PyIOError::new_err(e.to_string()))
    }

    fn target(&self) -> String{
        self.target.clone()
    }
}

#[pymodule]
fn rov_link(_py: Python, m: &PyModule) -> PyResult<()>{
    m.add_function(wrap_pyfunction!(crc32, m)?)?;
    m.add_function(wrap_pyfunction!(encode_packet, m)?)?;
    m.add_function(wrap_pyfunction!(decode_packet, m)?)?;
    m.add_function(wrap_pyfunction!(build_payload, m)?)?;
    m.add_class::<PyCommandSender>()?;
    Ok(())
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn test_py_crc32(){
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_py_build_payload(){
        let payload = build_payload(vec![127, -128, -128, -128, -128, -128], 0, 0).unwrap();
        assert_eq!(payload, 0xFF);
    }

    #[test]
    fn test_py_decode_packet(){
        let bytes = WirePacket::encode(1, 0);
        let (seq, axes, light, manipulator) = decode_packet(&bytes).unwrap();
        assert_eq!(seq, 1);
        assert_eq!(axes, vec![-128; 6]);
        assert_eq!((light, manipulator), (0, 0));
    }
}
