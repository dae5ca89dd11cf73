//payload bodies for frames sent to the motor board
//multi-byte values are little-endian, matching the board's native order

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThrusterPwmCmd{
    pub pwm: Vec<i32>,    //PWM per thruster (1100-1900 µs)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightCmd{
    pub brightness: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManipulatorCmd{
    pub position: u8,
}

pub const PWM_VALUE_SIZE: usize = 4;   //1 * i32
pub const LIGHT_CMD_SIZE: usize = 1;
pub const MANIPULATOR_CMD_SIZE: usize = 1;

impl ThrusterPwmCmd{
    pub fn new(pwm_values: Vec<i32>) -> Self{
        ThrusterPwmCmd{ pwm: pwm_values }
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self>{
        if data.is_empty() || data.len() % PWM_VALUE_SIZE != 0{
            return None;
        }
        let pwm = data
            .chunks_exact(PWM_VALUE_SIZE)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(ThrusterPwmCmd{ pwm })
    }

    pub fn to_bytes(&self) -> Vec<u8>{
        self.pwm.iter().flat_map(|p| p.to_le_bytes()).collect()
    }
}

impl LightCmd{
    pub fn from_bytes(data: &[u8]) -> Option<Self>{
        if data.len() != LIGHT_CMD_SIZE{
            return None;
        }
        Some(LightCmd{ brightness: data[0] })
    }

    pub fn to_bytes(&self) -> [u8; LIGHT_CMD_SIZE]{
        [self.brightness]
    }
}

impl ManipulatorCmd{
    pub fn from_bytes(data: &[u8]) -> Option<Self>{
        if data.len() != MANIPULATOR_CMD_SIZE{
            return None;
        }
        Some(ManipulatorCmd{ position: data[0] })
    }

    pub fn to_bytes(&self) -> [u8; MANIPULATOR_CMD_SIZE]{
        [self.position]
    }
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn test_thruster_pwm_cmd(){
        let cmd = ThrusterPwmCmd::new(vec![1500, 1600, 1400, 1550, 1450, 1500]);
        let bytes = cmd.to_bytes();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..4], &1500i32.to_le_bytes());

        let decoded = ThrusterPwmCmd::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.pwm[1], 1600);
        assert_eq!(decoded.pwm[2], 1400);
        assert_eq!(decoded.pwm.len(), 6);
    }

    #[test]
    fn test_short_pwm_rejected(){
        assert!(ThrusterPwmCmd::from_bytes(&[0, 1, 2]).is_none());
        assert!(ThrusterPwmCmd::from_bytes(&[]).is_none());
    }

    #[test]
    fn test_aux_cmds(){
        assert_eq!(LightCmd::from_bytes(&[200]), Some(LightCmd{ brightness: 200 }));
        assert_eq!(ManipulatorCmd::from_bytes(&[1, 2]), None);
    }
}
