/**
 * Thrust Mixer
 *
 * Converts 6-DoF intents (surge, sway, heave, roll, pitch, yaw)
 * into per-thruster values using an integrator-supplied mixing matrix.
 * There is no built-in layout: each row describes one thruster of the
 * actual vehicle.
 */

use crate::error::{Error, Result};
use crate::protocol::Axes;

pub const MAX_THRUST: f32 = 100.0;
pub const PWM_NEUTRAL: i32 = 1500;
/// PWM microseconds per unit of thrust (-100 -> 1100, 100 -> 1900)
const PWM_PER_THRUST: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct ThrustMixer {
    /// Contribution of each DoF to each thruster [thrusters x 6 DoFs]
    pub mix_matrix: Vec<[f32; 6]>,
    /// Maximum thrust per thruster
    pub max_thrust: f32,
}

impl ThrustMixer {
    pub fn new(mix_matrix: Vec<[f32; 6]>) -> Result<Self> {
        if mix_matrix.is_empty() {
            return Err(Error::InvalidConfig("mixing matrix needs at least one thruster".into()));
        }
        Ok(Self { mix_matrix, max_thrust: MAX_THRUST })
    }

    pub fn with_max_thrust(mut self, max_thrust: f32) -> Self {
        self.max_thrust = max_thrust;
        self
    }

    pub fn thruster_count(&self) -> usize {
        self.mix_matrix.len()
    }

    /// Scale a raw intent to [-100, 100]
    pub fn intent_to_thrust(intent: i8) -> f32 {
        (intent as f32 / 127.0 * MAX_THRUST).clamp(-MAX_THRUST, MAX_THRUST)
    }

    /// Mix a 6-DoF intent into individual thruster values
    pub fn mix(&self, axes: &Axes) -> Vec<f32> {
        let dof = axes.to_array().map(Self::intent_to_thrust);

        self.mix_matrix
            .iter()
            .map(|row| {
                let sum: f32 = row.iter().zip(dof.iter()).map(|(coeff, value)| coeff * value).sum();
                sum.clamp(-self.max_thrust, self.max_thrust)
            })
            .collect()
    }

    /// Convert a thrust value (-100 to 100) to PWM (1100 to 1900)
    pub fn thrust_to_pwm(thrust: f32) -> i32 {
        (PWM_NEUTRAL as f32 + thrust * PWM_PER_THRUST) as i32
    }

    pub fn to_pwm(thrusts: &[f32]) -> Vec<i32> {
        thrusts.iter().map(|&t| Self::thrust_to_pwm(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //four horizontal thrusters, vectored
    fn quad_mixer() -> ThrustMixer {
        ThrustMixer::new(vec![
            [1.0, -1.0, 0.0, 0.0, 0.0, -1.0],
            [1.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            [-1.0, -1.0, 0.0, 0.0, 0.0, 1.0],
            [-1.0, 1.0, 0.0, 0.0, 0.0, -1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_neutral_thrust() {
        let output = quad_mixer().mix(&Axes::default());
        assert!(output.iter().all(|&x| x == 0.0));
        assert!(ThrustMixer::to_pwm(&output).iter().all(|&p| p == PWM_NEUTRAL));
    }

    #[test]
    fn test_surge() {
        let axes = Axes { surge: 64, ..Default::default() };
        let output = quad_mixer().mix(&axes);
        // Front thrusters should be positive, rear negative
        assert!(output[0] > 0.0);
        assert!(output[1] > 0.0);
        assert!(output[2] < 0.0);
        assert!(output[3] < 0.0);
    }

    #[test]
    fn test_output_clamped() {
        let axes = Axes { surge: 127, sway: 127, yaw: 127, ..Default::default() };
        let output = quad_mixer().mix(&axes);
        assert_eq!(output[1], MAX_THRUST);
        assert_eq!(ThrustMixer::to_pwm(&output)[1], 1900);
    }

    #[test]
    fn test_full_reverse_intent() {
        assert_eq!(ThrustMixer::intent_to_thrust(-128), -MAX_THRUST);
        assert_eq!(ThrustMixer::intent_to_thrust(127), MAX_THRUST);
        assert_eq!(ThrustMixer::thrust_to_pwm(-MAX_THRUST), 1100);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(ThrustMixer::new(Vec::new()).is_err());
    }
}
