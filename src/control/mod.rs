/**
 * Control Module
 *
 * Actuation seams consumed by the control worker:
 * - ThrustStrategy: six signed motion intents -> thruster outputs
 * - AuxiliaryDriver: light brightness and manipulator position
 * - Indicator: visual acknowledgment, toggled once per command
 *
 * Thruster mixing is vehicle specific and always supplied by the integrator.
 */

pub mod worker;
pub mod thrust_mixer;
pub mod stub;

pub use worker::ControlWorker;
pub use thrust_mixer::ThrustMixer;
pub use stub::{LoggingThrust, LoggingAuxiliary, LogIndicator};

use crate::protocol::Axes;

pub trait ThrustStrategy: Send {
    fn apply_thrust(&mut self, axes: &Axes);
}

pub trait AuxiliaryDriver: Send {
    /// Brightness 0..=255
    fn set_light(&mut self, brightness: u8);
    /// Servo position 0..=255
    fn set_manipulator(&mut self, position: u8);
}

pub trait Indicator: Send {
    fn toggle(&mut self);
}

/// The full set of actuator interfaces handed to the control worker
pub struct Actuation {
    pub thrust: Box<dyn ThrustStrategy>,
    pub auxiliary: Box<dyn AuxiliaryDriver>,
    pub indicator: Box<dyn Indicator>,
}

impl Actuation {
    pub fn new<T, A, I>(thrust: T, auxiliary: A, indicator: I) -> Self
    where
        T: ThrustStrategy + 'static,
        A: AuxiliaryDriver + 'static,
        I: Indicator + 'static,
    {
        Self {
            thrust: Box::new(thrust),
            auxiliary: Box::new(auxiliary),
            indicator: Box::new(indicator),
        }
    }

    /// Log-only stand-ins for the hardware drivers
    pub fn logging() -> Self {
        Self::new(LoggingThrust, LoggingAuxiliary, LogIndicator::default())
    }
}
