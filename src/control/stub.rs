//! Log-only actuators, used until real drivers are wired in

use super::{AuxiliaryDriver, Indicator, ThrustStrategy};
use crate::protocol::Axes;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingThrust;

impl ThrustStrategy for LoggingThrust {
    fn apply_thrust(&mut self, axes: &Axes) {
        log::info!("=== 6DOF CONTROL ===");
        log::info!("Surge: {:+4}", axes.surge);
        log::info!("Sway:  {:+4}", axes.sway);
        log::info!("Heave: {:+4}", axes.heave);
        log::info!("Roll:  {:+4}", axes.roll);
        log::info!("Pitch: {:+4}", axes.pitch);
        log::info!("Yaw:   {:+4}", axes.yaw);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAuxiliary;

/// Integer percentage of full brightness
pub fn light_percent(brightness: u8) -> u8 {
    ((brightness as u16 * 100) / 255) as u8
}

impl AuxiliaryDriver for LoggingAuxiliary {
    fn set_light(&mut self, brightness: u8) {
        log::info!("Light: {}% ({}/255)", light_percent(brightness), brightness);
    }

    fn set_manipulator(&mut self, position: u8) {
        log::info!("Manipulator: {}", position);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogIndicator {
    on: bool,
}

impl LogIndicator {
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Indicator for LogIndicator {
    fn toggle(&mut self) {
        self.on = !self.on;
        log::debug!("Indicator {}", if self.on { "ON" } else { "OFF" });
    }
}
