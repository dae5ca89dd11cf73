//! Control worker
//!
//! Takes commands off the queue in order and drives the actuation seams.
//! Each dispatch is followed by a fixed delay so the hardware interfaces
//! are never driven faster than they can settle.

use std::thread;
use std::time::Duration;

use super::Actuation;
use crate::config::PipelineConfig;
use crate::protocol::Command;
use crate::queue::CommandConsumer;

pub struct ControlWorker {
    actuation: Actuation,
    dispatch_delay: Duration,
    processed: u64,
}

impl ControlWorker {
    pub fn new(config: &PipelineConfig, actuation: Actuation) -> Self {
        Self {
            actuation,
            dispatch_delay: config.dispatch_delay,
            processed: 0,
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Dispatch one command to the actuators
    pub fn dispatch(&mut self, cmd: &Command) {
        log::info!("Processing ROV command #{}", cmd.sequence);

        self.actuation.thrust.apply_thrust(&cmd.axes);
        if cmd.light > 0 {
            self.actuation.auxiliary.set_light(cmd.light);
        }
        if cmd.manipulator > 0 {
            self.actuation.auxiliary.set_manipulator(cmd.manipulator);
        }
        self.actuation.indicator.toggle();

        self.processed += 1;
    }

    /// Consume commands until the queue disconnects
    ///
    /// The firmware's producer lives for the whole process, so in practice
    /// this never returns. Returns the number of dispatched commands.
    pub fn run(mut self, commands: CommandConsumer) -> u64 {
        log::info!("ROV control thread started");
        log::info!("Waiting for 6DOF commands...");

        while let Some(cmd) = commands.take() {
            self.dispatch(&cmd);
            thread::sleep(self.dispatch_delay);
        }

        log::warn!("Command queue disconnected, control worker exiting");
        self.processed
    }
}
