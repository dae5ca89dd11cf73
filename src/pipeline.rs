/**
 * Command Pipeline
 *
 * Wires the shared network context, the bounded command queue and the two
 * workers, then starts them on their own threads:
 *
 *   wire bytes -> ingress (validate, decode) -> queue -> control -> actuators
 *
 * The ingress thread runs at a strictly higher priority than control.
 */

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::PipelineConfig;
use crate::control::{Actuation, ControlWorker};
use crate::error::{Error, Result};
use crate::net::ingress::{IngressStats, StateWatch};
use crate::net::{IngressState, IngressWorker, NetworkContext, NeverRestart, RestartPolicy};
use crate::queue::{command_queue, CommandProducer};
use crate::sched::spawn_worker;

pub struct Pipeline {
    ingress: JoinHandle<Result<()>>,
    control: ControlHandle,
    stats: Arc<IngressStats>,
    state: StateWatch,
}

/// Control worker handle
///
/// Holds a producer of its own so the queue stays connected after the
/// ingress worker fails; the control worker then stays blocked on `take`.
pub struct ControlHandle {
    handle: JoinHandle<u64>,
    _keepalive: CommandProducer,
}

impl ControlHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Release this handle's producer and wait for the worker to drain
    ///
    /// Blocks while the ingress worker is still running.
    pub fn join(self) -> Result<u64> {
        drop(self._keepalive);
        self.handle.join().map_err(|_| Error::WorkerPanicked("control"))
    }
}

impl Pipeline {
    /// Start both workers with a terminal `Failed` state
    pub fn start(config: PipelineConfig, ctx: Arc<NetworkContext>, actuation: Actuation) -> Result<Self> {
        Self::start_with_policy(config, ctx, actuation, NeverRestart)
    }

    pub fn start_with_policy<P: RestartPolicy + 'static>(
        config: PipelineConfig,
        ctx: Arc<NetworkContext>,
        actuation: Actuation,
        policy: P,
    ) -> Result<Self> {
        config.validate()?;

        log::info!("Initializing ROV 6DOF control system...");
        log::info!("Command queue capacity: {} commands", config.queue_capacity);
        let (producer, consumer) = command_queue(config.queue_capacity);

        let control_worker = ControlWorker::new(&config, actuation);
        let handle = spawn_worker("control", config.control_nice, move || control_worker.run(consumer))?;
        let control = ControlHandle { handle, _keepalive: producer.clone() };

        let ingress_worker = IngressWorker::new(&config, ctx, producer).with_restart_policy(policy);
        let stats = ingress_worker.stats();
        let state = ingress_worker.state_watch();
        let ingress = spawn_worker("ingress", config.ingress_nice, move || ingress_worker.run())?;

        log::info!("ROV control system initialized");
        Ok(Self { ingress, control, stats, state })
    }

    pub fn ingress_state(&self) -> IngressState {
        self.state.get()
    }

    pub fn stats(&self) -> Arc<IngressStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the ingress worker; it only returns after a terminal failure
    ///
    /// The control worker keeps running for as long as the returned handle
    /// is held.
    pub fn join_ingress(self) -> (Result<()>, ControlHandle) {
        let result = match self.ingress.join() {
            Ok(result) => result,
            Err(_) => Err(Error::WorkerPanicked("ingress")),
        };
        (result, self.control)
    }
}
