//! Worker spawning and cooperative cancellation.
//!
//! Every concurrency unit in the gateway is a named thread taking a typed
//! set of channel handles, spawned through [`spawn_worker`] and joined or
//! cancelled explicitly through its [`WorkerHandle`]. There is no worker
//! inheritance hierarchy: behavior is composed from the codec and adapter
//! interfaces passed into the closure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::error::GatewayError;

/// Handle to a running worker thread.
pub struct WorkerHandle {
    name: String,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<Result<(), GatewayError>>,
}

impl WorkerHandle {
    /// The worker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the worker to terminate at its next blocking point.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker exits and return its result.
    ///
    /// A panic in the worker is reported as
    /// [`GatewayError::WorkerPanicked`].
    pub fn join(self) -> Result<(), GatewayError> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => Err(GatewayError::WorkerPanicked(self.name)),
        }
    }
}

/// Spawn a named worker thread.
///
/// The closure receives the stop flag and must observe it at every
/// blocking point. Long-lived workers return `Ok` on cooperative
/// termination; any `Err` is logged here so that detached one-shot workers
/// still surface their failures.
pub fn spawn_worker<F>(name: &str, body: F) -> WorkerHandle
where
    F: FnOnce(Arc<AtomicBool>) -> Result<(), GatewayError> + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_worker = Arc::clone(&stop);
    let worker_name = name.to_string();
    let log_name = worker_name.clone();

    let thread = thread::Builder::new()
        .name(format!("homelink-{name}"))
        .spawn(move || {
            let result = body(stop_for_worker);
            match &result {
                Ok(()) => info!(worker = %log_name, "worker finished"),
                Err(e) => error!(worker = %log_name, error = %e, "worker failed"),
            }
            result
        })
        .expect("failed to spawn worker thread");

    WorkerHandle {
        name: worker_name,
        stop,
        thread,
    }
}
