//! The signal archive writer.
//!
//! Drains both source queues with a short poll timeout so neither source
//! can starve the other, persists every signal, and only then republishes
//! a tagged copy onto the routing queue. The write happens-before the
//! routed copy is visible to the router.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use homelink_common::{ArchiveRecord, SignalArchive};
use tracing::{debug, error, info};

use crate::error::GatewayError;
use crate::signal::{RoutedSignal, TaggedSignal};
use crate::worker::{spawn_worker, WorkerHandle};

/// Spawn the archive writer worker.
///
/// Runs until cancelled or until both source queues disconnect. A
/// persistence failure ends the worker loudly (crash-and-restart is the
/// recovery contract): the loop neither continues past a dead archive
/// handle nor stops silently, and the routed copy of the failed signal is
/// never enqueued.
pub fn start_archive_writer(
    mut archive: Box<dyn SignalArchive>,
    cloud_input: Receiver<TaggedSignal>,
    hardware_input: Receiver<TaggedSignal>,
    routed_output: Sender<RoutedSignal>,
    poll: Duration,
) -> WorkerHandle {
    spawn_worker("archive-writer", move |stop| {
        let mut serial: u64 = 0;

        while !stop.load(Ordering::Relaxed) {
            let mut disconnected = 0;
            // Alternate between the two inputs; the short timeout keeps
            // a chatty source from starving the quiet one.
            for input in [&cloud_input, &hardware_input] {
                match input.recv_timeout(poll) {
                    Ok(signal) => {
                        serial += 1;
                        persist_and_route(archive.as_mut(), serial, signal, &routed_output)?;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => disconnected += 1,
                }
            }
            if disconnected == 2 {
                info!("both source queues closed, archive writer finishing");
                break;
            }
        }
        Ok(())
    })
}

fn persist_and_route(
    archive: &mut dyn SignalArchive,
    serial: u64,
    signal: TaggedSignal,
    routed_output: &Sender<RoutedSignal>,
) -> Result<(), GatewayError> {
    let record = ArchiveRecord::new(
        serial,
        signal.source(),
        signal.message(),
        signal.protocol(),
        signal.origin_label(),
        signal.received_at(),
    );

    if let Err(fault) = archive.append(&record) {
        error!(serial, error = %fault, "archive append failed, stopping writer");
        return Err(fault.into());
    }
    debug!(serial, source = %signal.source(), "signal archived");

    let tag = signal.source().tag().to_string();
    routed_output
        .send(RoutedSignal { tag, signal })
        .map_err(|_| GatewayError::QueueDisconnected)
}
