//! Pipeline assembly and lifecycle.
//!
//! Wires the four long-lived workers together: cloud receive and hardware
//! receive feed the archive writer through one bounded queue each; the
//! writer feeds the router through the bounded routing queue; the router
//! spawns one-shot send workers on demand. No shared mutable state crosses
//! worker boundaries except these queues and the radio pin guard.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;
use homelink_common::{GatewayConfig, PayloadCipher, SignalArchive};
use homelink_protocol::{EntityTable, FormatCodec};
use homelink_rf433::{RadioGpio, RfDevice, TxSettings};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::archive_writer::start_archive_writer;
use crate::cloud::{CloudChannel, CloudTransportFactory};
use crate::hardware::{HardwareChannel, HardwareLinkFactory, SharedRadio};
use crate::router::start_router;
use crate::worker::WorkerHandle;

/// The external collaborators injected at startup.
pub struct GatewayDeps {
    /// The append-only signal archive.
    pub archive: Box<dyn SignalArchive>,
    /// The payload encrypt/decrypt capability.
    pub cipher: Arc<dyn PayloadCipher>,
    /// Mints one cloud transport per session.
    pub make_cloud_transport: CloudTransportFactory,
    /// Mints one serial link per session.
    pub make_hardware_link: HardwareLinkFactory,
    /// The GPIO port the radio drives.
    pub gpio: Box<dyn RadioGpio>,
}

/// A running gateway pipeline.
pub struct Gateway {
    workers: Vec<WorkerHandle>,
}

impl Gateway {
    /// Spawn the full pipeline.
    pub fn start(config: &GatewayConfig, deps: GatewayDeps) -> Gateway {
        let capacity = config.pipeline.queue_capacity;
        let (cloud_queue_tx, cloud_queue_rx) = bounded(capacity);
        let (hardware_queue_tx, hardware_queue_rx) = bounded(capacity);
        let (routed_tx, routed_rx) = bounded(capacity);

        let tx_settings = TxSettings {
            protocol_id: config.rf.tx_protocol,
            pulse_length: None,
            bit_length: None,
            repeats: config.rf.tx_repeat,
        };
        let radio: SharedRadio = Arc::new(Mutex::new(RfDevice::new(
            deps.gpio,
            config.rf.tx_pin,
            config.rf.rx_pin,
            tx_settings,
            config.rf.rx_tolerance_pct,
        )));

        let cloud = Arc::new(CloudChannel::new(&config.cloud, deps.make_cloud_transport));
        let hardware = Arc::new(HardwareChannel::new(
            &config.hardware,
            deps.make_hardware_link,
            radio,
        ));

        let codec = FormatCodec::new(
            config.cloud.source_id.clone(),
            EntityTable::new(
                config.entities.actuators.clone(),
                config.entities.sensors.clone(),
            ),
        );

        let workers = vec![
            cloud.start_receive(cloud_queue_tx),
            hardware.start_receive(hardware_queue_tx),
            start_archive_writer(
                deps.archive,
                cloud_queue_rx,
                hardware_queue_rx,
                routed_tx,
                Duration::from_millis(config.pipeline.archive_poll_ms),
            ),
            start_router(routed_rx, codec, deps.cipher, cloud, hardware),
        ];
        info!(workers = workers.len(), "pipeline started");

        Gateway { workers }
    }

    /// Whether any long-lived worker has exited.
    ///
    /// A finished worker means a terminated session (connection fault or
    /// archive failure); the supervisor decides whether to restart the
    /// process.
    pub fn any_worker_finished(&self) -> bool {
        self.workers.iter().any(WorkerHandle::is_finished)
    }

    /// Stop every worker and join them.
    ///
    /// Cancellation cascades front to back: once the receive adapters
    /// exit, their queue senders drop, the writer drains out, the routing
    /// queue closes, and the router finishes.
    pub fn shutdown(self) {
        for worker in &self.workers {
            worker.request_stop();
        }
        for worker in self.workers {
            let name = worker.name().to_string();
            if let Err(fault) = worker.join() {
                warn!(worker = %name, error = %fault, "worker ended with failure");
            }
        }
        info!("pipeline stopped");
    }
}
