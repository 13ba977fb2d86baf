//! Cloud channel adapter.
//!
//! Two independent session shapes share one channel definition so a
//! stalled receive can never block a send:
//!
//! - receive: a long-lived worker that connects, subscribes to the
//!   reception topic, and normalizes every inbound message into a tagged
//!   signal on the output queue
//! - send: a one-shot worker per outbound payload that connects, publishes
//!   to the transmission topic, and disconnects
//!
//! A transport fault ends the owning session; there is no automatic
//! reconnect.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crossbeam_channel::Sender;
use homelink_common::{CloudConfig, CloudTransport, SignalSource};
use tracing::{debug, info};

use crate::signal::TaggedSignal;
use crate::worker::{spawn_worker, WorkerHandle};

/// Protocol label stamped on cloud signals.
pub const CLOUD_PROTOCOL_LABEL: &str = "MQTT";
/// Origin discriminator stamped on cloud signals.
pub const CLOUD_ORIGIN_LABEL: &str = "remote-broker";

/// How long the receive loop blocks in the transport between stop-flag
/// checks.
const RECEIVE_POLL: Duration = Duration::from_millis(200);

/// Factory minting one transport per session.
pub type CloudTransportFactory = Box<dyn Fn() -> Box<dyn CloudTransport> + Send + Sync>;

/// The cloud side of the gateway: owns the topic names and mints one
/// transport session per worker.
pub struct CloudChannel {
    transmission_topic: String,
    reception_topic: String,
    make_transport: CloudTransportFactory,
}

impl CloudChannel {
    /// Build the channel from configuration and a transport factory.
    pub fn new(config: &CloudConfig, make_transport: CloudTransportFactory) -> Self {
        CloudChannel {
            transmission_topic: config.transmission_topic.clone(),
            reception_topic: config.reception_topic.clone(),
            make_transport,
        }
    }

    /// Spawn the long-lived receive worker.
    ///
    /// Runs until cancelled, the pipeline shuts down, or the transport
    /// reports a fatal fault, in which case the session disconnects and
    /// the worker terminates with a connection failure.
    pub fn start_receive(&self, output: Sender<TaggedSignal>) -> WorkerHandle {
        let mut transport = (self.make_transport)();
        let topic = self.reception_topic.clone();

        spawn_worker("cloud-rx", move |stop| {
            transport.connect()?;
            transport.subscribe(&topic)?;
            info!(topic = %topic, "cloud reception started");

            while !stop.load(Ordering::Relaxed) {
                match transport.poll(RECEIVE_POLL) {
                    Ok(Some(message)) => {
                        debug!(len = message.payload.len(), "cloud signal received");
                        let signal = TaggedSignal::received(
                            SignalSource::Cloud,
                            message.payload,
                            CLOUD_PROTOCOL_LABEL,
                            CLOUD_ORIGIN_LABEL,
                        );
                        if output.send(signal).is_err() {
                            // Pipeline gone; nothing left to feed.
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(fault) => {
                        transport.disconnect();
                        return Err(fault.into());
                    }
                }
            }

            transport.disconnect();
            Ok(())
        })
    }

    /// Spawn a one-shot send worker for one payload.
    ///
    /// The worker connects, publishes, and disconnects; a connect or
    /// publish fault disconnects the channel and terminates only this
    /// worker.
    pub fn start_send(&self, payload: Vec<u8>) -> WorkerHandle {
        let mut transport = (self.make_transport)();
        let topic = self.transmission_topic.clone();

        spawn_worker("cloud-tx", move |_stop| {
            let result = transport
                .connect()
                .and_then(|()| transport.publish(&topic, &payload));
            transport.disconnect();
            result.map_err(Into::into)
        })
    }
}
