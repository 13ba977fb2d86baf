//! MQTT-backed cloud transport.
//!
//! Implements [`CloudTransport`] over `rumqttc`. The async client is
//! driven from the calling worker thread through a small current-thread
//! runtime: connect waits for the broker's acknowledgment, publish drives
//! the event loop until the packet is handed to the network, and poll
//! surfaces inbound publish packets one at a time. Each transport owns one
//! broker session; faults are surfaced, never retried.

use std::time::{Duration, Instant};

use homelink_common::{CloudConfig, CloudMessage, CloudTransport, TransportError};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tracing::debug;

/// How long connect waits for the broker's acknowledgment.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// How long publish waits for the packet to reach the network layer.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);
/// Event-loop channel capacity.
const EVENT_CAPACITY: usize = 64;

struct MqttSession {
    client: AsyncClient,
    event_loop: EventLoop,
}

/// A [`CloudTransport`] over one MQTT broker session.
pub struct MqttTransport {
    options: MqttOptions,
    runtime: Option<tokio::runtime::Runtime>,
    session: Option<MqttSession>,
}

impl MqttTransport {
    /// Build a transport from the cloud configuration.
    ///
    /// `client_name` distinguishes the gateway's sender and receiver
    /// sessions on the broker.
    pub fn from_config(config: &CloudConfig, client_name: &str) -> Self {
        let mut options = MqttOptions::new(client_name, &config.host, config.port);
        options.set_credentials(&config.username, &config.password);
        options.set_keep_alive(Duration::from_secs(config.keepalive_secs));
        MqttTransport {
            options,
            runtime: None,
            session: None,
        }
    }

    /// One event-loop step with a timeout; `Ok(None)` means no event yet.
    fn step(
        runtime: &tokio::runtime::Runtime,
        event_loop: &mut EventLoop,
        timeout: Duration,
    ) -> Result<Option<Event>, TransportError> {
        let step = runtime.block_on(async { tokio::time::timeout(timeout, event_loop.poll()).await });
        match step {
            Ok(Ok(event)) => Ok(Some(event)),
            Ok(Err(fault)) => Err(TransportError::Connection(fault.to_string())),
            Err(_elapsed) => Ok(None),
        }
    }
}

impl CloudTransport for MqttTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Connection(format!("runtime setup failed: {e}")))?;

        let (client, mut event_loop) = AsyncClient::new(self.options.clone(), EVENT_CAPACITY);

        // Drive the event loop until the broker acknowledges the session.
        let deadline = Instant::now() + CONNECT_TIMEOUT;
        loop {
            if Instant::now() >= deadline {
                return Err(TransportError::Connection("broker handshake timed out".to_string()));
            }
            match Self::step(&runtime, &mut event_loop, Duration::from_millis(250))? {
                Some(Event::Incoming(Packet::ConnAck(_))) => break,
                Some(event) => debug!(?event, "mqtt event before session ack"),
                None => {}
            }
        }

        self.runtime = Some(runtime);
        self.session = Some(MqttSession { client, event_loop });
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        let (runtime, session) = match (&self.runtime, &mut self.session) {
            (Some(runtime), Some(session)) => (runtime, session),
            _ => return Err(TransportError::Connection("not connected".to_string())),
        };

        runtime
            .block_on(session.client.publish(topic, QoS::AtMostOnce, false, payload.to_vec()))
            .map_err(|e| TransportError::Publish(e.to_string()))?;

        // Drive the event loop until the packet is written out.
        let deadline = Instant::now() + PUBLISH_TIMEOUT;
        loop {
            if Instant::now() >= deadline {
                return Err(TransportError::Publish("publish flush timed out".to_string()));
            }
            match Self::step(runtime, &mut session.event_loop, Duration::from_millis(250))? {
                Some(Event::Outgoing(Outgoing::Publish(_))) => return Ok(()),
                Some(_) | None => {}
            }
        }
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        let (runtime, session) = match (&self.runtime, &mut self.session) {
            (Some(runtime), Some(session)) => (runtime, session),
            _ => return Err(TransportError::Connection("not connected".to_string())),
        };
        runtime
            .block_on(session.client.subscribe(topic, QoS::AtMostOnce))
            .map_err(|e| TransportError::Subscribe(e.to_string()))
    }

    fn poll(&mut self, timeout: Duration) -> Result<Option<CloudMessage>, TransportError> {
        let (runtime, session) = match (&self.runtime, &mut self.session) {
            (Some(runtime), Some(session)) => (runtime, session),
            _ => return Err(TransportError::Connection("not connected".to_string())),
        };
        match Self::step(runtime, &mut session.event_loop, timeout)? {
            Some(Event::Incoming(Packet::Publish(publish))) => Ok(Some(CloudMessage {
                topic: publish.topic.clone(),
                payload: publish.payload.to_vec(),
            })),
            Some(_) | None => Ok(None),
        }
    }

    fn disconnect(&mut self) {
        if let (Some(runtime), Some(mut session)) = (self.runtime.take(), self.session.take()) {
            let _ = runtime.block_on(session.client.disconnect());
            // Drain briefly so the disconnect reaches the wire.
            for _ in 0..10 {
                match Self::step(&runtime, &mut session.event_loop, Duration::from_millis(50)) {
                    Ok(Some(Event::Outgoing(Outgoing::Disconnect))) => break,
                    Ok(Some(_)) => {}
                    Ok(None) | Err(_) => break,
                }
            }
        }
    }
}
