//! Hardware channel adapter.
//!
//! The hardware side is a pair of local physical links: the
//! serial-wireless sensor link (receive only) and the 433MHz radio
//! (send only). Receive and send run as independent workers, but both
//! radio directions share one pin resource guarded by [`RfDevice`]'s
//! mutual exclusion.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use homelink_common::{HardwareConfig, HardwareLink, SignalSource};
use homelink_rf433::{RadioGpio, RfDevice};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::signal::TaggedSignal;
use crate::worker::{spawn_worker, WorkerHandle};

/// Protocol label stamped on hardware signals.
pub const HARDWARE_PROTOCOL_LABEL: &str = "SERIAL";

/// How long a frame read blocks between stop-flag checks.
const RECEIVE_POLL: Duration = Duration::from_millis(200);

/// Factory minting one serial link per session.
pub type HardwareLinkFactory = Box<dyn Fn() -> Box<dyn HardwareLink> + Send + Sync>;

/// The radio device shared between transmit sessions.
pub type SharedRadio = Arc<Mutex<RfDevice<Box<dyn RadioGpio>>>>;

/// The hardware side of the gateway.
pub struct HardwareChannel {
    frame_len: usize,
    read_idle: Duration,
    origin_label: String,
    make_link: HardwareLinkFactory,
    radio: SharedRadio,
}

impl HardwareChannel {
    /// Build the channel from configuration, a link factory, and the
    /// shared radio.
    pub fn new(config: &HardwareConfig, make_link: HardwareLinkFactory, radio: SharedRadio) -> Self {
        HardwareChannel {
            frame_len: config.frame_len,
            read_idle: Duration::from_millis(config.read_idle_ms),
            origin_label: config.origin_label.clone(),
            make_link,
            radio,
        }
    }

    /// Spawn the long-lived serial receive worker.
    ///
    /// Frames whose length differs from the configured fixed width are
    /// dropped without being queued or reported; a link fault tears the
    /// channel down.
    pub fn start_receive(&self, output: Sender<TaggedSignal>) -> WorkerHandle {
        let mut link = (self.make_link)();
        let frame_len = self.frame_len;
        let read_idle = self.read_idle;
        let origin = self.origin_label.clone();

        spawn_worker("hardware-rx", move |stop| {
            link.connect()?;
            info!(frame_len, "hardware reception started");

            while !stop.load(Ordering::Relaxed) {
                match link.recv_frame(frame_len, RECEIVE_POLL) {
                    Ok(Some(frame)) => {
                        if frame.len() != frame_len {
                            // Wrong-width frames are dropped, not reported.
                            debug!(len = frame.len(), "dropping wrong-length frame");
                        } else {
                            let signal = TaggedSignal::received(
                                SignalSource::Hardware,
                                frame,
                                HARDWARE_PROTOCOL_LABEL,
                                &origin,
                            );
                            if output.send(signal).is_err() {
                                break;
                            }
                        }
                        std::thread::sleep(read_idle);
                    }
                    Ok(None) => {}
                    Err(fault) => {
                        link.disconnect();
                        return Err(fault.into());
                    }
                }
            }

            link.disconnect();
            Ok(())
        })
    }

    /// Spawn a one-shot radio send worker for one code.
    ///
    /// Enables the transmit pin, transmits, and releases the pin even when
    /// transmission fails. Enabling fails fast if the receiver holds the
    /// pin, leaving pin state unchanged.
    pub fn start_send(&self, code: u64) -> WorkerHandle {
        let radio = Arc::clone(&self.radio);

        spawn_worker("hardware-tx", move |_stop| {
            let mut device = radio.lock();
            device.enable_transmission()?;
            let result = device.transmit_code(code);
            device.disable_transmission();
            result.map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crossbeam_channel::unbounded;
    use homelink_common::TransportError;
    use homelink_rf433::{RfError, TxSettings};
    use std::collections::VecDeque;

    struct ScriptedLink {
        frames: VecDeque<Vec<u8>>,
        fault_after_drain: bool,
    }

    impl HardwareLink for ScriptedLink {
        fn connect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        fn recv_frame(
            &mut self,
            _max_len: usize,
            _timeout: Duration,
        ) -> Result<Option<Vec<u8>>, TransportError> {
            match self.frames.pop_front() {
                Some(frame) => Ok(Some(frame)),
                None if self.fault_after_drain => {
                    Err(TransportError::Connection("device lost".to_string()))
                }
                None => {
                    std::thread::sleep(Duration::from_millis(1));
                    Ok(None)
                }
            }
        }

        fn disconnect(&mut self) {}
    }

    struct NullGpio;

    impl RadioGpio for NullGpio {
        fn setup_output(&mut self, _pin: u8) {}
        fn setup_input(&mut self, _pin: u8) {}
        fn write(&mut self, _pin: u8, _high: bool) {}
    }

    fn shared_radio() -> SharedRadio {
        let settings = TxSettings { repeats: 1, ..TxSettings::default() };
        Arc::new(Mutex::new(RfDevice::new(
            Box::new(NullGpio) as Box<dyn RadioGpio>,
            17,
            27,
            settings,
            80,
        )))
    }

    fn channel(frames: Vec<Vec<u8>>, fault_after_drain: bool, radio: SharedRadio) -> HardwareChannel {
        let config = HardwareConfig {
            device_address: "127.0.0.1:7001".to_string(),
            frame_len: 9,
            read_idle_ms: 1,
            origin_label: "hc05-bridge".to_string(),
        };
        let frames = Mutex::new(Some(ScriptedLink {
            frames: frames.into(),
            fault_after_drain,
        }));
        HardwareChannel::new(
            &config,
            Box::new(move || -> Box<dyn HardwareLink> {
                Box::new(frames.lock().take().expect("one session per test"))
            }),
            radio,
        )
    }

    #[test]
    fn test_receive_queues_exact_width_frames_only() {
        let frames = vec![
            b"013004045".to_vec(),  // valid
            b"0130".to_vec(),       // short: dropped silently
            b"0130040455x".to_vec(), // long: dropped silently
            b"021001500".to_vec(),  // valid
        ];
        let channel = channel(frames, false, shared_radio());
        let (tx, rx) = unbounded();
        let handle = channel.start_receive(tx);

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.message(), b"013004045");
        assert_eq!(first.source(), SignalSource::Hardware);
        assert_eq!(first.protocol(), HARDWARE_PROTOCOL_LABEL);
        assert_eq!(first.origin_label(), "hc05-bridge");
        assert_eq!(second.message(), b"021001500");
        assert!(rx.try_recv().is_err(), "dropped frames must not be queued");

        handle.request_stop();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_receive_terminates_on_link_fault() {
        let channel = channel(Vec::new(), true, shared_radio());
        let (tx, _rx) = unbounded();
        let handle = channel.start_receive(tx);
        match handle.join() {
            Err(GatewayError::Connection(_)) => {}
            other => panic!("expected connection fault, got {other:?}"),
        }
    }

    #[test]
    fn test_send_releases_pin_after_transmission() {
        let radio = shared_radio();
        let channel = channel(Vec::new(), false, Arc::clone(&radio));

        channel.start_send(5).join().unwrap();
        assert!(!radio.lock().tx_enabled());
        assert!(radio.lock().enable_reception().is_ok());
    }

    #[test]
    fn test_send_fails_fast_when_receiver_holds_pin() {
        let radio = shared_radio();
        radio.lock().enable_reception().unwrap();
        let channel = channel(Vec::new(), false, Arc::clone(&radio));

        match channel.start_send(5).join() {
            Err(GatewayError::Radio(RfError::ReceiveActive)) => {}
            other => panic!("expected pin refusal, got {other:?}"),
        }
        assert!(radio.lock().rx_enabled(), "receiver must keep the pin");
    }
}
