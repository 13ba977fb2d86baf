//! The signal router.
//!
//! Drains the routing queue and dispatches by source tag: cloud commands
//! are decrypted, translated, and handed to the radio send path; hardware
//! telemetry is translated, encrypted, and handed to the cloud send path.
//! Every failure below a connection fault is local to one signal: drop,
//! report, keep routing.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use homelink_common::{PayloadCipher, CLOUD_SIGNAL_TAG, HARDWARE_SIGNAL_TAG};
use homelink_protocol::FormatCodec;
use tracing::{debug, info, warn};

use crate::cloud::CloudChannel;
use crate::hardware::HardwareChannel;
use crate::signal::RoutedSignal;
use crate::worker::{spawn_worker, WorkerHandle};

/// Spawn the router worker.
///
/// Blocks on the routing queue without a timeout and terminates when the
/// queue disconnects (the writer has gone away) or cancellation is
/// observed at wake.
pub fn start_router(
    routed_input: Receiver<RoutedSignal>,
    codec: FormatCodec,
    cipher: Arc<dyn PayloadCipher>,
    cloud: Arc<CloudChannel>,
    hardware: Arc<HardwareChannel>,
) -> WorkerHandle {
    spawn_worker("router", move |stop| {
        while let Ok(entry) = routed_input.recv() {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            match entry.tag.as_str() {
                CLOUD_SIGNAL_TAG => route_cloud_command(&entry, &codec, cipher.as_ref(), &hardware),
                HARDWARE_SIGNAL_TAG => route_hardware_telemetry(&entry, &codec, cipher.as_ref(), &cloud),
                other => warn!(tag = other, "dropping unrecognized signal"),
            }
        }
        info!("routing queue closed, router finishing");
        Ok(())
    })
}

/// Cloud command → hardware: decrypt, translate, transmit on the radio.
fn route_cloud_command(
    entry: &RoutedSignal,
    codec: &FormatCodec,
    cipher: &dyn PayloadCipher,
    hardware: &HardwareChannel,
) {
    let plaintext = match cipher.decrypt(entry.signal.message()) {
        Ok(plaintext) => plaintext,
        Err(fault) => {
            // A payload this gateway cannot decrypt is an invalid signal,
            // not a pipeline failure.
            warn!(error = %fault, "dropping undecryptable cloud signal");
            return;
        }
    };

    match codec.cloud_to_hardware(&plaintext) {
        Ok(command) => {
            debug!(frame = %command, "cloud command translated");
            hardware.start_send(command.radio_code());
        }
        Err(rejection) => warn!(error = %rejection, "dropping rejected cloud signal"),
    }
}

/// Hardware telemetry → cloud: translate, encrypt, publish.
fn route_hardware_telemetry(
    entry: &RoutedSignal,
    codec: &FormatCodec,
    cipher: &dyn PayloadCipher,
    cloud: &CloudChannel,
) {
    let command = match codec.hardware_to_cloud(entry.signal.message()) {
        Ok(command) => command,
        Err(rejection) => {
            warn!(error = %rejection, "dropping rejected hardware signal");
            return;
        }
    };

    match cipher.encrypt(command.as_bytes()) {
        Ok(ciphertext) => {
            debug!(command = %command, "hardware telemetry translated");
            cloud.start_send(ciphertext);
        }
        Err(fault) => warn!(error = %fault, "dropping unencryptable hardware signal"),
    }
}
