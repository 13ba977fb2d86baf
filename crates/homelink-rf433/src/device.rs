//! Radio pin ownership and timed playback.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::RfError;
use crate::receive::{DecodedCode, EdgeDecoder};
use crate::transmit::{render_code, Pulse, TxSettings};

/// GPIO capability the radio drives.
///
/// Modeled on a memory-mapped GPIO port: pins are addressed by number and
/// switched between output (drive) and input (high-impedance, safe) roles.
/// Implementations must be cheap enough to call from the busy-wait
/// transmit loop.
pub trait RadioGpio: Send {
    /// Configure a pin as a driven output.
    fn setup_output(&mut self, pin: u8);

    /// Configure a pin as a high-impedance input.
    fn setup_input(&mut self, pin: u8);

    /// Drive an output pin high or low.
    fn write(&mut self, pin: u8, high: bool);
}

impl<T: RadioGpio + ?Sized> RadioGpio for Box<T> {
    fn setup_output(&mut self, pin: u8) {
        (**self).setup_output(pin)
    }

    fn setup_input(&mut self, pin: u8) {
        (**self).setup_input(pin)
    }

    fn write(&mut self, pin: u8, high: bool) {
        (**self).write(pin, high)
    }
}

/// One 433MHz transceiver: a transmit pin, a receive pin, and the codec
/// state for both directions.
///
/// The radio is the single hardware resource in the gateway requiring
/// mutual exclusion: only one of transmit/receive may hold a pin at a
/// time, and enabling one while the other is active fails fast without
/// touching pin state.
pub struct RfDevice<G: RadioGpio> {
    gpio: G,
    tx_pin: u8,
    rx_pin: u8,
    tx_enabled: bool,
    rx_enabled: bool,
    tx_settings: TxSettings,
    decoder: EdgeDecoder,
}

impl<G: RadioGpio> RfDevice<G> {
    /// Create a device over the given GPIO port and pin assignment.
    pub fn new(gpio: G, tx_pin: u8, rx_pin: u8, tx_settings: TxSettings, rx_tolerance_pct: u32) -> Self {
        RfDevice {
            gpio,
            tx_pin,
            rx_pin,
            tx_enabled: false,
            rx_enabled: false,
            tx_settings,
            decoder: EdgeDecoder::new(rx_tolerance_pct),
        }
    }

    /// Whether the transmitter currently holds its pin.
    pub fn tx_enabled(&self) -> bool {
        self.tx_enabled
    }

    /// Whether the receiver currently holds its pin.
    pub fn rx_enabled(&self) -> bool {
        self.rx_enabled
    }

    /// Take the transmit pin.
    ///
    /// Fails with [`RfError::ReceiveActive`] if the receiver holds a pin;
    /// pin state is left unchanged in that case. Idempotent when already
    /// enabled.
    pub fn enable_transmission(&mut self) -> Result<(), RfError> {
        if self.rx_enabled {
            return Err(RfError::ReceiveActive);
        }
        if !self.tx_enabled {
            self.gpio.setup_output(self.tx_pin);
            self.tx_enabled = true;
        }
        Ok(())
    }

    /// Release the transmit pin, returning it to a safe input state.
    pub fn disable_transmission(&mut self) {
        if self.tx_enabled {
            self.gpio.setup_input(self.tx_pin);
            self.tx_enabled = false;
        }
    }

    /// Take the receive pin.
    ///
    /// Fails with [`RfError::TransmitActive`] if the transmitter holds a
    /// pin; pin state is left unchanged in that case.
    pub fn enable_reception(&mut self) -> Result<(), RfError> {
        if self.tx_enabled {
            return Err(RfError::TransmitActive);
        }
        if !self.rx_enabled {
            self.gpio.setup_input(self.rx_pin);
            self.decoder.reset();
            self.rx_enabled = true;
        }
        Ok(())
    }

    /// Release the receive pin and drop any partial trace.
    pub fn disable_reception(&mut self) {
        if self.rx_enabled {
            self.decoder.reset();
            self.rx_enabled = false;
        }
    }

    /// Transmit a code with the device's configured settings.
    ///
    /// Renders the pulse sequence and plays it on the transmit pin with
    /// busy-wait timing. Fails if the transmit pin is not enabled or the
    /// configured protocol id is outside the table.
    pub fn transmit_code(&mut self, code: u64) -> Result<(), RfError> {
        if !self.tx_enabled {
            return Err(RfError::TransmitDisabled);
        }
        let pulses = render_code(code, &self.tx_settings)?;
        trace!(code, pulses = pulses.len(), "transmitting rf code");
        for pulse in pulses {
            self.play(pulse);
        }
        self.gpio.write(self.tx_pin, false);
        Ok(())
    }

    /// Feed one receive-pin edge into the decoder.
    ///
    /// Returns a recovered code at a confirmed frame boundary; `None`
    /// while listening or when reception is not enabled.
    pub fn rx_edge(&mut self, timestamp_us: u64) -> Option<DecodedCode> {
        if !self.rx_enabled {
            return None;
        }
        self.decoder.on_edge(timestamp_us)
    }

    /// Release whichever pin is held.
    pub fn release(&mut self) {
        self.disable_transmission();
        self.disable_reception();
    }

    fn play(&mut self, pulse: Pulse) {
        self.gpio.write(self.tx_pin, true);
        busy_wait(Duration::from_micros(pulse.high_us as u64));
        self.gpio.write(self.tx_pin, false);
        busy_wait(Duration::from_micros(pulse.low_us as u64));
    }
}

/// Sleep with sub-millisecond precision.
///
/// Pulse widths directly encode the signal, so a scheduler-granularity
/// sleep is not acceptable here: sleep in 1% slices and spin out the
/// remainder.
fn busy_wait(duration: Duration) {
    let start = Instant::now();
    let slice = duration / 100;
    while start.elapsed() < duration {
        if slice >= Duration::from_micros(100) {
            std::thread::sleep(slice);
        } else {
            std::hint::spin_loop();
        }
    }
}
