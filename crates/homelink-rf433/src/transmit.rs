//! Pulse rendering for the encode path.

use crate::error::RfError;
use crate::protocol::{protocol, TWO_BIT_SYMBOL_PROTOCOL};

/// Codes above this need 32 bits on air.
const CODE_24_BIT_MAX: u64 = 16_777_216;

/// One waveform: drive the pin high, then low, for the given durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// High duration in microseconds.
    pub high_us: u32,
    /// Low duration in microseconds.
    pub low_us: u32,
}

/// Transmission parameters for one code.
#[derive(Debug, Clone, Copy)]
pub struct TxSettings {
    /// Protocol table entry to modulate with.
    pub protocol_id: u8,
    /// Pulse unit override in microseconds; `None` uses the table value.
    pub pulse_length: Option<u32>,
    /// Bit length override; `None` selects 24/32 from the code value.
    pub bit_length: Option<u32>,
    /// How many times the frame is repeated on air.
    pub repeats: u8,
}

impl Default for TxSettings {
    fn default() -> Self {
        TxSettings {
            protocol_id: 1,
            pulse_length: None,
            bit_length: None,
            repeats: 3,
        }
    }
}

/// Render the exact on-air pulse sequence for a code.
///
/// Each repetition is one waveform per bit bracketed by a trailing sync
/// waveform; the 2-bit-per-symbol protocol additionally leads with a sync
/// and doubles the nominal bit width. The rendering is exact: pulse widths
/// are integral multiples of the pulse unit with no tolerance applied.
pub fn render_code(code: u64, settings: &TxSettings) -> Result<Vec<Pulse>, RfError> {
    let proto = protocol(settings.protocol_id).ok_or(RfError::UnknownProtocol(settings.protocol_id))?;
    let unit = settings.pulse_length.unwrap_or(proto.pulse_length);

    let bit_length = match settings.bit_length {
        Some(len) => len,
        None if settings.protocol_id == TWO_BIT_SYMBOL_PROTOCOL => 32,
        None if code > CODE_24_BIT_MAX => 32,
        None => 24,
    };

    let mut bits = Vec::with_capacity(bit_length as usize * 2);
    for i in (0..bit_length).rev() {
        bits.push(code >> i & 1 == 1);
    }
    if settings.protocol_id == TWO_BIT_SYMBOL_PROTOCOL {
        // Expand each data bit into its 2-bit on-air pattern: 0→01, 1→10.
        bits = bits
            .iter()
            .flat_map(|&bit| if bit { [true, false] } else { [false, true] })
            .collect();
    }

    let zero = Pulse { high_us: proto.zero_high * unit, low_us: proto.zero_low * unit };
    let one = Pulse { high_us: proto.one_high * unit, low_us: proto.one_low * unit };
    let sync = Pulse { high_us: proto.sync_high * unit, low_us: proto.sync_low * unit };

    let mut pulses = Vec::with_capacity((bits.len() + 2) * settings.repeats as usize);
    for _ in 0..settings.repeats {
        if settings.protocol_id == TWO_BIT_SYMBOL_PROTOCOL {
            pulses.push(sync);
        }
        for &bit in &bits {
            pulses.push(if bit { one } else { zero });
        }
        pulses.push(sync);
    }
    Ok(pulses)
}
