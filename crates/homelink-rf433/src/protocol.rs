//! The fixed radio protocol table.

/// Capacity of the receive ring buffer, in recorded edge durations.
pub const MAX_CHANGES: usize = 67;

/// Inter-edge gap treated as a frame-boundary candidate, in microseconds.
pub const FRAME_GAP_US: u32 = 5_000;

/// How close two boundary gaps must be to count as the same frame
/// repeating, in microseconds.
pub const FRAME_GAP_MATCH_US: u32 = 200;

/// One modulation scheme: pulse durations as multiples of the pulse unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    /// Base pulse unit in microseconds.
    pub pulse_length: u32,
    /// Sync waveform high duration, in pulse units.
    pub sync_high: u32,
    /// Sync waveform low duration, in pulse units.
    pub sync_low: u32,
    /// Zero-symbol high duration, in pulse units.
    pub zero_high: u32,
    /// Zero-symbol low duration, in pulse units.
    pub zero_low: u32,
    /// One-symbol high duration, in pulse units.
    pub one_high: u32,
    /// One-symbol low duration, in pulse units.
    pub one_low: u32,
}

/// Protocol table entry using 2-bit-per-symbol expansion.
pub const TWO_BIT_SYMBOL_PROTOCOL: u8 = 6;

const PROTOCOLS: [Protocol; 6] = [
    // 1
    Protocol { pulse_length: 350, sync_high: 1, sync_low: 31, zero_high: 1, zero_low: 3, one_high: 3, one_low: 1 },
    // 2
    Protocol { pulse_length: 650, sync_high: 1, sync_low: 10, zero_high: 1, zero_low: 2, one_high: 2, one_low: 1 },
    // 3
    Protocol { pulse_length: 100, sync_high: 30, sync_low: 71, zero_high: 4, zero_low: 11, one_high: 9, one_low: 6 },
    // 4
    Protocol { pulse_length: 380, sync_high: 1, sync_low: 6, zero_high: 1, zero_low: 3, one_high: 3, one_low: 1 },
    // 5
    Protocol { pulse_length: 500, sync_high: 6, sync_low: 14, zero_high: 1, zero_low: 2, one_high: 2, one_low: 1 },
    // 6 ("Nexa"-style, 2 bits per symbol)
    Protocol { pulse_length: 200, sync_high: 1, sync_low: 10, zero_high: 1, zero_low: 5, one_high: 1, one_low: 1 },
];

/// Number of entries in the protocol table.
pub const PROTOCOL_COUNT: u8 = PROTOCOLS.len() as u8;

/// Look up a protocol by its 1-based table id.
pub fn protocol(id: u8) -> Option<&'static Protocol> {
    if (1..=PROTOCOL_COUNT).contains(&id) {
        Some(&PROTOCOLS[(id - 1) as usize])
    } else {
        None
    }
}
