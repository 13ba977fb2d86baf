//! Edge-trace decoding for the receive path.

use crate::protocol::{protocol, FRAME_GAP_MATCH_US, FRAME_GAP_US, MAX_CHANGES, PROTOCOL_COUNT};

/// A successfully recovered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedCode {
    /// The recovered integer code.
    pub code: u64,
    /// Number of data bits in the frame.
    pub bit_length: u32,
    /// Protocol table entry the trace matched.
    pub protocol_id: u8,
    /// Inferred pulse unit in microseconds.
    pub pulse_length: u32,
}

/// Decoder state fed one timestamp per electrical edge.
///
/// Durations between edges are recorded into a ring of [`MAX_CHANGES`]
/// entries. A gap longer than [`FRAME_GAP_US`] marks a frame-boundary
/// candidate; when the same gap (within [`FRAME_GAP_MATCH_US`]) repeats a
/// second time, the recorded trace is tried against every protocol entry
/// in order and the first match wins. Matching is tolerance-based: the
/// pulse unit is inferred from the boundary gap, and each pulse pair must
/// sit within the configured percentage of its expected widths. Traces
/// matching no entry are discarded and the decoder keeps listening.
#[derive(Debug)]
pub struct EdgeDecoder {
    timings: [u32; MAX_CHANGES + 1],
    last_timestamp_us: u64,
    change_count: usize,
    repeat_count: u32,
    tolerance_pct: u32,
}

impl EdgeDecoder {
    /// Create a decoder with the given tolerance window, in percent of the
    /// inferred pulse unit.
    pub fn new(tolerance_pct: u32) -> Self {
        EdgeDecoder {
            timings: [0; MAX_CHANGES + 1],
            last_timestamp_us: 0,
            change_count: 0,
            repeat_count: 0,
            tolerance_pct,
        }
    }

    /// Record one edge and attempt a decode at frame boundaries.
    ///
    /// `timestamp_us` must be monotonic. Returns a code on the second
    /// consistent frame repeat, `None` otherwise.
    pub fn on_edge(&mut self, timestamp_us: u64) -> Option<DecodedCode> {
        let duration = timestamp_us.saturating_sub(self.last_timestamp_us).min(u32::MAX as u64) as u32;
        let mut decoded = None;

        if duration > FRAME_GAP_US {
            if duration.abs_diff(self.timings[0]) < FRAME_GAP_MATCH_US {
                // Same boundary gap as the recorded frame: the transmitter
                // is repeating itself.
                self.repeat_count += 1;
                self.change_count = self.change_count.saturating_sub(1);
                if self.repeat_count == 2 {
                    for id in 1..=PROTOCOL_COUNT {
                        decoded = self.try_protocol(id, self.change_count);
                        if decoded.is_some() {
                            break;
                        }
                    }
                    self.repeat_count = 0;
                }
            }
            self.change_count = 0;
        }

        if self.change_count >= MAX_CHANGES {
            self.change_count = 0;
            self.repeat_count = 0;
        }
        self.timings[self.change_count] = duration;
        self.change_count += 1;
        self.last_timestamp_us = timestamp_us;

        decoded
    }

    /// Reset all receive state.
    pub fn reset(&mut self) {
        self.timings = [0; MAX_CHANGES + 1];
        self.last_timestamp_us = 0;
        self.change_count = 0;
        self.repeat_count = 0;
    }

    /// Try to read the recorded trace as one protocol's waveforms.
    fn try_protocol(&self, id: u8, change_count: usize) -> Option<DecodedCode> {
        let proto = protocol(id)?;
        let delay = self.timings[0] / proto.sync_low;
        if delay == 0 {
            return None;
        }
        let tolerance = delay * self.tolerance_pct / 100;

        let mut code: u64 = 0;
        let mut i = 1;
        while i + 1 <= change_count {
            let high = self.timings[i];
            let low = self.timings[i + 1];
            if high.abs_diff(delay * proto.zero_high) < tolerance
                && low.abs_diff(delay * proto.zero_low) < tolerance
            {
                code <<= 1;
            } else if high.abs_diff(delay * proto.one_high) < tolerance
                && low.abs_diff(delay * proto.one_low) < tolerance
            {
                code <<= 1;
                code |= 1;
            } else {
                return None;
            }
            i += 2;
        }

        if change_count > 6 && code != 0 {
            Some(DecodedCode {
                code,
                bit_length: (change_count / 2) as u32,
                protocol_id: id,
                pulse_length: delay,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmit::{render_code, Pulse, TxSettings};

    /// Turn a rendered pulse sequence into the edge timestamps a receive
    /// pin would see, starting at `start_us`, with `jitter_us` added to and
    /// subtracted from alternating data-pulse phases.
    fn edges_from_pulses(pulses: &[Pulse], start_us: u64, jitter_us: i64) -> Vec<u64> {
        let mut edges = Vec::with_capacity(pulses.len() * 2 + 1);
        let mut t = start_us;
        let mut flip = 1i64;
        for pulse in pulses {
            // Skew only short (data) phases; boundary gaps stay exact so
            // the inferred pulse unit is unaffected.
            let high_jitter = if pulse.high_us < FRAME_GAP_US { jitter_us * flip } else { 0 };
            let low_jitter = if pulse.low_us < FRAME_GAP_US { jitter_us * -flip } else { 0 };
            flip = -flip;

            edges.push(t);
            t += (pulse.high_us as i64 + high_jitter) as u64;
            edges.push(t);
            t += (pulse.low_us as i64 + low_jitter) as u64;
        }
        edges.push(t);
        edges
    }

    fn decode_trace(edges: &[u64], tolerance_pct: u32) -> Option<DecodedCode> {
        let mut decoder = EdgeDecoder::new(tolerance_pct);
        let mut decoded = None;
        for &edge in edges {
            if let Some(result) = decoder.on_edge(edge) {
                decoded = Some(result);
            }
        }
        decoded
    }

    #[test]
    fn test_round_trip_clean_trace() {
        let settings = TxSettings::default();
        let pulses = render_code(0b1011_0110_0101, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 0);

        let decoded = decode_trace(&edges, 80).expect("clean trace must decode");
        assert_eq!(decoded.code, 0b1011_0110_0101);
        assert_eq!(decoded.bit_length, 24);
        assert_eq!(decoded.protocol_id, 1);
        assert_eq!(decoded.pulse_length, 350);
    }

    #[test]
    fn test_round_trip_survives_jitter_within_tolerance() {
        // 80% of the 350µs unit is 280µs; 150µs of skew stays inside.
        let settings = TxSettings::default();
        let pulses = render_code(42, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 150);

        let decoded = decode_trace(&edges, 80).expect("bounded jitter must decode");
        assert_eq!(decoded.code, 42);
        assert_eq!(decoded.protocol_id, 1);
    }

    #[test]
    fn test_jitter_beyond_tolerance_fails_rather_than_misreads() {
        // 300µs of skew exceeds the 280µs window: the trace must be
        // rejected outright, never decoded to a different code.
        let settings = TxSettings::default();
        let pulses = render_code(42, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 300);

        assert_eq!(decode_trace(&edges, 80), None);
    }

    #[test]
    fn test_single_frame_does_not_decode() {
        // One frame produces one boundary gap; a decode needs the second
        // consistent repeat.
        let settings = TxSettings { repeats: 1, ..TxSettings::default() };
        let pulses = render_code(42, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 0);

        assert_eq!(decode_trace(&edges, 80), None);
    }

    #[test]
    fn test_zero_code_is_rejected() {
        let settings = TxSettings::default();
        let pulses = render_code(0, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 0);

        assert_eq!(decode_trace(&edges, 80), None);
    }

    #[test]
    fn test_protocol_2_round_trip() {
        let settings = TxSettings { protocol_id: 2, ..TxSettings::default() };
        let pulses = render_code(777, &settings).unwrap();
        let edges = edges_from_pulses(&pulses, 10_000, 0);

        let decoded = decode_trace(&edges, 80).expect("protocol 2 trace must decode");
        assert_eq!(decoded.code, 777);
        assert_eq!(decoded.protocol_id, 2);
        assert_eq!(decoded.pulse_length, 650);
    }

    #[test]
    fn test_ring_buffer_overflow_resets() {
        let mut decoder = EdgeDecoder::new(80);
        // A long run of sub-boundary edges must wrap the ring without
        // panicking or decoding.
        let mut t = 10_000u64;
        for _ in 0..(MAX_CHANGES * 3) {
            t += 400;
            assert_eq!(decoder.on_edge(t), None);
        }
    }
}
