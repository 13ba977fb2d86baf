//! 433MHz physical-layer codec.
//!
//! This crate turns bounded integer codes into precisely timed pulse
//! sequences and sampled pulse-duration traces back into candidate codes.
//!
//! # Protocol table
//!
//! Six fixed modulation schemes, each defined by a pulse unit in
//! microseconds and per-symbol high/low durations expressed as multiples
//! of that unit. Entry 6 is the 2-bit-per-symbol scheme where every data
//! bit expands to a two-bit on-air pattern (`0→01`, `1→10`).
//!
//! # Encode path
//!
//! [`render_code`] is pure: it produces the exact [`Pulse`] sequence for a
//! code without touching hardware, which is what the timing tests assert
//! against. [`RfDevice::transmit_code`] plays a rendered sequence on the
//! transmit pin with busy-wait timing, since a scheduler-granularity sleep
//! would smear the pulse widths past what receivers tolerate.
//!
//! # Decode path
//!
//! [`EdgeDecoder::on_edge`] is fed a timestamp on every electrical edge of
//! the receive pin. It keeps a ring of inter-edge durations, watches for
//! repeated frame-boundary gaps, and on the second consistent repeat walks
//! the recorded pulse pairs against every protocol entry in order,
//! tolerating bounded clock jitter. Traces that match no entry are
//! discarded silently and the decoder keeps listening.

mod device;
mod error;
mod protocol;
mod receive;
mod transmit;

pub use device::*;
pub use error::*;
pub use protocol::*;
pub use receive::*;
pub use transmit::*;
