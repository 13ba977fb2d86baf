//! Homelink wire-grammar translation.
//!
//! This crate translates between the two command grammars the gateway
//! bridges. It is pure and transport-independent: no I/O, no side effects,
//! every rejection is a typed error.
//!
//! # Cloud grammar (plaintext, after decryption)
//!
//! ```text
//! <source>/<zone>/<entity>/<target>/<action>
//! ```
//!
//! Five `/`-separated fields: the configured source identifier, a zone in
//! 1..=99, an actuator entity name, a target id in 0..=999 (0 = all), and
//! an `on`/`off` action.
//!
//! # Hardware command grammar (outbound, fixed width)
//!
//! ```text
//! Z Z E T I I I A      (8 digits, no separators)
//! ```
//!
//! Two-digit zero-padded zone, one-digit entity code, one-digit all/id
//! flag, three-digit zero-padded id (000 = all), one-digit action.
//!
//! # Hardware telemetry grammar (inbound, fixed width)
//!
//! ```text
//! Z Z E I I I V V V    (9 digits, no separators)
//! ```
//!
//! Two-digit zone, one-digit sensor entity code, three-digit id,
//! three-digit analog value in 0..=999.
//!
//! # Example
//!
//! ```rust,ignore
//! use homelink_protocol::{EntityTable, FormatCodec};
//!
//! let codec = FormatCodec::new("src", EntityTable::default());
//! let command = codec.cloud_to_hardware(b"src/1/light/0/on")?;
//! assert_eq!(command.wire(), "01100001");
//! ```

mod codec;
mod command;
mod entities;
mod error;
mod layout;
mod telemetry;

pub use codec::*;
pub use command::*;
pub use entities::*;
pub use error::*;
pub use layout::*;
pub use telemetry::*;
