//! Deterministic encodings the gateway expects for amounts, transaction
//! references, client addresses and timestamps.

pub mod address;
pub mod amount;
pub mod reference;
pub mod timestamp;

pub use address::normalize_ip;
pub use amount::{from_minor_units, major_units_from_f64, to_minor_units};
pub use reference::{from_reference, to_reference};
pub use timestamp::{format_timestamp, parse_timestamp};
