//! XPLINK Wire Protocol - Binary datagram formats
//!
//! This crate implements the three UDP datagram formats spoken with the
//! simulator:
//! - Inbound telemetry (`DATA` tag + fixed 36-byte records)
//! - Outbound data-selection control (`DSEL`/`USEL` tag + up to 8 codes)
//! - Outbound named-value writes (`DREF` tag + value + variable name)
//!
//! All codecs read and write at fixed byte offsets with little-endian byte
//! order; nothing relies on in-memory struct layout.

pub mod field;
pub mod select;
pub mod telemetry;
pub mod write;

pub use field::*;
pub use select::*;
pub use telemetry::*;
pub use write::*;
