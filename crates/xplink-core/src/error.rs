//! Error types for the xplink bridge

use thiserror::Error;

/// Core xplink errors
#[derive(Error, Debug)]
pub enum XplinkError {
    // Wire errors
    #[error("Datagram too short: expected {expected}, got {actual}")]
    DatagramTooShort { expected: usize, actual: usize },

    #[error("Unknown datagram tag: {0:?}")]
    UnknownTag([u8; 4]),

    #[error("Variable name too long: {actual} bytes, limit {limit}")]
    NameTooLong { actual: usize, limit: usize },

    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No simulator peer known yet")]
    PeerUnknown,
}

/// Result type for xplink operations
pub type XplinkResult<T> = Result<T, XplinkError>;
