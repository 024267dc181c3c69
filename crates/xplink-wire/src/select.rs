//! Outbound data-selection control datagrams
//!
//! Layout:
//! - Bytes 0-3: ASCII tag `DSEL` (enable) or `USEL` (disable)
//! - Byte 4: version byte `0`
//! - Bytes 5-36: eight u32 field codes, little-endian, zero padded
//!
//! A single datagram carries at most eight codes; the caller retries any
//! remainder on the next cycle once the mask comparison repeats.

use bytes::{BufMut, Bytes, BytesMut};

use crate::FieldMask;

/// Enable-selection datagram tag + version byte
pub const SELECT_TAG: &[u8; 5] = b"DSEL0";

/// Disable-selection datagram tag + version byte
pub const DESELECT_TAG: &[u8; 5] = b"USEL0";

/// Codes carried per selection datagram
pub const MAX_SELECTION_CODES: usize = 8;

/// Total selection datagram size
pub const SELECTION_DATAGRAM_SIZE: usize = 5 + MAX_SELECTION_CODES * 4;

/// Direction of a selection request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    /// Ask the simulator to start emitting these fields
    Enable,
    /// Ask the simulator to stop emitting these fields
    Disable,
}

/// Encode one selection-control datagram carrying up to eight codes from
/// `mask`. Returns `None` when the mask is empty.
pub fn encode_selection(kind: SelectionKind, mask: FieldMask) -> Option<Bytes> {
    if mask.is_empty() {
        return None;
    }

    let tag = match kind {
        SelectionKind::Enable => SELECT_TAG,
        SelectionKind::Disable => DESELECT_TAG,
    };

    let mut buf = BytesMut::with_capacity(SELECTION_DATAGRAM_SIZE);
    buf.put_slice(tag);
    for code in mask.codes().take(MAX_SELECTION_CODES) {
        buf.put_u32_le(code as u32);
    }
    // zero padding up to the fixed eight slots
    buf.resize(SELECTION_DATAGRAM_SIZE, 0);

    Some(buf.freeze())
}
