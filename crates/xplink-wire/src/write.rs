//! Outbound named-value write datagrams
//!
//! Layout:
//! - Bytes 0-3: ASCII tag `DREF`
//! - Byte 4: version byte `0`
//! - Bytes 5-8: f32 value, little-endian
//! - Bytes 9-508: target variable name, null terminated and null padded

use bytes::{BufMut, Bytes, BytesMut};

use xplink_core::{XplinkError, XplinkResult};

/// Named-value write datagram tag + version byte
pub const NAMED_WRITE_TAG: &[u8; 5] = b"DREF0";

/// Fixed length of the name field, terminator included
pub const NAME_FIELD_LEN: usize = 500;

/// Total named-value write datagram size
pub const NAMED_WRITE_DATAGRAM_SIZE: usize = 5 + 4 + NAME_FIELD_LEN;

/// Encode one named-value write.
///
/// `name` identifies the simulator variable; it must leave room for the
/// null terminator inside the fixed name field.
pub fn encode_named_write(name: &str, value: f32) -> XplinkResult<Bytes> {
    if name.len() >= NAME_FIELD_LEN {
        return Err(XplinkError::NameTooLong {
            actual: name.len(),
            limit: NAME_FIELD_LEN - 1,
        });
    }

    let mut buf = BytesMut::with_capacity(NAMED_WRITE_DATAGRAM_SIZE);
    buf.put_slice(NAMED_WRITE_TAG);
    buf.put_f32_le(value);
    buf.put_slice(name.as_bytes());
    buf.put_bytes(0, NAME_FIELD_LEN - name.len());

    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_write_layout() {
        let buf = encode_named_write("sim/flightmodel/controls/flaprqst", 0.5).unwrap();

        assert_eq!(buf.len(), NAMED_WRITE_DATAGRAM_SIZE);
        assert_eq!(&buf[0..5], NAMED_WRITE_TAG);
        assert_eq!(f32::from_le_bytes(buf[5..9].try_into().unwrap()), 0.5);

        let name_field = &buf[9..];
        let end = name_field.iter().position(|&b| b == 0).unwrap();
        assert_eq!(&name_field[..end], b"sim/flightmodel/controls/flaprqst");
        assert!(name_field[end..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_name_too_long_rejected() {
        let name = "x".repeat(NAME_FIELD_LEN);
        assert!(matches!(
            encode_named_write(&name, 1.0),
            Err(XplinkError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_max_length_name_fits() {
        let name = "y".repeat(NAME_FIELD_LEN - 1);
        let buf = encode_named_write(&name, 1.0).unwrap();
        assert_eq!(buf.len(), NAMED_WRITE_DATAGRAM_SIZE);
        // terminator still present as the final byte of the name field
        assert_eq!(buf[NAMED_WRITE_DATAGRAM_SIZE - 1], 0);
    }
}
