//! Inbound telemetry datagram decoding
//!
//! Layout:
//! - Bytes 0-3: ASCII tag `DATA`
//! - Byte 4: sender index byte (ignored)
//! - Then zero or more 36-byte records, back to back:
//!   - Bytes 0-3: field code in the low-order byte of a little-endian u32
//!   - Bytes 4-35: eight IEEE-754 f32 payload values, little-endian
//!
//! Trailing bytes smaller than one record are silently ignored; the
//! protocol always sends whole records.

use bytes::Buf;

use xplink_core::{XplinkError, XplinkResult};

use crate::FieldMask;

/// Telemetry datagram tag
pub const TELEMETRY_TAG: &[u8; 4] = b"DATA";

/// Tag + index byte
pub const TELEMETRY_HEADER_SIZE: usize = 5;

/// One code slot plus eight payload values, 4 bytes each
pub const RECORD_SIZE: usize = 36;

/// Payload values per record
pub const RECORD_VALUES: usize = 8;

/// Largest telemetry datagram the bridge will accept
pub const MAX_TELEMETRY_DATAGRAM: usize = 10_000;

/// One decoded telemetry record
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetryRecord {
    /// Field code from the low-order byte of the first slot
    pub code: u8,
    /// The eight payload values following the code slot
    pub values: [f32; RECORD_VALUES],
}

/// A fully decoded telemetry datagram
#[derive(Clone, Debug, Default)]
pub struct TelemetryPacket {
    pub records: Vec<TelemetryRecord>,
    /// Codes observed in this datagram (codes >= 64 never set a bit)
    pub seen: FieldMask,
}

/// Decode one telemetry datagram.
///
/// Fails on a short datagram or a tag mismatch; both outcomes are treated
/// by the caller the same as no datagram having arrived.
pub fn decode_telemetry(buf: &[u8]) -> XplinkResult<TelemetryPacket> {
    if buf.len() < TELEMETRY_HEADER_SIZE + RECORD_SIZE {
        return Err(XplinkError::DatagramTooShort {
            expected: TELEMETRY_HEADER_SIZE + RECORD_SIZE,
            actual: buf.len(),
        });
    }
    if &buf[0..4] != TELEMETRY_TAG {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&buf[0..4]);
        return Err(XplinkError::UnknownTag(tag));
    }

    let mut body = &buf[TELEMETRY_HEADER_SIZE..];
    let mut packet = TelemetryPacket {
        records: Vec::with_capacity(body.len() / RECORD_SIZE),
        seen: FieldMask::EMPTY,
    };

    while body.len() >= RECORD_SIZE {
        let code = (body.get_u32_le() & 0xFF) as u8;
        let mut values = [0f32; RECORD_VALUES];
        for v in values.iter_mut() {
            *v = body.get_f32_le();
        }

        packet.seen.insert(code);
        packet.records.push(TelemetryRecord { code, values });
    }

    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldCode;

    use bytes::BufMut;

    fn put_record(buf: &mut Vec<u8>, code: u32, values: [f32; RECORD_VALUES]) {
        buf.put_u32_le(code);
        for v in values {
            buf.put_f32_le(v);
        }
    }

    fn datagram(records: &[(u32, [f32; RECORD_VALUES])]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.put_slice(TELEMETRY_TAG);
        buf.put_u8(b'0');
        for (code, values) in records {
            put_record(&mut buf, *code, *values);
        }
        buf
    }

    #[test]
    fn test_decode_single_record() {
        let values = [0.0, 1.5, -2.0, 3.25, 0.0, 0.0, 0.0, 0.0];
        let buf = datagram(&[(FieldCode::Speed.code() as u32, values)]);

        let pkt = decode_telemetry(&buf).unwrap();
        assert_eq!(pkt.records.len(), 1);
        assert_eq!(pkt.records[0].code, FieldCode::Speed.code());
        assert_eq!(pkt.records[0].values, values);
        assert!(pkt.seen.contains(FieldCode::Speed));
    }

    #[test]
    fn test_decode_rejects_short_datagram() {
        let buf = datagram(&[]);
        assert!(matches!(
            decode_telemetry(&buf),
            Err(XplinkError::DatagramTooShort { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut buf = datagram(&[(1, [0.0; 8])]);
        buf[0..4].copy_from_slice(b"BECN");
        assert!(matches!(
            decode_telemetry(&buf),
            Err(XplinkError::UnknownTag(_))
        ));
    }

    #[test]
    fn test_trailing_partial_record_ignored() {
        let mut buf = datagram(&[(FieldCode::Times.code() as u32, [0.5; 8])]);
        buf.extend_from_slice(&[0xAB; 17]);

        let pkt = decode_telemetry(&buf).unwrap();
        assert_eq!(pkt.records.len(), 1);
    }

    #[test]
    fn test_unrecognized_code_sets_mask_bit() {
        // code 33 is not one the bridge interprets, but it is in range
        let buf = datagram(&[(33, [0.0; 8])]);
        let pkt = decode_telemetry(&buf).unwrap();

        assert_eq!(pkt.records[0].code, 33);
        assert!(pkt.seen.bits() & (1 << 33) != 0);
    }

    #[test]
    fn test_out_of_range_code_not_in_mask() {
        let buf = datagram(&[(77, [0.0; 8])]);
        let pkt = decode_telemetry(&buf).unwrap();

        // record still decoded, mask untouched
        assert_eq!(pkt.records[0].code, 77);
        assert!(pkt.seen.is_empty());
    }

    #[test]
    fn test_code_from_low_byte_only() {
        // upper bytes of the code slot must be masked away
        let buf = datagram(&[(0x0001_0103, [0.0; 8])]);
        let pkt = decode_telemetry(&buf).unwrap();

        assert_eq!(pkt.records[0].code, 0x03);
        assert!(pkt.seen.contains(FieldCode::Speed));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
                let _ = decode_telemetry(&data);
            }

            #[test]
            fn decode_consumes_whole_records(n in 1usize..8, fill in 0usize..(RECORD_SIZE - 1)) {
                let mut buf = Vec::new();
                buf.put_slice(TELEMETRY_TAG);
                buf.put_u8(b'0');
                for i in 0..n {
                    let mut values = [0f32; RECORD_VALUES];
                    values[0] = i as f32;
                    put_record(&mut buf, i as u32, values);
                }
                buf.extend_from_slice(&vec![0u8; fill]);

                let pkt = decode_telemetry(&buf).unwrap();
                prop_assert_eq!(pkt.records.len(), n);
            }
        }
    }
}
