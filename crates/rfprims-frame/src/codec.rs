use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::error::{FrameError, Result};
use crate::frame::{
    CommandName, CommandStatus, Frame, AT_COMMAND, AT_COMMAND_RESPONSE, REMOTE_AT_COMMAND,
    REMOTE_AT_COMMAND_RESPONSE, START_DELIMITER,
};

/// Fixed bytes around the checksummed body: delimiter + length + checksum.
pub const FRAME_OVERHEAD: usize = 4;

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬───────────┬─────────┬──────────────────┬──────────┐
/// │ Delimiter  │ Length    │ Tag     │ Variant fields   │ Checksum │
/// │ 0x7E (1B)  │ (2B BE)   │ (1B)    │ + command data   │ (1B)     │
/// └────────────┴───────────┴─────────┴──────────────────┴──────────┘
/// ```
/// The length field counts the bytes between itself and the checksum,
/// exclusive of both; the checksum covers the same span.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) -> Result<()> {
    let fixed = fixed_body_len(frame);
    let data_len = frame.data().len();
    let max_data = u16::MAX as usize - fixed;
    if data_len > max_data {
        return Err(FrameError::PayloadTooLarge {
            size: data_len,
            max: max_data,
        });
    }
    let body_len = fixed + data_len;

    dst.reserve(FRAME_OVERHEAD + body_len);
    dst.put_u8(START_DELIMITER);
    dst.put_u16(body_len as u16);

    let body_start = dst.len();
    match frame {
        Frame::AtCommand { name, data } => {
            dst.put_u8(AT_COMMAND);
            dst.put_slice(&name.as_bytes());
            dst.put_slice(data);
        }
        Frame::AtCommandResponse { name, status, data } => {
            dst.put_u8(AT_COMMAND_RESPONSE);
            dst.put_slice(&name.as_bytes());
            dst.put_u8(status.as_byte());
            dst.put_slice(data);
        }
        Frame::RemoteAtCommand {
            dest64,
            dest16,
            options,
            name,
            data,
        } => {
            dst.put_u8(REMOTE_AT_COMMAND);
            dst.put_u64(*dest64);
            dst.put_u16(*dest16);
            dst.put_u8(*options);
            dst.put_slice(&name.as_bytes());
            dst.put_slice(data);
        }
        Frame::RemoteAtCommandResponse {
            dest64,
            dest16,
            name,
            status,
            data,
        } => {
            dst.put_u8(REMOTE_AT_COMMAND_RESPONSE);
            dst.put_u64(*dest64);
            dst.put_u16(*dest16);
            dst.put_slice(&name.as_bytes());
            dst.put_u8(status.as_byte());
            dst.put_slice(data);
        }
    }

    let check = checksum(&dst[body_start..]);
    dst.put_u8(check);
    Ok(())
}

/// Encode a frame into a freshly allocated buffer.
pub fn encode_to_bytes(frame: &Frame) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_frame(frame, &mut dst)?;
    Ok(dst.freeze())
}

/// Decode a checksum-validated raw frame slice into a typed [`Frame`].
///
/// Returns `None` for unrecognized frame type tags and for frames whose
/// body is too short for the tag's fixed fields. Such frames consume
/// their bytes but produce nothing to dispatch.
pub fn decode_frame(raw: &[u8]) -> Option<Frame> {
    debug_assert!(raw.len() >= FRAME_OVERHEAD);
    let mut body = &raw[3..raw.len() - 1];
    if body.is_empty() {
        tracing::debug!("frame with empty body ignored");
        return None;
    }

    let tag = body.get_u8();
    match tag {
        AT_COMMAND => {
            if body.remaining() < 2 {
                return truncated(tag);
            }
            let name = CommandName::new([body.get_u8(), body.get_u8()]);
            Some(Frame::AtCommand {
                name,
                data: Bytes::copy_from_slice(body),
            })
        }
        AT_COMMAND_RESPONSE => {
            if body.remaining() < 3 {
                return truncated(tag);
            }
            let name = CommandName::new([body.get_u8(), body.get_u8()]);
            let status = CommandStatus::from_byte(body.get_u8());
            Some(Frame::AtCommandResponse {
                name,
                status,
                data: Bytes::copy_from_slice(body),
            })
        }
        REMOTE_AT_COMMAND => {
            if body.remaining() < 13 {
                return truncated(tag);
            }
            let dest64 = body.get_u64();
            let dest16 = body.get_u16();
            let options = body.get_u8();
            let name = CommandName::new([body.get_u8(), body.get_u8()]);
            Some(Frame::RemoteAtCommand {
                dest64,
                dest16,
                options,
                name,
                data: Bytes::copy_from_slice(body),
            })
        }
        REMOTE_AT_COMMAND_RESPONSE => {
            if body.remaining() < 13 {
                return truncated(tag);
            }
            let dest64 = body.get_u64();
            let dest16 = body.get_u16();
            let name = CommandName::new([body.get_u8(), body.get_u8()]);
            let status = CommandStatus::from_byte(body.get_u8());
            Some(Frame::RemoteAtCommandResponse {
                dest64,
                dest16,
                name,
                status,
                data: Bytes::copy_from_slice(body),
            })
        }
        other => {
            tracing::debug!("unrecognized frame type 0x{other:02X}");
            None
        }
    }
}

/// Body length excluding command data: tag byte plus fixed fields.
fn fixed_body_len(frame: &Frame) -> usize {
    match frame {
        Frame::AtCommand { .. } => 1 + 2,
        Frame::AtCommandResponse { .. } => 1 + 2 + 1,
        Frame::RemoteAtCommand { .. } => 1 + 8 + 2 + 1 + 2,
        Frame::RemoteAtCommandResponse { .. } => 1 + 8 + 2 + 2 + 1,
    }
}

fn truncated(tag: u8) -> Option<Frame> {
    tracing::debug!("frame body too short for type 0x{tag:02X}, ignored");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{options, BROADCAST_ADDRESS_16, BROADCAST_ADDRESS_64};

    fn name(s: &str) -> CommandName {
        s.parse().expect("two-character name")
    }

    #[test]
    fn ni_query_encodes_to_documented_bytes() {
        let frame = Frame::AtCommand {
            name: name("NI"),
            data: Bytes::new(),
        };
        let wire = encode_to_bytes(&frame).unwrap();

        // Length counts tag + name + data = 3; checksum is
        // 0xFF - ((0x08 + 'N' + 'I') % 256).
        let expected_check = 0xFF - ((0x08u32 + u32::from(b'N') + u32::from(b'I')) % 256) as u8;
        assert_eq!(
            wire.as_ref(),
            &[0x7E, 0x00, 0x03, 0x08, b'N', b'I', expected_check]
        );
    }

    #[test]
    fn at_command_round_trip() {
        let frame = Frame::AtCommand {
            name: name("ID"),
            data: Bytes::from_static(&[0x33, 0x32]),
        };
        let wire = encode_to_bytes(&frame).unwrap();
        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), Some(frame));
    }

    #[test]
    fn at_command_response_round_trip() {
        let frame = Frame::AtCommandResponse {
            name: name("NI"),
            status: CommandStatus::InvalidParameter,
            data: Bytes::from_static(b"node-7"),
        };
        let wire = encode_to_bytes(&frame).unwrap();
        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), Some(frame));
    }

    #[test]
    fn remote_at_command_round_trip() {
        let frame = Frame::RemoteAtCommand {
            dest64: 0x0013_A200_4052_1CF0,
            dest16: 0x1234,
            options: options::APPLY_CHANGES,
            name: name("D0"),
            data: Bytes::from_static(&[0x05]),
        };
        let wire = encode_to_bytes(&frame).unwrap();
        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), Some(frame));
    }

    #[test]
    fn remote_at_command_response_round_trip() {
        let frame = Frame::RemoteAtCommandResponse {
            dest64: BROADCAST_ADDRESS_64,
            dest16: BROADCAST_ADDRESS_16,
            name: name("NI"),
            status: CommandStatus::Ok,
            data: Bytes::from_static(b"relay"),
        };
        let wire = encode_to_bytes(&frame).unwrap();
        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), Some(frame));
    }

    #[test]
    fn remote_addresses_are_big_endian_on_the_wire() {
        let frame = Frame::RemoteAtCommand {
            dest64: 0x0102_0304_0506_0708,
            dest16: 0x0A0B,
            options: 0x00,
            name: name("NI"),
            data: Bytes::new(),
        };
        let wire = encode_to_bytes(&frame).unwrap();

        assert_eq!(&wire[4..12], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&wire[12..14], &[0x0A, 0x0B]);
    }

    #[test]
    fn length_field_counts_body_only() {
        let frame = Frame::AtCommandResponse {
            name: name("SH"),
            status: CommandStatus::Ok,
            data: Bytes::from_static(&[0xDE, 0xAD]),
        };
        let wire = encode_to_bytes(&frame).unwrap();

        let declared = u16::from_be_bytes([wire[1], wire[2]]) as usize;
        assert_eq!(declared, wire.len() - FRAME_OVERHEAD);
        assert_eq!(declared, 1 + 2 + 1 + 2);
    }

    #[test]
    fn unrecognized_tag_decodes_to_none() {
        // Hand-built frame with tag 0x42 and a correct checksum.
        let body = [0x42u8, 0x01, 0x02];
        let mut wire = vec![0x7E, 0x00, body.len() as u8];
        wire.extend_from_slice(&body);
        wire.push(checksum(&body));

        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), None);
    }

    #[test]
    fn body_too_short_for_tag_decodes_to_none() {
        // AT response tag with a single-byte body remainder.
        let body = [AT_COMMAND_RESPONSE, b'N'];
        let mut wire = vec![0x7E, 0x00, body.len() as u8];
        wire.extend_from_slice(&body);
        wire.push(checksum(&body));

        assert_eq!(decode_frame(&wire), None);
    }

    #[test]
    fn oversized_command_data_is_rejected() {
        let frame = Frame::AtCommand {
            name: name("NI"),
            data: Bytes::from(vec![0u8; u16::MAX as usize]),
        };
        assert!(matches!(
            encode_to_bytes(&frame),
            Err(FrameError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn empty_body_frame_decodes_to_none() {
        let wire = [0x7E, 0x00, 0x00, 0xFF];
        assert!(crate::checksum::is_valid(&wire));
        assert_eq!(decode_frame(&wire), None);
    }
}
