//! PFCP message header codec.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::message::MsgType;

const SEQUENCE_MASK: u32 = 0x00FF_FFFF;

/// PFCP message header: 8 octets, or 16 when a SEID is carried.
///
/// The S flag is implied by `seid.is_some()`. The message length field only
/// exists on the wire; it is reserved at encode time and back-patched once
/// the IEs are written, and turned into a body length at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub mp: bool,
    pub message_type: MsgType,
    pub seid: Option<u64>,
    /// 24-bit sequence number.
    pub sequence: u32,
    /// Message priority nibble when MP is set, spare otherwise.
    pub priority: u8,
}

impl Header {
    pub fn new(message_type: MsgType, seid: Option<u64>, sequence: u32) -> Self {
        Header {
            version: 1,
            mp: false,
            message_type,
            seid,
            sequence: sequence & SEQUENCE_MASK,
            priority: 0,
        }
    }

    /// Header for a node-level message (no SEID).
    pub fn node(message_type: MsgType, sequence: u32) -> Self {
        Header::new(message_type, None, sequence)
    }

    /// Header for a session-level message.
    pub fn session(message_type: MsgType, seid: u64, sequence: u32) -> Self {
        Header::new(message_type, Some(seid), sequence)
    }

    pub fn encoded_len(&self) -> usize {
        if self.seid.is_some() {
            16
        } else {
            8
        }
    }

    /// Writes the header with a zeroed length field and returns that field's
    /// position for back-patching. The contract is
    /// `message_length = bytes written since header start - 4`.
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<usize, PfcpError> {
        let flags = (self.version << 5) | ((self.mp as u8) << 1) | (self.seid.is_some() as u8);
        w.write_u8(flags)?;
        w.write_u8(self.message_type.code())?;
        let len_pos = w.skip(2)?;
        if let Some(seid) = self.seid {
            w.write_u64(seid)?;
        }
        w.write_u24(self.sequence & SEQUENCE_MASK)?;
        w.write_u8(self.priority)?;
        Ok(len_pos)
    }

    /// Decodes a header, rejecting any version other than 1. Returns the
    /// header and the number of IE body bytes the length field declares.
    pub fn decode(r: &mut Reader<'_>) -> Result<(Self, usize), PfcpError> {
        let (header, body_len) = Self::decode_lenient(r)?;
        if header.version != 1 {
            return Err(PfcpError::InvalidVersion(header.version));
        }
        Ok((header, body_len))
    }

    /// Decodes without the version check, so an endpoint can still recover
    /// the sequence number it must echo in a Version Not Supported Response.
    pub fn decode_lenient(r: &mut Reader<'_>) -> Result<(Self, usize), PfcpError> {
        let flags = r.read_u8()?;
        let version = flags >> 5;
        let mp = flags & 0x02 != 0;
        let s = flags & 0x01 != 0;
        let message_type = MsgType::from(r.read_u8()?);
        let length = r.read_u16()? as usize;
        let seid = if s { Some(r.read_u64()?) } else { None };
        let sequence = r.read_u24()?;
        let priority = r.read_u8()?;
        let header = Header {
            version,
            mp,
            message_type,
            seid,
            sequence,
            priority,
        };
        // The length field counts everything after the first 4 octets.
        let body_len = (length + 4)
            .checked_sub(header.encoded_len())
            .ok_or(PfcpError::InvalidLength {
                context: "message length",
                needed: header.encoded_len() - 4,
                remaining: length,
            })?;
        Ok((header, body_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_header_wire_layout() {
        let header = Header::node(MsgType::HeartbeatRequest, 42);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        let len_pos = header.encode(&mut w).unwrap();
        w.patch_u16(len_pos, 12);
        assert_eq!(
            w.written(),
            &[0x20, 0x01, 0x00, 0x0C, 0x00, 0x00, 0x2A, 0x00]
        );
    }

    #[test]
    fn session_header_wire_layout() {
        let header = Header::session(MsgType::SessionEstablishmentRequest, 0x1234_5678_90AB_CDEF, 200);
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        let len_pos = header.encode(&mut w).unwrap();
        w.patch_u16(len_pos, 12);
        let bytes = w.written();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 0x21); // version 1, S flag
        assert_eq!(bytes[1], 50);
        assert_eq!(&bytes[4..12], &0x1234_5678_90AB_CDEFu64.to_be_bytes());
        assert_eq!(&bytes[12..15], &[0x00, 0x00, 0xC8]);
    }

    #[test]
    fn decode_round_trip() {
        let header = Header::session(MsgType::SessionReportRequest, 7, 0xABCDEF);
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        let len_pos = header.encode(&mut w).unwrap();
        w.patch_u16(len_pos, 12); // no IEs: SEID + sequence + spare
        let (decoded, body_len) = Header::decode(&mut Reader::new(w.written())).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(body_len, 0);
    }

    #[test]
    fn sequence_is_masked_to_24_bits() {
        let header = Header::node(MsgType::HeartbeatRequest, 0xFF12_3456);
        assert_eq!(header.sequence, 0x0012_3456);
    }

    #[test]
    fn rejects_version_other_than_one() {
        let data = [0x40, 0x01, 0x00, 0x04, 0x00, 0x00, 0x01, 0x00];
        let err = Header::decode(&mut Reader::new(&data)).unwrap_err();
        assert!(matches!(err, PfcpError::InvalidVersion(2)));

        let (header, _) = Header::decode_lenient(&mut Reader::new(&data)).unwrap();
        assert_eq!(header.version, 2);
        assert_eq!(header.sequence, 1);
    }

    #[test]
    fn truncated_header_rejected() {
        let data = [0x20, 0x01, 0x00];
        assert!(Header::decode(&mut Reader::new(&data)).is_err());
    }

    #[test]
    fn length_field_shorter_than_header_rejected() {
        // S flag set but length claims only 2 bytes after octet 4.
        let mut data = vec![0x21, 50, 0x00, 0x02];
        data.extend_from_slice(&[0; 12]);
        assert!(matches!(
            Header::decode(&mut Reader::new(&data)),
            Err(PfcpError::InvalidLength { .. })
        ));
    }
}
