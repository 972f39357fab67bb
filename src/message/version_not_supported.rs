//! Version Not Supported Response message.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::Ie;
use crate::message::{encode_message, message_body, Header, MsgType};

/// Version Not Supported Response: header only, echoing the sequence of the
/// datagram that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNotSupportedResponse {
    pub header: Header,
    pub extras: Vec<Ie>,
}

impl VersionNotSupportedResponse {
    pub fn new(sequence: u32) -> Self {
        VersionNotSupportedResponse {
            header: Header::node(MsgType::VersionNotSupportedResponse, sequence),
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            for ie in &self.extras {
                ie.encode(w)?;
            }
            Ok(())
        })
    }

    pub fn parse(data: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(data);
        let (header, body_len) = Header::decode(&mut r)?;
        let body = message_body(&mut r, body_len)?;
        let mut extras = Vec::new();
        for child in crate::ie::IeReader::new(body) {
            extras.push(child?.to_owned());
        }
        Ok(VersionNotSupportedResponse { header, extras })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout() {
        let resp = VersionNotSupportedResponse::new(0x0000_99);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        assert_eq!(
            w.written(),
            &[0x20, 0x0B, 0x00, 0x04, 0x00, 0x00, 0x99, 0x00]
        );
        assert_eq!(VersionNotSupportedResponse::parse(w.written()).unwrap(), resp);
    }
}
