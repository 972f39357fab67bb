//! Session Set Deletion Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::Cause;
use crate::ie::node_id::NodeId;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Session Set Deletion Request: drops every session associated with a
/// restarted peer in one exchange. A node message despite its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetDeletionRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub extras: Vec<Ie>,
}

impl SessionSetDeletionRequest {
    pub fn new(sequence: u32, node_id: NodeId) -> Self {
        SessionSetDeletionRequest {
            header: Header::node(MsgType::SessionSetDeletionRequest, sequence),
            node_id,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
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
        let mut node_id = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Session Set Deletion Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(SessionSetDeletionRequest {
            header,
            node_id: node_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::NodeId,
                parent: None,
            })?,
            extras,
        })
    }
}

/// Session Set Deletion Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetDeletionResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub extras: Vec<Ie>,
}

impl SessionSetDeletionResponse {
    pub fn new(sequence: u32, node_id: NodeId, cause: Cause) -> Self {
        SessionSetDeletionResponse {
            header: Header::node(MsgType::SessionSetDeletionResponse, sequence),
            node_id,
            cause,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.cause.encode(w)?;
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
        let mut node_id = None;
        let mut cause = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Session Set Deletion Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Session Set Deletion Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(SessionSetDeletionResponse {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cause: cause.ok_or_else(|| missing(IeType::Cause))?,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn round_trip() {
        let req = SessionSetDeletionRequest::new(77, NodeId::Ipv4(Ipv4Addr::new(10, 5, 5, 5)));
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(SessionSetDeletionRequest::parse(w.written()).unwrap(), req);

        let resp = SessionSetDeletionResponse::new(
            77,
            NodeId::Ipv4(Ipv4Addr::new(10, 5, 5, 6)),
            Cause::accepted(),
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        assert_eq!(SessionSetDeletionResponse::parse(w.written()).unwrap(), resp);
    }
}
