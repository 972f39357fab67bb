//! Association Release Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::Cause;
use crate::ie::node_id::NodeId;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Association Release Request: tears down the node-level association and,
/// implicitly, every session under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationReleaseRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub extras: Vec<Ie>,
}

impl AssociationReleaseRequest {
    pub fn new(sequence: u32, node_id: NodeId) -> Self {
        AssociationReleaseRequest {
            header: Header::node(MsgType::AssociationReleaseRequest, sequence),
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
                    "Association Release Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(AssociationReleaseRequest {
            header,
            node_id: node_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::NodeId,
                parent: None,
            })?,
            extras,
        })
    }
}

/// Association Release Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationReleaseResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub extras: Vec<Ie>,
}

impl AssociationReleaseResponse {
    pub fn new(sequence: u32, node_id: NodeId, cause: Cause) -> Self {
        AssociationReleaseResponse {
            header: Header::node(MsgType::AssociationReleaseResponse, sequence),
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
                    "Association Release Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Association Release Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(AssociationReleaseResponse {
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
    fn release_round_trip() {
        let req = AssociationReleaseRequest::new(3, NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)));
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(AssociationReleaseRequest::parse(w.written()).unwrap(), req);

        let resp = AssociationReleaseResponse::new(
            3,
            NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 2)),
            Cause::accepted(),
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        assert_eq!(AssociationReleaseResponse::parse(w.written()).unwrap(), resp);
    }
}
