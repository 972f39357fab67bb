//! Association Update Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::Cause;
use crate::ie::features::{CpFunctionFeatures, UpFunctionFeatures};
use crate::ie::node_id::NodeId;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Association Update Request: advertises changed node capabilities within
/// an existing association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationUpdateRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub up_function_features: Option<UpFunctionFeatures>,
    pub cp_function_features: Option<CpFunctionFeatures>,
    pub extras: Vec<Ie>,
}

impl AssociationUpdateRequest {
    pub fn new(sequence: u32, node_id: NodeId) -> Self {
        AssociationUpdateRequest {
            header: Header::node(MsgType::AssociationUpdateRequest, sequence),
            node_id,
            up_function_features: None,
            cp_function_features: None,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            if let Some(f) = &self.up_function_features {
                f.encode(w)?;
            }
            if let Some(f) = &self.cp_function_features {
                f.encode(w)?;
            }
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
        let mut up_function_features = None;
        let mut cp_function_features = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Association Update Request",
                ),
                IeType::UpFunctionFeatures => put_slot(
                    &mut up_function_features,
                    UpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Update Request",
                ),
                IeType::CpFunctionFeatures => put_slot(
                    &mut cp_function_features,
                    CpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Update Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(AssociationUpdateRequest {
            header,
            node_id: node_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::NodeId,
                parent: None,
            })?,
            up_function_features,
            cp_function_features,
            extras,
        })
    }
}

/// Association Update Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationUpdateResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub extras: Vec<Ie>,
}

impl AssociationUpdateResponse {
    pub fn new(sequence: u32, node_id: NodeId, cause: Cause) -> Self {
        AssociationUpdateResponse {
            header: Header::node(MsgType::AssociationUpdateResponse, sequence),
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
                    "Association Update Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Association Update Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(AssociationUpdateResponse {
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
    fn request_round_trip() {
        let mut req = AssociationUpdateRequest::new(9, NodeId::Ipv4(Ipv4Addr::new(10, 1, 1, 1)));
        req.cp_function_features = Some(CpFunctionFeatures::LOAD);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(AssociationUpdateRequest::parse(w.written()).unwrap(), req);
    }

    #[test]
    fn response_round_trip() {
        let resp = AssociationUpdateResponse::new(
            9,
            NodeId::Ipv4(Ipv4Addr::new(10, 1, 1, 2)),
            Cause::accepted(),
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        assert_eq!(AssociationUpdateResponse::parse(w.written()).unwrap(), resp);
    }
}
