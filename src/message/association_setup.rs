//! Association Setup Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::Cause;
use crate::ie::features::{CpFunctionFeatures, UpFunctionFeatures};
use crate::ie::node_id::NodeId;
use crate::ie::pdn::UserPlaneIpResourceInformation;
use crate::ie::recovery_time_stamp::RecoveryTimeStamp;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Association Setup Request: opens the node-level relationship under which
/// sessions can later be established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationSetupRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub recovery_time_stamp: RecoveryTimeStamp,
    pub up_function_features: Option<UpFunctionFeatures>,
    pub cp_function_features: Option<CpFunctionFeatures>,
    pub up_ip_resources: Vec<UserPlaneIpResourceInformation>,
    pub extras: Vec<Ie>,
}

impl AssociationSetupRequest {
    pub fn new(sequence: u32, node_id: NodeId, recovery_time_stamp: RecoveryTimeStamp) -> Self {
        AssociationSetupRequest {
            header: Header::node(MsgType::AssociationSetupRequest, sequence),
            node_id,
            recovery_time_stamp,
            up_function_features: None,
            cp_function_features: None,
            up_ip_resources: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.recovery_time_stamp.encode(w)?;
            if let Some(f) = &self.up_function_features {
                f.encode(w)?;
            }
            if let Some(f) = &self.cp_function_features {
                f.encode(w)?;
            }
            for res in &self.up_ip_resources {
                res.encode(w)?;
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
        let mut recovery_time_stamp = None;
        let mut up_function_features = None;
        let mut cp_function_features = None;
        let mut up_ip_resources = Vec::new();
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Request",
                ),
                IeType::RecoveryTimeStamp => put_slot(
                    &mut recovery_time_stamp,
                    RecoveryTimeStamp::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Request",
                ),
                IeType::UpFunctionFeatures => put_slot(
                    &mut up_function_features,
                    UpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Request",
                ),
                IeType::CpFunctionFeatures => put_slot(
                    &mut cp_function_features,
                    CpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Request",
                ),
                IeType::UserPlaneIpResourceInformation => {
                    up_ip_resources.push(UserPlaneIpResourceInformation::parse(child.body)?)
                }
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(AssociationSetupRequest {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            recovery_time_stamp: recovery_time_stamp
                .ok_or_else(|| missing(IeType::RecoveryTimeStamp))?,
            up_function_features,
            cp_function_features,
            up_ip_resources,
            extras,
        })
    }
}

/// Association Setup Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationSetupResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub recovery_time_stamp: RecoveryTimeStamp,
    pub up_function_features: Option<UpFunctionFeatures>,
    pub cp_function_features: Option<CpFunctionFeatures>,
    pub up_ip_resources: Vec<UserPlaneIpResourceInformation>,
    pub extras: Vec<Ie>,
}

impl AssociationSetupResponse {
    pub fn new(
        sequence: u32,
        node_id: NodeId,
        cause: Cause,
        recovery_time_stamp: RecoveryTimeStamp,
    ) -> Self {
        AssociationSetupResponse {
            header: Header::node(MsgType::AssociationSetupResponse, sequence),
            node_id,
            cause,
            recovery_time_stamp,
            up_function_features: None,
            cp_function_features: None,
            up_ip_resources: Vec::new(),
            extras: Vec::new(),
        }
    }

    /// Accepted response echoing the request sequence.
    pub fn accepted(
        sequence: u32,
        node_id: NodeId,
        recovery_time_stamp: RecoveryTimeStamp,
    ) -> Self {
        AssociationSetupResponse::new(sequence, node_id, Cause::accepted(), recovery_time_stamp)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.cause.encode(w)?;
            self.recovery_time_stamp.encode(w)?;
            if let Some(f) = &self.up_function_features {
                f.encode(w)?;
            }
            if let Some(f) = &self.cp_function_features {
                f.encode(w)?;
            }
            for res in &self.up_ip_resources {
                res.encode(w)?;
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
        let mut cause = None;
        let mut recovery_time_stamp = None;
        let mut up_function_features = None;
        let mut cp_function_features = None;
        let mut up_ip_resources = Vec::new();
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Response",
                ),
                IeType::RecoveryTimeStamp => put_slot(
                    &mut recovery_time_stamp,
                    RecoveryTimeStamp::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Response",
                ),
                IeType::UpFunctionFeatures => put_slot(
                    &mut up_function_features,
                    UpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Response",
                ),
                IeType::CpFunctionFeatures => put_slot(
                    &mut cp_function_features,
                    CpFunctionFeatures::parse(child.body)?,
                    child.ie_type,
                    "Association Setup Response",
                ),
                IeType::UserPlaneIpResourceInformation => {
                    up_ip_resources.push(UserPlaneIpResourceInformation::parse(child.body)?)
                }
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(AssociationSetupResponse {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cause: cause.ok_or_else(|| missing(IeType::Cause))?,
            recovery_time_stamp: recovery_time_stamp
                .ok_or_else(|| missing(IeType::RecoveryTimeStamp))?,
            up_function_features,
            cp_function_features,
            up_ip_resources,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ntp;
    use std::net::Ipv4Addr;

    #[test]
    fn request_round_trip() {
        let mut req = AssociationSetupRequest::new(
            100,
            NodeId::Ipv4(Ipv4Addr::new(192, 168, 1, 1)),
            RecoveryTimeStamp::new(ntp::from_ntp(0x8765_4321)),
        );
        req.up_function_features = Some(UpFunctionFeatures::FTUP | UpFunctionFeatures::BUCP);
        req.up_ip_resources
            .push(UserPlaneIpResourceInformation::ipv4(Ipv4Addr::new(
                10, 0, 0, 10,
            )));
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = AssociationSetupRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.header.sequence, 100);
    }

    #[test]
    fn response_round_trip() {
        let resp = AssociationSetupResponse::accepted(
            100,
            NodeId::fqdn("upf1.example.org"),
            RecoveryTimeStamp::new(ntp::from_ntp(0x8765_4321)),
        );
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = AssociationSetupResponse::parse(w.written()).unwrap();
        assert_eq!(parsed, resp);
        assert!(parsed.cause.is_accepted());
    }

    #[test]
    fn request_missing_node_id() {
        let rts = RecoveryTimeStamp::new(ntp::from_ntp(0x8765_4321));
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        encode_message(
            &mut w,
            &Header::node(MsgType::AssociationSetupRequest, 1),
            |w| rts.encode(w),
        )
        .unwrap();
        assert!(matches!(
            AssociationSetupRequest::parse(w.written()),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::NodeId,
                ..
            })
        ));
    }
}
