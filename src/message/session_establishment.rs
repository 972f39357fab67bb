//! Session Establishment Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, OffendingIe};
use crate::ie::create_far::CreateFar;
use crate::ie::create_pdr::CreatePdr;
use crate::ie::create_qer::CreateQer;
use crate::ie::create_urr::CreateUrr;
use crate::ie::created_pdr::CreatedPdr;
use crate::ie::f_seid::Fseid;
use crate::ie::load_control::{LoadControlInformation, OverloadControlInformation};
use crate::ie::node_id::NodeId;
use crate::ie::pdn::PdnType;
use crate::ie::traffic_endpoint::CreateTrafficEndpoint;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Session Establishment Request: creates a session and installs its initial
/// rule set on the UP function. The header SEID is 0 on the very first
/// request; the CP F-SEID tells the peer where to address the session
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEstablishmentRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub cp_fseid: Fseid,
    pub create_pdrs: Vec<CreatePdr>,
    pub create_fars: Vec<CreateFar>,
    pub create_urrs: Vec<CreateUrr>,
    pub create_qers: Vec<CreateQer>,
    pub create_traffic_endpoints: Vec<CreateTrafficEndpoint>,
    pub pdn_type: Option<PdnType>,
    pub extras: Vec<Ie>,
}

impl SessionEstablishmentRequest {
    pub fn new(seid: u64, sequence: u32, node_id: NodeId, cp_fseid: Fseid) -> Self {
        SessionEstablishmentRequest {
            header: Header::session(MsgType::SessionEstablishmentRequest, seid, sequence),
            node_id,
            cp_fseid,
            create_pdrs: Vec::new(),
            create_fars: Vec::new(),
            create_urrs: Vec::new(),
            create_qers: Vec::new(),
            create_traffic_endpoints: Vec::new(),
            pdn_type: None,
            extras: Vec::new(),
        }
    }

    pub fn builder(seid: u64, sequence: u32) -> SessionEstablishmentRequestBuilder {
        SessionEstablishmentRequestBuilder::new(seid, sequence)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.cp_fseid.encode(w)?;
            for pdr in &self.create_pdrs {
                pdr.encode(w)?;
            }
            for far in &self.create_fars {
                far.encode(w)?;
            }
            for urr in &self.create_urrs {
                urr.encode(w)?;
            }
            for qer in &self.create_qers {
                qer.encode(w)?;
            }
            for te in &self.create_traffic_endpoints {
                te.encode(w)?;
            }
            if let Some(pdn) = &self.pdn_type {
                pdn.encode(w)?;
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
        let mut cp_fseid = None;
        let mut create_pdrs = Vec::new();
        let mut create_fars = Vec::new();
        let mut create_urrs = Vec::new();
        let mut create_qers = Vec::new();
        let mut create_traffic_endpoints = Vec::new();
        let mut pdn_type = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Request",
                ),
                IeType::Fseid => put_slot(
                    &mut cp_fseid,
                    Fseid::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Request",
                ),
                IeType::CreatePdr => create_pdrs.push(CreatePdr::parse(child.body)?),
                IeType::CreateFar => create_fars.push(CreateFar::parse(child.body)?),
                IeType::CreateUrr => create_urrs.push(CreateUrr::parse(child.body)?),
                IeType::CreateQer => create_qers.push(CreateQer::parse(child.body)?),
                IeType::CreateTrafficEndpoint => {
                    create_traffic_endpoints.push(CreateTrafficEndpoint::parse(child.body)?)
                }
                IeType::PdnType => put_slot(
                    &mut pdn_type,
                    PdnType::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(SessionEstablishmentRequest {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cp_fseid: cp_fseid.ok_or_else(|| missing(IeType::Fseid))?,
            create_pdrs,
            create_fars,
            create_urrs,
            create_qers,
            create_traffic_endpoints,
            pdn_type,
            extras,
        })
    }
}

/// Builder for [`SessionEstablishmentRequest`] enforcing the mandatory
/// Node ID and CP F-SEID before anything hits the wire.
#[derive(Debug, Default)]
pub struct SessionEstablishmentRequestBuilder {
    seid: u64,
    sequence: u32,
    node_id: Option<NodeId>,
    cp_fseid: Option<Fseid>,
    create_pdrs: Vec<CreatePdr>,
    create_fars: Vec<CreateFar>,
    create_urrs: Vec<CreateUrr>,
    create_qers: Vec<CreateQer>,
    create_traffic_endpoints: Vec<CreateTrafficEndpoint>,
    pdn_type: Option<PdnType>,
}

impl SessionEstablishmentRequestBuilder {
    pub fn new(seid: u64, sequence: u32) -> Self {
        SessionEstablishmentRequestBuilder {
            seid,
            sequence,
            ..Default::default()
        }
    }

    pub fn node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn cp_fseid(mut self, fseid: Fseid) -> Self {
        self.cp_fseid = Some(fseid);
        self
    }

    pub fn create_pdr(mut self, pdr: CreatePdr) -> Self {
        self.create_pdrs.push(pdr);
        self
    }

    pub fn create_far(mut self, far: CreateFar) -> Self {
        self.create_fars.push(far);
        self
    }

    pub fn create_urr(mut self, urr: CreateUrr) -> Self {
        self.create_urrs.push(urr);
        self
    }

    pub fn create_qer(mut self, qer: CreateQer) -> Self {
        self.create_qers.push(qer);
        self
    }

    pub fn create_traffic_endpoint(mut self, te: CreateTrafficEndpoint) -> Self {
        self.create_traffic_endpoints.push(te);
        self
    }

    pub fn pdn_type(mut self, pdn_type: PdnType) -> Self {
        self.pdn_type = Some(pdn_type);
        self
    }

    pub fn build(self) -> Result<SessionEstablishmentRequest, PfcpError> {
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(SessionEstablishmentRequest {
            header: Header::session(
                MsgType::SessionEstablishmentRequest,
                self.seid,
                self.sequence,
            ),
            node_id: self.node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cp_fseid: self.cp_fseid.ok_or_else(|| missing(IeType::Fseid))?,
            create_pdrs: self.create_pdrs,
            create_fars: self.create_fars,
            create_urrs: self.create_urrs,
            create_qers: self.create_qers,
            create_traffic_endpoints: self.create_traffic_endpoints,
            pdn_type: self.pdn_type,
            extras: Vec::new(),
        })
    }
}

/// Session Establishment Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEstablishmentResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub up_fseid: Option<Fseid>,
    pub created_pdrs: Vec<CreatedPdr>,
    pub load_control: Option<LoadControlInformation>,
    pub overload_control: Option<OverloadControlInformation>,
    pub extras: Vec<Ie>,
}

impl SessionEstablishmentResponse {
    pub fn new(seid: u64, sequence: u32, node_id: NodeId, cause: Cause) -> Self {
        SessionEstablishmentResponse {
            header: Header::session(MsgType::SessionEstablishmentResponse, seid, sequence),
            node_id,
            cause,
            offending_ie: None,
            up_fseid: None,
            created_pdrs: Vec::new(),
            load_control: None,
            overload_control: None,
            extras: Vec::new(),
        }
    }

    /// Accepted response carrying the UP function's F-SEID.
    pub fn accepted(seid: u64, sequence: u32, node_id: NodeId, up_fseid: Fseid) -> Self {
        let mut resp = SessionEstablishmentResponse::new(seid, sequence, node_id, Cause::accepted());
        resp.up_fseid = Some(up_fseid);
        resp
    }

    /// Rejection with the cause and, when applicable, the offending IE.
    ///
    /// The node id falls back to an unspecified IPv4 address; a UP function
    /// rejecting an unparseable request has nothing better to report.
    pub fn rejected(
        seid: u64,
        sequence: u32,
        cause: Cause,
        offending_ie: Option<OffendingIe>,
    ) -> Self {
        let mut resp = SessionEstablishmentResponse::new(
            seid,
            sequence,
            NodeId::Ipv4(std::net::Ipv4Addr::UNSPECIFIED),
            cause,
        );
        resp.offending_ie = offending_ie;
        resp
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.cause.encode(w)?;
            if let Some(off) = &self.offending_ie {
                off.encode(w)?;
            }
            if let Some(fseid) = &self.up_fseid {
                fseid.encode(w)?;
            }
            for created in &self.created_pdrs {
                created.encode(w)?;
            }
            if let Some(lci) = &self.load_control {
                lci.encode(w)?;
            }
            if let Some(oci) = &self.overload_control {
                oci.encode(w)?;
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
        let mut offending_ie = None;
        let mut up_fseid = None;
        let mut created_pdrs = Vec::new();
        let mut load_control = None;
        let mut overload_control = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                IeType::Fseid => put_slot(
                    &mut up_fseid,
                    Fseid::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                IeType::CreatedPdr => created_pdrs.push(CreatedPdr::parse(child.body)?),
                IeType::LoadControlInformation => put_slot(
                    &mut load_control,
                    LoadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                IeType::OverloadControlInformation => put_slot(
                    &mut overload_control,
                    OverloadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Establishment Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(SessionEstablishmentResponse {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cause: cause.ok_or_else(|| missing(IeType::Cause))?,
            offending_ie,
            up_fseid,
            created_pdrs,
            load_control,
            overload_control,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::create_far::{ApplyAction, ForwardingParameters};
    use crate::ie::f_teid::Fteid;
    use crate::ie::interface::DestinationInterface;
    use crate::ie::pdi::Pdi;
    use crate::ie::rule_ids::{FarId, PdrId, Precedence};
    use std::net::Ipv4Addr;

    const SEID: u64 = 0x1234_5678_90AB_CDEF;

    fn sample_request() -> SessionEstablishmentRequest {
        SessionEstablishmentRequest::builder(SEID, 200)
            .node_id(NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
            .cp_fseid(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)))
            .build()
            .unwrap()
    }

    #[test]
    fn request_header_carries_seid() {
        let req = sample_request();
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let bytes = w.written();
        assert_eq!(bytes[0], 0x21); // version 1, S flag
        assert_eq!(&bytes[4..12], &SEID.to_be_bytes());
        let parsed = SessionEstablishmentRequest::parse(bytes).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.header.seid, Some(SEID));
        assert_eq!(parsed.cp_fseid.seid, SEID);
    }

    #[test]
    fn request_with_rules_round_trip() {
        let pdr = CreatePdr::new(
            PdrId::new(1),
            Precedence::new(255),
            Pdi::uplink_access()
                .local_fteid(Fteid::choose(true, false))
                .build(),
        );
        let far = CreateFar::forward(
            FarId::new(1),
            ForwardingParameters::new(DestinationInterface::core()),
        );
        let req = SessionEstablishmentRequest::builder(SEID, 201)
            .node_id(NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
            .cp_fseid(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)))
            .create_pdr(pdr)
            .create_far(far)
            .build()
            .unwrap();
        let mut buf = [0u8; 512];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = SessionEstablishmentRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.create_pdrs.len(), 1);
        assert_eq!(parsed.create_fars[0].apply_action, ApplyAction::FORW);
    }

    #[test]
    fn missing_fseid_is_reported_with_type() {
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        encode_message(
            &mut w,
            &Header::session(MsgType::SessionEstablishmentRequest, SEID, 1),
            |w| NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)).encode(w),
        )
        .unwrap();
        let err = SessionEstablishmentRequest::parse(w.written()).unwrap_err();
        assert!(matches!(
            err,
            PfcpError::MissingMandatoryIe {
                ie_type: IeType::Fseid,
                ..
            }
        ));
        assert_eq!(err.offending_ie(), Some(IeType::Fseid));
    }

    #[test]
    fn response_with_created_pdr_round_trip() {
        let mut resp = SessionEstablishmentResponse::accepted(
            SEID,
            200,
            NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 2)),
            Fseid::ipv4(0xBEEF, Ipv4Addr::new(10, 0, 0, 2)),
        );
        resp.created_pdrs.push(CreatedPdr::with_fteid(
            PdrId::new(1),
            Fteid::ipv4(0x1234_5678, Ipv4Addr::new(10, 0, 0, 1)),
        ));
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = SessionEstablishmentResponse::parse(w.written()).unwrap();
        assert_eq!(parsed, resp);
        assert_eq!(parsed.created_pdrs[0].pdr_id, PdrId::new(1));
        assert_eq!(
            parsed.created_pdrs[0].local_fteid.unwrap().teid,
            0x1234_5678
        );
    }

    #[test]
    fn rejected_response_carries_offending_ie() {
        let resp = SessionEstablishmentResponse::rejected(
            0,
            42,
            Cause::new(crate::ie::cause::CauseValue::MandatoryIeMissing),
            Some(OffendingIe::new(IeType::Fseid)),
        );
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = SessionEstablishmentResponse::parse(w.written()).unwrap();
        assert!(!parsed.cause.is_accepted());
        assert_eq!(parsed.offending_ie.unwrap().ie_type, IeType::Fseid);
    }
}
