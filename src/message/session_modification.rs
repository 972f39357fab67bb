//! Session Modification Request and Response messages.

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
use crate::ie::query_urr::QueryUrr;
use crate::ie::remove_rules::{RemoveFar, RemovePdr, RemoveQer, RemoveUrr};
use crate::ie::update_rules::{UpdateFar, UpdatePdr, UpdateQer, UpdateUrr};
use crate::ie::usage_report::UsageReportSmr;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Session Modification Request: every IE is optional; the message is a
/// batch of remove/create/update operations plus usage queries against an
/// established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionModificationRequest {
    pub header: Header,
    pub cp_fseid: Option<Fseid>,
    pub remove_pdrs: Vec<RemovePdr>,
    pub remove_fars: Vec<RemoveFar>,
    pub remove_urrs: Vec<RemoveUrr>,
    pub remove_qers: Vec<RemoveQer>,
    pub create_pdrs: Vec<CreatePdr>,
    pub create_fars: Vec<CreateFar>,
    pub create_urrs: Vec<CreateUrr>,
    pub create_qers: Vec<CreateQer>,
    pub update_pdrs: Vec<UpdatePdr>,
    pub update_fars: Vec<UpdateFar>,
    pub update_urrs: Vec<UpdateUrr>,
    pub update_qers: Vec<UpdateQer>,
    pub query_urrs: Vec<QueryUrr>,
    pub extras: Vec<Ie>,
}

impl SessionModificationRequest {
    pub fn new(seid: u64, sequence: u32) -> Self {
        Self::with_header(Header::session(
            MsgType::SessionModificationRequest,
            seid,
            sequence,
        ))
    }

    fn with_header(header: Header) -> Self {
        SessionModificationRequest {
            header,
            cp_fseid: None,
            remove_pdrs: Vec::new(),
            remove_fars: Vec::new(),
            remove_urrs: Vec::new(),
            remove_qers: Vec::new(),
            create_pdrs: Vec::new(),
            create_fars: Vec::new(),
            create_urrs: Vec::new(),
            create_qers: Vec::new(),
            update_pdrs: Vec::new(),
            update_fars: Vec::new(),
            update_urrs: Vec::new(),
            update_qers: Vec::new(),
            query_urrs: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            if let Some(fseid) = &self.cp_fseid {
                fseid.encode(w)?;
            }
            for ie in &self.remove_pdrs {
                ie.encode(w)?;
            }
            for ie in &self.remove_fars {
                ie.encode(w)?;
            }
            for ie in &self.remove_urrs {
                ie.encode(w)?;
            }
            for ie in &self.remove_qers {
                ie.encode(w)?;
            }
            for ie in &self.create_pdrs {
                ie.encode(w)?;
            }
            for ie in &self.create_fars {
                ie.encode(w)?;
            }
            for ie in &self.create_urrs {
                ie.encode(w)?;
            }
            for ie in &self.create_qers {
                ie.encode(w)?;
            }
            for ie in &self.update_pdrs {
                ie.encode(w)?;
            }
            for ie in &self.update_fars {
                ie.encode(w)?;
            }
            for ie in &self.update_urrs {
                ie.encode(w)?;
            }
            for ie in &self.update_qers {
                ie.encode(w)?;
            }
            for ie in &self.query_urrs {
                ie.encode(w)?;
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
        let mut msg = SessionModificationRequest::with_header(header);
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::Fseid => put_slot(
                    &mut msg.cp_fseid,
                    Fseid::parse(child.body)?,
                    child.ie_type,
                    "Session Modification Request",
                ),
                IeType::RemovePdr => msg.remove_pdrs.push(RemovePdr::parse(child.body)?),
                IeType::RemoveFar => msg.remove_fars.push(RemoveFar::parse(child.body)?),
                IeType::RemoveUrr => msg.remove_urrs.push(RemoveUrr::parse(child.body)?),
                IeType::RemoveQer => msg.remove_qers.push(RemoveQer::parse(child.body)?),
                IeType::CreatePdr => msg.create_pdrs.push(CreatePdr::parse(child.body)?),
                IeType::CreateFar => msg.create_fars.push(CreateFar::parse(child.body)?),
                IeType::CreateUrr => msg.create_urrs.push(CreateUrr::parse(child.body)?),
                IeType::CreateQer => msg.create_qers.push(CreateQer::parse(child.body)?),
                IeType::UpdatePdr => msg.update_pdrs.push(UpdatePdr::parse(child.body)?),
                IeType::UpdateFar => msg.update_fars.push(UpdateFar::parse(child.body)?),
                IeType::UpdateUrr => msg.update_urrs.push(UpdateUrr::parse(child.body)?),
                IeType::UpdateQer => msg.update_qers.push(UpdateQer::parse(child.body)?),
                IeType::QueryUrr => msg.query_urrs.push(QueryUrr::parse(child.body)?),
                _ => msg.extras.push(child.to_owned()),
            }
        }
        Ok(msg)
    }
}

/// Session Modification Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionModificationResponse {
    pub header: Header,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub created_pdrs: Vec<CreatedPdr>,
    pub usage_reports: Vec<UsageReportSmr>,
    pub load_control: Option<LoadControlInformation>,
    pub overload_control: Option<OverloadControlInformation>,
    pub extras: Vec<Ie>,
}

impl SessionModificationResponse {
    pub fn new(seid: u64, sequence: u32, cause: Cause) -> Self {
        SessionModificationResponse {
            header: Header::session(MsgType::SessionModificationResponse, seid, sequence),
            cause,
            offending_ie: None,
            created_pdrs: Vec::new(),
            usage_reports: Vec::new(),
            load_control: None,
            overload_control: None,
            extras: Vec::new(),
        }
    }

    pub fn accepted(seid: u64, sequence: u32) -> Self {
        SessionModificationResponse::new(seid, sequence, Cause::accepted())
    }

    pub fn rejected(
        seid: u64,
        sequence: u32,
        cause: Cause,
        offending_ie: Option<OffendingIe>,
    ) -> Self {
        let mut resp = SessionModificationResponse::new(seid, sequence, cause);
        resp.offending_ie = offending_ie;
        resp
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.cause.encode(w)?;
            if let Some(off) = &self.offending_ie {
                off.encode(w)?;
            }
            for created in &self.created_pdrs {
                created.encode(w)?;
            }
            for report in &self.usage_reports {
                report.encode(w)?;
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
        let mut cause = None;
        let mut offending_ie = None;
        let mut created_pdrs = Vec::new();
        let mut usage_reports = Vec::new();
        let mut load_control = None;
        let mut overload_control = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Session Modification Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "Session Modification Response",
                ),
                IeType::CreatedPdr => created_pdrs.push(CreatedPdr::parse(child.body)?),
                IeType::UsageReportWithinSessionModificationResponse => {
                    usage_reports.push(UsageReportSmr::parse(child.body)?)
                }
                IeType::LoadControlInformation => put_slot(
                    &mut load_control,
                    LoadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Modification Response",
                ),
                IeType::OverloadControlInformation => put_slot(
                    &mut overload_control,
                    OverloadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Modification Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(SessionModificationResponse {
            header,
            cause: cause.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Cause,
                parent: None,
            })?,
            offending_ie,
            created_pdrs,
            usage_reports,
            load_control,
            overload_control,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::create_far::ApplyAction;
    use crate::ie::qos::GateStatus;
    use crate::ie::rule_ids::{FarId, PdrId, QerId, UrrId};
    use crate::ie::update_rules::UpdateQer;
    use std::net::Ipv4Addr;

    const SEID: u64 = 0xAA55_AA55_AA55_AA55;

    #[test]
    fn batch_round_trip() {
        let mut req = SessionModificationRequest::new(SEID, 300);
        req.cp_fseid = Some(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)));
        req.remove_pdrs.push(RemovePdr::new(PdrId::new(1)));
        req.remove_fars.push(RemoveFar::new(FarId::new(1)));
        req.create_fars
            .push(CreateFar::new(FarId::new(9), ApplyAction::DROP));
        let mut update_qer = UpdateQer::new(QerId::new(2));
        update_qer.gate_status = Some(GateStatus::closed());
        req.update_qers.push(update_qer);
        req.query_urrs.push(QueryUrr::new(UrrId::new(3)));

        let mut buf = [0u8; 512];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = SessionModificationRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.remove_pdrs.len(), 1);
        assert_eq!(parsed.query_urrs[0].urr_id, UrrId::new(3));
    }

    #[test]
    fn empty_request_is_legal() {
        let req = SessionModificationRequest::new(SEID, 301);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(SessionModificationRequest::parse(w.written()).unwrap(), req);
    }

    #[test]
    fn response_with_usage_report() {
        use crate::ie::usage::{UrSeqn, UsageReportTrigger};
        use crate::ie::usage_report::UsageReport;

        let mut resp = SessionModificationResponse::accepted(SEID, 300);
        resp.usage_reports.push(UsageReportSmr(UsageReport::new(
            UrrId::new(3),
            UrSeqn::new(1),
            UsageReportTrigger::IMMER,
        )));
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = SessionModificationResponse::parse(w.written()).unwrap();
        assert_eq!(parsed, resp);
        assert_eq!(parsed.usage_reports.len(), 1);
    }
}
