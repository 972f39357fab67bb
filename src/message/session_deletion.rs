//! Session Deletion Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, OffendingIe};
use crate::ie::load_control::{LoadControlInformation, OverloadControlInformation};
use crate::ie::usage_report::UsageReportSdr;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Session Deletion Request: the session to delete is identified entirely by
/// the header SEID; no IEs are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDeletionRequest {
    pub header: Header,
    pub extras: Vec<Ie>,
}

impl SessionDeletionRequest {
    pub fn new(seid: u64, sequence: u32) -> Self {
        SessionDeletionRequest {
            header: Header::session(MsgType::SessionDeletionRequest, seid, sequence),
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
        for child in IeReader::new(body) {
            extras.push(child?.to_owned());
        }
        Ok(SessionDeletionRequest { header, extras })
    }
}

/// Session Deletion Response: final usage reports travel here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDeletionResponse {
    pub header: Header,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub usage_reports: Vec<UsageReportSdr>,
    pub load_control: Option<LoadControlInformation>,
    pub overload_control: Option<OverloadControlInformation>,
    pub extras: Vec<Ie>,
}

impl SessionDeletionResponse {
    pub fn new(seid: u64, sequence: u32, cause: Cause) -> Self {
        SessionDeletionResponse {
            header: Header::session(MsgType::SessionDeletionResponse, seid, sequence),
            cause,
            offending_ie: None,
            usage_reports: Vec::new(),
            load_control: None,
            overload_control: None,
            extras: Vec::new(),
        }
    }

    pub fn accepted(seid: u64, sequence: u32) -> Self {
        SessionDeletionResponse::new(seid, sequence, Cause::accepted())
    }

    pub fn rejected(
        seid: u64,
        sequence: u32,
        cause: Cause,
        offending_ie: Option<OffendingIe>,
    ) -> Self {
        let mut resp = SessionDeletionResponse::new(seid, sequence, cause);
        resp.offending_ie = offending_ie;
        resp
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.cause.encode(w)?;
            if let Some(off) = &self.offending_ie {
                off.encode(w)?;
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
                    "Session Deletion Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "Session Deletion Response",
                ),
                IeType::UsageReportWithinSessionDeletionResponse => {
                    usage_reports.push(UsageReportSdr::parse(child.body)?)
                }
                IeType::LoadControlInformation => put_slot(
                    &mut load_control,
                    LoadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Deletion Response",
                ),
                IeType::OverloadControlInformation => put_slot(
                    &mut overload_control,
                    OverloadControlInformation::parse(child.body)?,
                    child.ie_type,
                    "Session Deletion Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(SessionDeletionResponse {
            header,
            cause: cause.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Cause,
                parent: None,
            })?,
            offending_ie,
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
    use crate::ie::rule_ids::UrrId;
    use crate::ie::usage::{DurationMeasurement, UrSeqn, UsageReportTrigger};
    use crate::ie::usage_report::UsageReport;

    const SEID: u64 = 0x0102_0304_0506_0708;

    #[test]
    fn request_round_trip() {
        let req = SessionDeletionRequest::new(SEID, 400);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = SessionDeletionRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.header.seid, Some(SEID));
    }

    #[test]
    fn response_with_final_usage() {
        let mut report = UsageReport::new(UrrId::new(1), UrSeqn::new(9), UsageReportTrigger::TERMR);
        report.duration_measurement = Some(DurationMeasurement::new(3600));
        let mut resp = SessionDeletionResponse::accepted(SEID, 400);
        resp.usage_reports.push(UsageReportSdr(report));
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = SessionDeletionResponse::parse(w.written()).unwrap();
        assert_eq!(parsed, resp);
        assert_eq!(
            parsed.usage_reports[0].0.trigger,
            UsageReportTrigger::TERMR
        );
    }

    #[test]
    fn cause_mandatory_in_response() {
        let data = {
            let req = SessionDeletionRequest::new(SEID, 1);
            let mut buf = vec![0u8; 64];
            let mut w = Writer::new(&mut buf);
            req.encode(&mut w).unwrap();
            let mut bytes = w.written().to_vec();
            bytes[1] = MsgType::SessionDeletionResponse.code();
            bytes
        };
        assert!(matches!(
            SessionDeletionResponse::parse(&data),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Cause,
                ..
            })
        ));
    }
}
