//! Session Report Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, OffendingIe};
use crate::ie::reports::{DownlinkDataReport, ErrorIndicationReport, ReportType};
use crate::ie::usage_report::UsageReportSrr;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Session Report Request: UP-initiated notification for a session, carrying
/// downlink data alerts, usage reports, or GTP-U error indications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReportRequest {
    pub header: Header,
    pub report_type: ReportType,
    pub downlink_data_report: Option<DownlinkDataReport>,
    pub usage_reports: Vec<UsageReportSrr>,
    pub error_indication_report: Option<ErrorIndicationReport>,
    pub extras: Vec<Ie>,
}

impl SessionReportRequest {
    pub fn new(seid: u64, sequence: u32, report_type: ReportType) -> Self {
        SessionReportRequest {
            header: Header::session(MsgType::SessionReportRequest, seid, sequence),
            report_type,
            downlink_data_report: None,
            usage_reports: Vec::new(),
            error_indication_report: None,
            extras: Vec::new(),
        }
    }

    /// Downlink-data notification for one PDR.
    pub fn downlink_data(seid: u64, sequence: u32, report: DownlinkDataReport) -> Self {
        let mut msg = SessionReportRequest::new(seid, sequence, ReportType::DLDR);
        msg.downlink_data_report = Some(report);
        msg
    }

    /// Usage reporting for one or more URRs.
    pub fn usage(seid: u64, sequence: u32, reports: Vec<UsageReportSrr>) -> Self {
        let mut msg = SessionReportRequest::new(seid, sequence, ReportType::USAR);
        msg.usage_reports = reports;
        msg
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.report_type.encode(w)?;
            if let Some(report) = &self.downlink_data_report {
                report.encode(w)?;
            }
            for report in &self.usage_reports {
                report.encode(w)?;
            }
            if let Some(report) = &self.error_indication_report {
                report.encode(w)?;
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
        let mut report_type = None;
        let mut downlink_data_report = None;
        let mut usage_reports = Vec::new();
        let mut error_indication_report = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::ReportType => put_slot(
                    &mut report_type,
                    ReportType::parse(child.body)?,
                    child.ie_type,
                    "Session Report Request",
                ),
                IeType::DownlinkDataReport => put_slot(
                    &mut downlink_data_report,
                    DownlinkDataReport::parse(child.body)?,
                    child.ie_type,
                    "Session Report Request",
                ),
                IeType::UsageReportWithinSessionReportRequest => {
                    usage_reports.push(UsageReportSrr::parse(child.body)?)
                }
                IeType::ErrorIndicationReport => put_slot(
                    &mut error_indication_report,
                    ErrorIndicationReport::parse(child.body)?,
                    child.ie_type,
                    "Session Report Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(SessionReportRequest {
            header,
            report_type: report_type.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::ReportType,
                parent: None,
            })?,
            downlink_data_report,
            usage_reports,
            error_indication_report,
            extras,
        })
    }
}

/// Session Report Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReportResponse {
    pub header: Header,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub extras: Vec<Ie>,
}

impl SessionReportResponse {
    pub fn new(seid: u64, sequence: u32, cause: Cause) -> Self {
        SessionReportResponse {
            header: Header::session(MsgType::SessionReportResponse, seid, sequence),
            cause,
            offending_ie: None,
            extras: Vec::new(),
        }
    }

    pub fn accepted(seid: u64, sequence: u32) -> Self {
        SessionReportResponse::new(seid, sequence, Cause::accepted())
    }

    pub fn rejected(
        seid: u64,
        sequence: u32,
        cause: Cause,
        offending_ie: Option<OffendingIe>,
    ) -> Self {
        let mut resp = SessionReportResponse::new(seid, sequence, cause);
        resp.offending_ie = offending_ie;
        resp
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.cause.encode(w)?;
            if let Some(off) = &self.offending_ie {
                off.encode(w)?;
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
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Session Report Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "Session Report Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(SessionReportResponse {
            header,
            cause: cause.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Cause,
                parent: None,
            })?,
            offending_ie,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::rule_ids::{PdrId, UrrId};
    use crate::ie::usage::{UrSeqn, UsageReportTrigger, VolumeFields, VolumeMeasurement};
    use crate::ie::usage_report::UsageReport;

    const SEID: u64 = 0xDDEE_FF00_1122_3344;

    #[test]
    fn downlink_data_round_trip() {
        let req = SessionReportRequest::downlink_data(
            SEID,
            500,
            DownlinkDataReport::for_pdr(PdrId::new(4)),
        );
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = SessionReportRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
        assert_eq!(parsed.report_type, ReportType::DLDR);
    }

    #[test]
    fn usage_report_round_trip() {
        let mut report = UsageReport::new(UrrId::new(7), UrSeqn::new(2), UsageReportTrigger::VOLQU);
        report.volume_measurement = Some(VolumeMeasurement::new(VolumeFields {
            total: Some(5_000_000),
            uplink: Some(1_000_000),
            downlink: Some(4_000_000),
        }));
        let req = SessionReportRequest::usage(SEID, 501, vec![UsageReportSrr(report)]);
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let parsed = SessionReportRequest::parse(w.written()).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn report_type_mandatory() {
        let data = [0x21, 56, 0x00, 0x0C, 0, 0, 0, 0, 0, 0, 0, 1, 0x00, 0x01, 0xF5, 0x00];
        assert!(matches!(
            SessionReportRequest::parse(&data),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::ReportType,
                ..
            })
        ));
    }

    #[test]
    fn response_round_trip() {
        let resp = SessionReportResponse::accepted(SEID, 500);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        let parsed = SessionReportResponse::parse(w.written()).unwrap();
        assert_eq!(parsed, resp);
        assert!(parsed.cause.is_accepted());
    }
}
