//! Node Report Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, OffendingIe};
use crate::ie::node_id::NodeId;
use crate::ie::reports::{GtpuPathQosReport, NodeReportType, UserPlanePathFailureReport};
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Node Report Request: UP-initiated node-level reporting (path failures,
/// GTP-U path QoS measurements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReportRequest {
    pub header: Header,
    pub node_id: NodeId,
    pub node_report_type: NodeReportType,
    pub path_failure_report: Option<UserPlanePathFailureReport>,
    pub gtpu_path_qos_reports: Vec<GtpuPathQosReport>,
    pub extras: Vec<Ie>,
}

impl NodeReportRequest {
    pub fn new(sequence: u32, node_id: NodeId, node_report_type: NodeReportType) -> Self {
        NodeReportRequest {
            header: Header::node(MsgType::NodeReportRequest, sequence),
            node_id,
            node_report_type,
            path_failure_report: None,
            gtpu_path_qos_reports: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
            self.node_report_type.encode(w)?;
            if let Some(report) = &self.path_failure_report {
                report.encode(w)?;
            }
            for report in &self.gtpu_path_qos_reports {
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
        let mut node_id = None;
        let mut node_report_type = None;
        let mut path_failure_report = None;
        let mut gtpu_path_qos_reports = Vec::new();
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Node Report Request",
                ),
                IeType::NodeReportType => put_slot(
                    &mut node_report_type,
                    NodeReportType::parse(child.body)?,
                    child.ie_type,
                    "Node Report Request",
                ),
                IeType::UserPlanePathFailureReport => put_slot(
                    &mut path_failure_report,
                    UserPlanePathFailureReport::parse(child.body)?,
                    child.ie_type,
                    "Node Report Request",
                ),
                IeType::GtpuPathQosReport => {
                    gtpu_path_qos_reports.push(GtpuPathQosReport::parse(child.body)?)
                }
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(NodeReportRequest {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            node_report_type: node_report_type.ok_or_else(|| missing(IeType::NodeReportType))?,
            path_failure_report,
            gtpu_path_qos_reports,
            extras,
        })
    }
}

/// Node Report Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReportResponse {
    pub header: Header,
    pub node_id: NodeId,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub extras: Vec<Ie>,
}

impl NodeReportResponse {
    pub fn new(sequence: u32, node_id: NodeId, cause: Cause) -> Self {
        NodeReportResponse {
            header: Header::node(MsgType::NodeReportResponse, sequence),
            node_id,
            cause,
            offending_ie: None,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.node_id.encode(w)?;
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
        let mut node_id = None;
        let mut cause = None;
        let mut offending_ie = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::NodeId => put_slot(
                    &mut node_id,
                    NodeId::parse(child.body)?,
                    child.ie_type,
                    "Node Report Response",
                ),
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "Node Report Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "Node Report Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: None,
        };
        Ok(NodeReportResponse {
            header,
            node_id: node_id.ok_or_else(|| missing(IeType::NodeId))?,
            cause: cause.ok_or_else(|| missing(IeType::Cause))?,
            offending_ie,
            extras,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::reports::{QosInformation, RemoteGtpuPeer};
    use std::net::Ipv4Addr;

    #[test]
    fn path_failure_report_round_trip() {
        let mut req = NodeReportRequest::new(
            55,
            NodeId::Ipv4(Ipv4Addr::new(10, 2, 0, 1)),
            NodeReportType::UPFR,
        );
        req.path_failure_report = Some(UserPlanePathFailureReport {
            remote_gtpu_peers: vec![RemoteGtpuPeer::ipv4(Ipv4Addr::new(198, 51, 100, 9))],
        });
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(NodeReportRequest::parse(w.written()).unwrap(), req);
    }

    #[test]
    fn qos_report_round_trip() {
        let mut req = NodeReportRequest::new(
            56,
            NodeId::Ipv4(Ipv4Addr::new(10, 2, 0, 1)),
            NodeReportType::GPQR,
        );
        req.gtpu_path_qos_reports.push(GtpuPathQosReport {
            remote_gtpu_peer: RemoteGtpuPeer::ipv4(Ipv4Addr::new(203, 0, 113, 1)),
            qos_information: vec![QosInformation::new(15)],
        });
        let mut buf = [0u8; 256];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(NodeReportRequest::parse(w.written()).unwrap(), req);
    }

    #[test]
    fn response_round_trip() {
        let resp = NodeReportResponse::new(
            55,
            NodeId::Ipv4(Ipv4Addr::new(10, 2, 0, 2)),
            Cause::accepted(),
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        resp.encode(&mut w).unwrap();
        assert_eq!(NodeReportResponse::parse(w.written()).unwrap(), resp);
    }
}
