//! Reporting Information Elements: report types, downlink data reports,
//! error indications, path failures, and GTP-U path QoS reports.

use std::net::{Ipv4Addr, Ipv6Addr};

use bitflags::bitflags;

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::rule_ids::PdrId;
use crate::ie::{put_slot, scalar_ie, IeBody, IeReader, IeType};

bitflags! {
    /// Report Type: what a Session Report Request carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReportType: u8 {
        /// Downlink data report.
        const DLDR = 1 << 0;
        /// Usage report.
        const USAR = 1 << 1;
        /// Error indication report.
        const ERIR = 1 << 2;
        /// User plane inactivity report.
        const UPIR = 1 << 3;
        /// TSC management information report.
        const TMIR = 1 << 4;
        /// Session report.
        const SESR = 1 << 5;
        /// UE IP address usage report.
        const UISR = 1 << 6;
    }
}

impl IeBody for ReportType {
    const TYPE: IeType = IeType::ReportType;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("Report Type", 1, 0)),
        }
    }
}

bitflags! {
    /// Node Report Type: what a Node Report Request carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeReportType: u8 {
        /// User plane path failure report.
        const UPFR = 1 << 0;
        /// User plane path recovery report.
        const UPRR = 1 << 1;
        /// Clock drift report.
        const CKDR = 1 << 2;
        /// GTP-U path QoS report.
        const GPQR = 1 << 3;
    }
}

impl IeBody for NodeReportType {
    const TYPE: IeType = IeType::NodeReportType;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("Node Report Type", 1, 0)),
        }
    }
}

const DDSI_FLAG_PPI: u8 = 0x01;
const DDSI_FLAG_QFII: u8 = 0x02;

/// Downlink Data Service Information: paging policy and QFI hints for
/// buffered downlink data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownlinkDataServiceInformation {
    pub paging_policy_indication: Option<u8>,
    pub qfi: Option<u8>,
}

impl IeBody for DownlinkDataServiceInformation {
    const TYPE: IeType = IeType::DownlinkDataServiceInformation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.paging_policy_indication.is_some() {
            flags |= DDSI_FLAG_PPI;
        }
        if self.qfi.is_some() {
            flags |= DDSI_FLAG_QFII;
        }
        w.write_u8(flags)?;
        if let Some(ppi) = self.paging_policy_indication {
            w.write_u8(ppi & 0x07)?;
        }
        if let Some(qfi) = self.qfi {
            w.write_u8(qfi & 0x3F)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let paging_policy_indication = if flags & DDSI_FLAG_PPI != 0 {
            Some(r.read_u8()? & 0x07)
        } else {
            None
        };
        let qfi = if flags & DDSI_FLAG_QFII != 0 {
            Some(r.read_u8()? & 0x3F)
        } else {
            None
        };
        Ok(DownlinkDataServiceInformation {
            paging_policy_indication,
            qfi,
        })
    }
}

/// Downlink Data Report: which PDRs have buffered downlink data waiting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownlinkDataReport {
    pub pdr_ids: Vec<PdrId>,
    pub service_information: Option<DownlinkDataServiceInformation>,
}

impl DownlinkDataReport {
    pub fn for_pdr(pdr_id: PdrId) -> Self {
        DownlinkDataReport {
            pdr_ids: vec![pdr_id],
            service_information: None,
        }
    }
}

impl IeBody for DownlinkDataReport {
    const TYPE: IeType = IeType::DownlinkDataReport;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        for pdr_id in &self.pdr_ids {
            pdr_id.encode(w)?;
        }
        if let Some(info) = &self.service_information {
            info.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut report = DownlinkDataReport::default();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::PdrId => report.pdr_ids.push(PdrId::parse(child.body)?),
                IeType::DownlinkDataServiceInformation => put_slot(
                    &mut report.service_information,
                    DownlinkDataServiceInformation::parse(child.body)?,
                    child.ie_type,
                    "Downlink Data Report",
                ),
                _ => {}
            }
        }
        if report.pdr_ids.is_empty() {
            return Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::PdrId,
                parent: Some(IeType::DownlinkDataReport),
            });
        }
        Ok(report)
    }
}

const RGP_FLAG_V6: u8 = 0x01;
const RGP_FLAG_V4: u8 = 0x02;

/// Remote GTP-U Peer: the far end of a GTP-U path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteGtpuPeer {
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl RemoteGtpuPeer {
    pub fn ipv4(addr: Ipv4Addr) -> Self {
        RemoteGtpuPeer {
            ipv4: Some(addr),
            ipv6: None,
        }
    }
}

impl IeBody for RemoteGtpuPeer {
    const TYPE: IeType = IeType::RemoteGtpuPeer;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.ipv6.is_some() {
            flags |= RGP_FLAG_V6;
        }
        if self.ipv4.is_some() {
            flags |= RGP_FLAG_V4;
        }
        w.write_u8(flags)?;
        if let Some(addr) = self.ipv4 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(addr) = self.ipv6 {
            w.write_bytes(&addr.octets())?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let ipv4 = if flags & RGP_FLAG_V4 != 0 {
            let octets: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
            Some(Ipv4Addr::from(octets))
        } else {
            None
        };
        let ipv6 = if flags & RGP_FLAG_V6 != 0 {
            let octets: [u8; 16] = r.read_bytes(16)?.try_into().unwrap();
            Some(Ipv6Addr::from(octets))
        } else {
            None
        };
        Ok(RemoteGtpuPeer { ipv4, ipv6 })
    }
}

/// User Plane Path Failure Report: the peers a UP function lost contact with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPlanePathFailureReport {
    pub remote_gtpu_peers: Vec<RemoteGtpuPeer>,
}

impl IeBody for UserPlanePathFailureReport {
    const TYPE: IeType = IeType::UserPlanePathFailureReport;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        for peer in &self.remote_gtpu_peers {
            peer.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut report = UserPlanePathFailureReport::default();
        for child in IeReader::new(body) {
            let child = child?;
            if child.ie_type == IeType::RemoteGtpuPeer {
                report
                    .remote_gtpu_peers
                    .push(RemoteGtpuPeer::parse(child.body)?);
            }
        }
        if report.remote_gtpu_peers.is_empty() {
            return Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::RemoteGtpuPeer,
                parent: Some(IeType::UserPlanePathFailureReport),
            });
        }
        Ok(report)
    }
}

/// Error Indication Report: F-TEIDs for which the UP function received GTP-U
/// error indications.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorIndicationReport {
    pub remote_fteids: Vec<crate::ie::f_teid::Fteid>,
}

impl IeBody for ErrorIndicationReport {
    const TYPE: IeType = IeType::ErrorIndicationReport;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        for fteid in &self.remote_fteids {
            fteid.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut report = ErrorIndicationReport::default();
        for child in IeReader::new(body) {
            let child = child?;
            if child.ie_type == IeType::Fteid {
                report
                    .remote_fteids
                    .push(crate::ie::f_teid::Fteid::parse(child.body)?);
            }
        }
        if report.remote_fteids.is_empty() {
            return Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Fteid,
                parent: Some(IeType::ErrorIndicationReport),
            });
        }
        Ok(report)
    }
}

scalar_ie!(
    #[doc = " Average Packet Delay on a GTP-U path, in milliseconds."]
    AveragePacketDelay, u32, AveragePacketDelay, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Minimum Packet Delay on a GTP-U path, in milliseconds."]
    MinimumPacketDelay, u32, MinimumPacketDelay, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Maximum Packet Delay on a GTP-U path, in milliseconds."]
    MaximumPacketDelay, u32, MaximumPacketDelay, write_u32, read_u32, 4
);

/// QoS Information: one delay measurement set inside a GTP-U path QoS report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosInformation {
    pub average_delay: AveragePacketDelay,
    pub minimum_delay: Option<MinimumPacketDelay>,
    pub maximum_delay: Option<MaximumPacketDelay>,
}

impl QosInformation {
    pub fn new(average_ms: u32) -> Self {
        QosInformation {
            average_delay: AveragePacketDelay::new(average_ms),
            minimum_delay: None,
            maximum_delay: None,
        }
    }
}

impl IeBody for QosInformation {
    const TYPE: IeType = IeType::QosInformation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.average_delay.encode(w)?;
        if let Some(min) = &self.minimum_delay {
            min.encode(w)?;
        }
        if let Some(max) = &self.maximum_delay {
            max.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut average_delay = None;
        let mut minimum_delay = None;
        let mut maximum_delay = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::AveragePacketDelay => put_slot(
                    &mut average_delay,
                    AveragePacketDelay::parse(child.body)?,
                    child.ie_type,
                    "QoS Information",
                ),
                IeType::MinimumPacketDelay => put_slot(
                    &mut minimum_delay,
                    MinimumPacketDelay::parse(child.body)?,
                    child.ie_type,
                    "QoS Information",
                ),
                IeType::MaximumPacketDelay => put_slot(
                    &mut maximum_delay,
                    MaximumPacketDelay::parse(child.body)?,
                    child.ie_type,
                    "QoS Information",
                ),
                _ => {}
            }
        }
        Ok(QosInformation {
            average_delay: average_delay.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::AveragePacketDelay,
                parent: Some(IeType::QosInformation),
            })?,
            minimum_delay,
            maximum_delay,
        })
    }
}

/// GTP-U Path QoS Report: delay measurements towards one remote peer,
/// reported in a Node Report Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtpuPathQosReport {
    pub remote_gtpu_peer: RemoteGtpuPeer,
    pub qos_information: Vec<QosInformation>,
}

impl IeBody for GtpuPathQosReport {
    const TYPE: IeType = IeType::GtpuPathQosReport;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.remote_gtpu_peer.encode(w)?;
        for qi in &self.qos_information {
            qi.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut remote_gtpu_peer = None;
        let mut qos_information = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::RemoteGtpuPeer => put_slot(
                    &mut remote_gtpu_peer,
                    RemoteGtpuPeer::parse(child.body)?,
                    child.ie_type,
                    "GTP-U Path QoS Report",
                ),
                IeType::QosInformation => {
                    qos_information.push(QosInformation::parse(child.body)?)
                }
                _ => {}
            }
        }
        Ok(GtpuPathQosReport {
            remote_gtpu_peer: remote_gtpu_peer.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::RemoteGtpuPeer,
                parent: Some(IeType::GtpuPathQosReport),
            })?,
            qos_information,
        })
    }
}
