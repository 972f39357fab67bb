//! Create QER grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::qos::{GateStatus, Gbr, Mbr, Qfi};
use crate::ie::rule_ids::QerId;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Create QER: a QoS enforcement rule gating and rate-limiting the flows
/// that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQer {
    pub qer_id: QerId,
    pub gate_status: GateStatus,
    pub mbr: Option<Mbr>,
    pub gbr: Option<Gbr>,
    pub qfi: Option<Qfi>,
}

impl CreateQer {
    pub fn new(qer_id: QerId, gate_status: GateStatus) -> Self {
        CreateQer {
            qer_id,
            gate_status,
            mbr: None,
            gbr: None,
            qfi: None,
        }
    }

    /// Both gates open, no rate limits.
    pub fn open_gate(qer_id: QerId) -> Self {
        CreateQer::new(qer_id, GateStatus::open())
    }

    /// Both gates open with an MBR cap in kbit/s.
    pub fn rate_limited(qer_id: QerId, uplink_kbps: u64, downlink_kbps: u64) -> Self {
        let mut qer = CreateQer::open_gate(qer_id);
        qer.mbr = Some(Mbr::new(uplink_kbps, downlink_kbps));
        qer
    }
}

impl IeBody for CreateQer {
    const TYPE: IeType = IeType::CreateQer;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.qer_id.encode(w)?;
        self.gate_status.encode(w)?;
        if let Some(mbr) = &self.mbr {
            mbr.encode(w)?;
        }
        if let Some(gbr) = &self.gbr {
            gbr.encode(w)?;
        }
        if let Some(qfi) = &self.qfi {
            qfi.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut qer_id = None;
        let mut gate_status = None;
        let mut mbr = None;
        let mut gbr = None;
        let mut qfi = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::QerId => put_slot(
                    &mut qer_id,
                    QerId::parse(child.body)?,
                    child.ie_type,
                    "Create QER",
                ),
                IeType::GateStatus => put_slot(
                    &mut gate_status,
                    GateStatus::parse(child.body)?,
                    child.ie_type,
                    "Create QER",
                ),
                IeType::Mbr => put_slot(&mut mbr, Mbr::parse(child.body)?, child.ie_type, "Create QER"),
                IeType::Gbr => put_slot(&mut gbr, Gbr::parse(child.body)?, child.ie_type, "Create QER"),
                IeType::Qfi => put_slot(&mut qfi, Qfi::parse(child.body)?, child.ie_type, "Create QER"),
                _ => {}
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(IeType::CreateQer),
        };
        Ok(CreateQer {
            qer_id: qer_id.ok_or_else(|| missing(IeType::QerId))?,
            gate_status: gate_status.ok_or_else(|| missing(IeType::GateStatus))?,
            mbr,
            gbr,
            qfi,
        })
    }
}
