//! Update variants of the rule grouped Information Elements.
//!
//! Structurally these mirror their Create counterparts, but only the rule id
//! is mandatory; every other child updates the corresponding attribute and
//! an absent child means "no change".

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::create_far::ApplyAction;
use crate::ie::filters::NetworkInstance;
use crate::ie::interface::DestinationInterface;
use crate::ie::outer_header::{OuterHeaderCreation, OuterHeaderRemoval};
use crate::ie::pdi::Pdi;
use crate::ie::qos::{GateStatus, Gbr, Mbr, Qfi};
use crate::ie::rule_ids::{FarId, PdrId, Precedence, QerId, UrrId};
use crate::ie::usage::{
    MeasurementMethod, ReportingTriggers, TimeQuota, TimeThreshold, VolumeQuota, VolumeThreshold,
};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Update PDR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePdr {
    pub pdr_id: PdrId,
    pub precedence: Option<Precedence>,
    pub pdi: Option<Pdi>,
    pub outer_header_removal: Option<OuterHeaderRemoval>,
    pub far_id: Option<FarId>,
    pub urr_ids: Vec<UrrId>,
    pub qer_ids: Vec<QerId>,
}

impl UpdatePdr {
    pub fn new(pdr_id: PdrId) -> Self {
        UpdatePdr {
            pdr_id,
            precedence: None,
            pdi: None,
            outer_header_removal: None,
            far_id: None,
            urr_ids: Vec::new(),
            qer_ids: Vec::new(),
        }
    }
}

impl IeBody for UpdatePdr {
    const TYPE: IeType = IeType::UpdatePdr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.pdr_id.encode(w)?;
        if let Some(p) = &self.precedence {
            p.encode(w)?;
        }
        if let Some(pdi) = &self.pdi {
            pdi.encode(w)?;
        }
        if let Some(ohr) = &self.outer_header_removal {
            ohr.encode(w)?;
        }
        if let Some(far_id) = &self.far_id {
            far_id.encode(w)?;
        }
        for urr_id in &self.urr_ids {
            urr_id.encode(w)?;
        }
        for qer_id in &self.qer_ids {
            qer_id.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut pdr_id = None;
        let mut precedence = None;
        let mut pdi = None;
        let mut outer_header_removal = None;
        let mut far_id = None;
        let mut urr_ids = Vec::new();
        let mut qer_ids = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::PdrId => put_slot(
                    &mut pdr_id,
                    PdrId::parse(child.body)?,
                    child.ie_type,
                    "Update PDR",
                ),
                IeType::Precedence => put_slot(
                    &mut precedence,
                    Precedence::parse(child.body)?,
                    child.ie_type,
                    "Update PDR",
                ),
                IeType::Pdi => put_slot(&mut pdi, Pdi::parse(child.body)?, child.ie_type, "Update PDR"),
                IeType::OuterHeaderRemoval => put_slot(
                    &mut outer_header_removal,
                    OuterHeaderRemoval::parse(child.body)?,
                    child.ie_type,
                    "Update PDR",
                ),
                IeType::FarId => put_slot(
                    &mut far_id,
                    FarId::parse(child.body)?,
                    child.ie_type,
                    "Update PDR",
                ),
                IeType::UrrId => urr_ids.push(UrrId::parse(child.body)?),
                IeType::QerId => qer_ids.push(QerId::parse(child.body)?),
                _ => {}
            }
        }
        Ok(UpdatePdr {
            pdr_id: pdr_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::PdrId,
                parent: Some(IeType::UpdatePdr),
            })?,
            precedence,
            pdi,
            outer_header_removal,
            far_id,
            urr_ids,
            qer_ids,
        })
    }
}

/// Update Forwarding Parameters: every child optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateForwardingParameters {
    pub destination_interface: Option<DestinationInterface>,
    pub network_instance: Option<NetworkInstance>,
    pub outer_header_creation: Option<OuterHeaderCreation>,
}

impl IeBody for UpdateForwardingParameters {
    const TYPE: IeType = IeType::UpdateForwardingParameters;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        if let Some(di) = &self.destination_interface {
            di.encode(w)?;
        }
        if let Some(ni) = &self.network_instance {
            ni.encode(w)?;
        }
        if let Some(ohc) = &self.outer_header_creation {
            ohc.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut params = UpdateForwardingParameters::default();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::DestinationInterface => put_slot(
                    &mut params.destination_interface,
                    DestinationInterface::parse(child.body)?,
                    child.ie_type,
                    "Update Forwarding Parameters",
                ),
                IeType::NetworkInstance => put_slot(
                    &mut params.network_instance,
                    NetworkInstance::parse(child.body)?,
                    child.ie_type,
                    "Update Forwarding Parameters",
                ),
                IeType::OuterHeaderCreation => put_slot(
                    &mut params.outer_header_creation,
                    OuterHeaderCreation::parse(child.body)?,
                    child.ie_type,
                    "Update Forwarding Parameters",
                ),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Update FAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFar {
    pub far_id: FarId,
    pub apply_action: Option<ApplyAction>,
    pub update_forwarding_parameters: Option<UpdateForwardingParameters>,
}

impl UpdateFar {
    pub fn new(far_id: FarId) -> Self {
        UpdateFar {
            far_id,
            apply_action: None,
            update_forwarding_parameters: None,
        }
    }
}

impl IeBody for UpdateFar {
    const TYPE: IeType = IeType::UpdateFar;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.far_id.encode(w)?;
        if let Some(action) = &self.apply_action {
            action.encode(w)?;
        }
        if let Some(params) = &self.update_forwarding_parameters {
            params.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut far_id = None;
        let mut apply_action = None;
        let mut update_forwarding_parameters = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::FarId => put_slot(
                    &mut far_id,
                    FarId::parse(child.body)?,
                    child.ie_type,
                    "Update FAR",
                ),
                IeType::ApplyAction => put_slot(
                    &mut apply_action,
                    ApplyAction::parse(child.body)?,
                    child.ie_type,
                    "Update FAR",
                ),
                IeType::UpdateForwardingParameters => put_slot(
                    &mut update_forwarding_parameters,
                    UpdateForwardingParameters::parse(child.body)?,
                    child.ie_type,
                    "Update FAR",
                ),
                _ => {}
            }
        }
        Ok(UpdateFar {
            far_id: far_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::FarId,
                parent: Some(IeType::UpdateFar),
            })?,
            apply_action,
            update_forwarding_parameters,
        })
    }
}

/// Update URR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUrr {
    pub urr_id: UrrId,
    pub measurement_method: Option<MeasurementMethod>,
    pub reporting_triggers: Option<ReportingTriggers>,
    pub volume_threshold: Option<VolumeThreshold>,
    pub time_threshold: Option<TimeThreshold>,
    pub volume_quota: Option<VolumeQuota>,
    pub time_quota: Option<TimeQuota>,
}

impl UpdateUrr {
    pub fn new(urr_id: UrrId) -> Self {
        UpdateUrr {
            urr_id,
            measurement_method: None,
            reporting_triggers: None,
            volume_threshold: None,
            time_threshold: None,
            volume_quota: None,
            time_quota: None,
        }
    }
}

impl IeBody for UpdateUrr {
    const TYPE: IeType = IeType::UpdateUrr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.urr_id.encode(w)?;
        if let Some(mm) = &self.measurement_method {
            mm.encode(w)?;
        }
        if let Some(rt) = &self.reporting_triggers {
            rt.encode(w)?;
        }
        if let Some(vt) = &self.volume_threshold {
            vt.encode(w)?;
        }
        if let Some(tt) = &self.time_threshold {
            tt.encode(w)?;
        }
        if let Some(vq) = &self.volume_quota {
            vq.encode(w)?;
        }
        if let Some(tq) = &self.time_quota {
            tq.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut urr_id = None;
        let mut measurement_method = None;
        let mut reporting_triggers = None;
        let mut volume_threshold = None;
        let mut time_threshold = None;
        let mut volume_quota = None;
        let mut time_quota = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::UrrId => put_slot(
                    &mut urr_id,
                    UrrId::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::MeasurementMethod => put_slot(
                    &mut measurement_method,
                    MeasurementMethod::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::ReportingTriggers => put_slot(
                    &mut reporting_triggers,
                    ReportingTriggers::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::VolumeThreshold => put_slot(
                    &mut volume_threshold,
                    VolumeThreshold::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::TimeThreshold => put_slot(
                    &mut time_threshold,
                    TimeThreshold::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::VolumeQuota => put_slot(
                    &mut volume_quota,
                    VolumeQuota::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                IeType::TimeQuota => put_slot(
                    &mut time_quota,
                    TimeQuota::parse(child.body)?,
                    child.ie_type,
                    "Update URR",
                ),
                _ => {}
            }
        }
        Ok(UpdateUrr {
            urr_id: urr_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::UrrId,
                parent: Some(IeType::UpdateUrr),
            })?,
            measurement_method,
            reporting_triggers,
            volume_threshold,
            time_threshold,
            volume_quota,
            time_quota,
        })
    }
}

/// Update QER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQer {
    pub qer_id: QerId,
    pub gate_status: Option<GateStatus>,
    pub mbr: Option<Mbr>,
    pub gbr: Option<Gbr>,
    pub qfi: Option<Qfi>,
}

impl UpdateQer {
    pub fn new(qer_id: QerId) -> Self {
        UpdateQer {
            qer_id,
            gate_status: None,
            mbr: None,
            gbr: None,
            qfi: None,
        }
    }
}

impl IeBody for UpdateQer {
    const TYPE: IeType = IeType::UpdateQer;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.qer_id.encode(w)?;
        if let Some(gs) = &self.gate_status {
            gs.encode(w)?;
        }
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
                    "Update QER",
                ),
                IeType::GateStatus => put_slot(
                    &mut gate_status,
                    GateStatus::parse(child.body)?,
                    child.ie_type,
                    "Update QER",
                ),
                IeType::Mbr => put_slot(&mut mbr, Mbr::parse(child.body)?, child.ie_type, "Update QER"),
                IeType::Gbr => put_slot(&mut gbr, Gbr::parse(child.body)?, child.ie_type, "Update QER"),
                IeType::Qfi => put_slot(&mut qfi, Qfi::parse(child.body)?, child.ie_type, "Update QER"),
                _ => {}
            }
        }
        Ok(UpdateQer {
            qer_id: qer_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::QerId,
                parent: Some(IeType::UpdateQer),
            })?,
            gate_status,
            mbr,
            gbr,
            qfi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::interface::SourceInterface;

    #[test]
    fn update_pdr_id_only() {
        let update = UpdatePdr::new(PdrId::new(4));
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdatePdr::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn update_pdr_with_new_pdi() {
        let mut update = UpdatePdr::new(PdrId::new(4));
        update.precedence = Some(Precedence::new(50));
        update.pdi = Some(Pdi::new(SourceInterface::core()));
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdatePdr::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn update_far_gate_change() {
        let mut update = UpdateFar::new(FarId::new(2));
        update.apply_action = Some(ApplyAction::DROP);
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdateFar::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn update_far_new_destination() {
        let mut update = UpdateFar::new(FarId::new(2));
        update.update_forwarding_parameters = Some(UpdateForwardingParameters {
            destination_interface: Some(DestinationInterface::access()),
            ..Default::default()
        });
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdateFar::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn update_urr_quota_refresh() {
        let mut update = UpdateUrr::new(UrrId::new(6));
        update.volume_quota = Some(VolumeQuota::total(1_000_000));
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdateUrr::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn update_qer_round_trip() {
        let mut update = UpdateQer::new(QerId::new(8));
        update.gate_status = Some(GateStatus::closed());
        update.mbr = Some(Mbr::new(500, 500));
        let ie = update.to_ie().unwrap();
        assert_eq!(UpdateQer::parse(&ie.payload).unwrap(), update);
    }

    #[test]
    fn rule_id_mandatory() {
        assert!(UpdatePdr::parse(&[]).is_err());
        assert!(UpdateFar::parse(&[]).is_err());
        assert!(UpdateUrr::parse(&[]).is_err());
        assert!(UpdateQer::parse(&[]).is_err());
    }
}
