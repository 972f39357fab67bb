//! Create FAR and Forwarding Parameters grouped Information Elements.

use bitflags::bitflags;

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::filters::NetworkInstance;
use crate::ie::interface::DestinationInterface;
use crate::ie::outer_header::OuterHeaderCreation;
use crate::ie::qos::TransportLevelMarking;
use crate::ie::rule_ids::{BarId, FarId};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

bitflags! {
    /// Apply Action: what the UP function does with matched packets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ApplyAction: u8 {
        const DROP = 1 << 0;
        const FORW = 1 << 1;
        const BUFF = 1 << 2;
        const NOCP = 1 << 3;
        const DUPL = 1 << 4;
        const IPMA = 1 << 5;
        const IPMD = 1 << 6;
        const DFRT = 1 << 7;
    }
}

impl IeBody for ApplyAction {
    const TYPE: IeType = IeType::ApplyAction;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        // A second flag octet exists from R16 on; tolerated and ignored.
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("Apply Action", 1, 0)),
        }
    }
}

/// Forwarding Parameters: where and how forwarded traffic leaves the UPF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingParameters {
    pub destination_interface: DestinationInterface,
    pub network_instance: Option<NetworkInstance>,
    pub outer_header_creation: Option<OuterHeaderCreation>,
    pub transport_level_marking: Option<TransportLevelMarking>,
}

impl ForwardingParameters {
    pub fn new(destination_interface: DestinationInterface) -> Self {
        ForwardingParameters {
            destination_interface,
            network_instance: None,
            outer_header_creation: None,
            transport_level_marking: None,
        }
    }

    pub fn with_outer_header_creation(mut self, ohc: OuterHeaderCreation) -> Self {
        self.outer_header_creation = Some(ohc);
        self
    }
}

impl IeBody for ForwardingParameters {
    const TYPE: IeType = IeType::ForwardingParameters;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.destination_interface.encode(w)?;
        if let Some(ni) = &self.network_instance {
            ni.encode(w)?;
        }
        if let Some(ohc) = &self.outer_header_creation {
            ohc.encode(w)?;
        }
        if let Some(tlm) = &self.transport_level_marking {
            tlm.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut destination_interface = None;
        let mut network_instance = None;
        let mut outer_header_creation = None;
        let mut transport_level_marking = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::DestinationInterface => put_slot(
                    &mut destination_interface,
                    DestinationInterface::parse(child.body)?,
                    child.ie_type,
                    "Forwarding Parameters",
                ),
                IeType::NetworkInstance => put_slot(
                    &mut network_instance,
                    NetworkInstance::parse(child.body)?,
                    child.ie_type,
                    "Forwarding Parameters",
                ),
                IeType::OuterHeaderCreation => put_slot(
                    &mut outer_header_creation,
                    OuterHeaderCreation::parse(child.body)?,
                    child.ie_type,
                    "Forwarding Parameters",
                ),
                IeType::TransportLevelMarking => put_slot(
                    &mut transport_level_marking,
                    TransportLevelMarking::parse(child.body)?,
                    child.ie_type,
                    "Forwarding Parameters",
                ),
                _ => {}
            }
        }
        Ok(ForwardingParameters {
            destination_interface: destination_interface.ok_or(
                PfcpError::MissingMandatoryIe {
                    ie_type: IeType::DestinationInterface,
                    parent: Some(IeType::ForwardingParameters),
                },
            )?,
            network_instance,
            outer_header_creation,
            transport_level_marking,
        })
    }
}

/// Create FAR: a forwarding action rule. FAR ID and the apply action are
/// mandatory; forwarding parameters are required only when FORW is set,
/// which is a session-level concern left to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFar {
    pub far_id: FarId,
    pub apply_action: ApplyAction,
    pub forwarding_parameters: Option<ForwardingParameters>,
    pub bar_id: Option<BarId>,
}

impl CreateFar {
    pub fn new(far_id: FarId, apply_action: ApplyAction) -> Self {
        CreateFar {
            far_id,
            apply_action,
            forwarding_parameters: None,
            bar_id: None,
        }
    }

    /// Forward towards a destination interface.
    pub fn forward(far_id: FarId, parameters: ForwardingParameters) -> Self {
        CreateFar {
            far_id,
            apply_action: ApplyAction::FORW,
            forwarding_parameters: Some(parameters),
            bar_id: None,
        }
    }
}

impl IeBody for CreateFar {
    const TYPE: IeType = IeType::CreateFar;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.far_id.encode(w)?;
        self.apply_action.encode(w)?;
        if let Some(fp) = &self.forwarding_parameters {
            fp.encode(w)?;
        }
        if let Some(bar_id) = &self.bar_id {
            bar_id.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut far_id = None;
        let mut apply_action = None;
        let mut forwarding_parameters = None;
        let mut bar_id = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::FarId => put_slot(
                    &mut far_id,
                    FarId::parse(child.body)?,
                    child.ie_type,
                    "Create FAR",
                ),
                IeType::ApplyAction => put_slot(
                    &mut apply_action,
                    ApplyAction::parse(child.body)?,
                    child.ie_type,
                    "Create FAR",
                ),
                IeType::ForwardingParameters => put_slot(
                    &mut forwarding_parameters,
                    ForwardingParameters::parse(child.body)?,
                    child.ie_type,
                    "Create FAR",
                ),
                IeType::BarId => put_slot(
                    &mut bar_id,
                    BarId::parse(child.body)?,
                    child.ie_type,
                    "Create FAR",
                ),
                _ => {}
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(IeType::CreateFar),
        };
        Ok(CreateFar {
            far_id: far_id.ok_or_else(|| missing(IeType::FarId))?,
            apply_action: apply_action.ok_or_else(|| missing(IeType::ApplyAction))?,
            forwarding_parameters,
            bar_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn apply_action_round_trip() {
        let action = ApplyAction::FORW | ApplyAction::DUPL;
        let ie = action.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x12]);
        assert_eq!(ApplyAction::parse(&ie.payload).unwrap(), action);
    }

    #[test]
    fn drop_far_round_trip() {
        let far = CreateFar::new(FarId::new(1), ApplyAction::DROP);
        let ie = far.to_ie().unwrap();
        assert_eq!(CreateFar::parse(&ie.payload).unwrap(), far);
    }

    #[test]
    fn forwarding_far_round_trip() {
        let params = ForwardingParameters::new(DestinationInterface::core())
            .with_outer_header_creation(OuterHeaderCreation::gtpu_ipv4(
                0xAABB_CCDD,
                Ipv4Addr::new(10, 20, 30, 40),
            ));
        let far = CreateFar::forward(FarId::new(2), params);
        let ie = far.to_ie().unwrap();
        let parsed = CreateFar::parse(&ie.payload).unwrap();
        assert_eq!(parsed, far);
        let fp = parsed.forwarding_parameters.unwrap();
        assert_eq!(fp.outer_header_creation.unwrap().teid, Some(0xAABB_CCDD));
    }

    #[test]
    fn buffering_far_with_bar() {
        let mut far = CreateFar::new(FarId::new(3), ApplyAction::BUFF | ApplyAction::NOCP);
        far.bar_id = Some(BarId::new(1));
        let ie = far.to_ie().unwrap();
        assert_eq!(CreateFar::parse(&ie.payload).unwrap(), far);
    }

    #[test]
    fn apply_action_mandatory() {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        FarId::new(1).encode(&mut w).unwrap();
        assert!(matches!(
            CreateFar::parse(w.written()),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::ApplyAction,
                ..
            })
        ));
    }

    #[test]
    fn forwarding_parameters_need_destination() {
        assert!(matches!(
            ForwardingParameters::parse(&[]),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::DestinationInterface,
                ..
            })
        ));
    }
}
