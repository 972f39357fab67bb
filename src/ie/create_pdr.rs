//! Create PDR grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::outer_header::OuterHeaderRemoval;
use crate::ie::pdi::Pdi;
use crate::ie::rule_ids::{FarId, PdrId, Precedence, QerId, UrrId};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Create PDR: a packet detection rule. PDR ID, precedence, and the PDI are
/// mandatory; forwarding, usage, and QoS rule references are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePdr {
    pub pdr_id: PdrId,
    pub precedence: Precedence,
    pub pdi: Pdi,
    pub outer_header_removal: Option<OuterHeaderRemoval>,
    pub far_id: Option<FarId>,
    pub urr_ids: Vec<UrrId>,
    pub qer_ids: Vec<QerId>,
}

impl CreatePdr {
    pub fn new(pdr_id: PdrId, precedence: Precedence, pdi: Pdi) -> Self {
        CreatePdr {
            pdr_id,
            precedence,
            pdi,
            outer_header_removal: None,
            far_id: None,
            urr_ids: Vec::new(),
            qer_ids: Vec::new(),
        }
    }
}

impl IeBody for CreatePdr {
    const TYPE: IeType = IeType::CreatePdr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.pdr_id.encode(w)?;
        self.precedence.encode(w)?;
        self.pdi.encode(w)?;
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
                    "Create PDR",
                ),
                IeType::Precedence => put_slot(
                    &mut precedence,
                    Precedence::parse(child.body)?,
                    child.ie_type,
                    "Create PDR",
                ),
                IeType::Pdi => put_slot(
                    &mut pdi,
                    Pdi::parse(child.body)?,
                    child.ie_type,
                    "Create PDR",
                ),
                IeType::OuterHeaderRemoval => put_slot(
                    &mut outer_header_removal,
                    OuterHeaderRemoval::parse(child.body)?,
                    child.ie_type,
                    "Create PDR",
                ),
                IeType::FarId => put_slot(
                    &mut far_id,
                    FarId::parse(child.body)?,
                    child.ie_type,
                    "Create PDR",
                ),
                IeType::UrrId => urr_ids.push(UrrId::parse(child.body)?),
                IeType::QerId => qer_ids.push(QerId::parse(child.body)?),
                _ => {}
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(IeType::CreatePdr),
        };
        Ok(CreatePdr {
            pdr_id: pdr_id.ok_or_else(|| missing(IeType::PdrId))?,
            precedence: precedence.ok_or_else(|| missing(IeType::Precedence))?,
            pdi: pdi.ok_or_else(|| missing(IeType::Pdi))?,
            outer_header_removal,
            far_id,
            urr_ids,
            qer_ids,
        })
    }
}

/// Builder enforcing the mandatory children of [`CreatePdr`].
#[derive(Debug, Default)]
pub struct CreatePdrBuilder {
    pdr_id: Option<PdrId>,
    precedence: Option<Precedence>,
    pdi: Option<Pdi>,
    outer_header_removal: Option<OuterHeaderRemoval>,
    far_id: Option<FarId>,
    urr_ids: Vec<UrrId>,
    qer_ids: Vec<QerId>,
}

impl CreatePdrBuilder {
    pub fn new(pdr_id: PdrId) -> Self {
        CreatePdrBuilder {
            pdr_id: Some(pdr_id),
            ..Default::default()
        }
    }

    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = Some(precedence);
        self
    }

    pub fn pdi(mut self, pdi: Pdi) -> Self {
        self.pdi = Some(pdi);
        self
    }

    pub fn outer_header_removal(mut self, ohr: OuterHeaderRemoval) -> Self {
        self.outer_header_removal = Some(ohr);
        self
    }

    pub fn far_id(mut self, far_id: FarId) -> Self {
        self.far_id = Some(far_id);
        self
    }

    pub fn urr_id(mut self, urr_id: UrrId) -> Self {
        self.urr_ids.push(urr_id);
        self
    }

    pub fn qer_id(mut self, qer_id: QerId) -> Self {
        self.qer_ids.push(qer_id);
        self
    }

    pub fn build(self) -> Result<CreatePdr, PfcpError> {
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(IeType::CreatePdr),
        };
        Ok(CreatePdr {
            pdr_id: self.pdr_id.ok_or_else(|| missing(IeType::PdrId))?,
            precedence: self.precedence.ok_or_else(|| missing(IeType::Precedence))?,
            pdi: self.pdi.ok_or_else(|| missing(IeType::Pdi))?,
            outer_header_removal: self.outer_header_removal,
            far_id: self.far_id,
            urr_ids: self.urr_ids,
            qer_ids: self.qer_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::f_teid::Fteid;
    use crate::ie::outer_header::OuterHeaderRemovalDescription;
    use std::net::Ipv4Addr;

    fn uplink_pdi() -> Pdi {
        Pdi::uplink_access()
            .local_fteid(Fteid::ipv4(0x100, Ipv4Addr::new(10, 0, 0, 1)))
            .build()
    }

    #[test]
    fn minimal_round_trip() {
        let pdr = CreatePdr::new(PdrId::new(1), Precedence::new(100), uplink_pdi());
        let ie = pdr.to_ie().unwrap();
        assert_eq!(CreatePdr::parse(&ie.payload).unwrap(), pdr);
    }

    #[test]
    fn full_round_trip() {
        let pdr = CreatePdrBuilder::new(PdrId::new(2))
            .precedence(Precedence::new(200))
            .pdi(uplink_pdi())
            .outer_header_removal(OuterHeaderRemoval::new(
                OuterHeaderRemovalDescription::GtpuUdpIpv4,
            ))
            .far_id(FarId::new(1))
            .urr_id(UrrId::new(1))
            .urr_id(UrrId::new(2))
            .qer_id(QerId::new(1))
            .build()
            .unwrap();
        let ie = pdr.to_ie().unwrap();
        let parsed = CreatePdr::parse(&ie.payload).unwrap();
        assert_eq!(parsed, pdr);
        assert_eq!(parsed.urr_ids.len(), 2);
    }

    #[test]
    fn builder_missing_pdi() {
        let err = CreatePdrBuilder::new(PdrId::new(1))
            .precedence(Precedence::new(1))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            PfcpError::MissingMandatoryIe {
                ie_type: IeType::Pdi,
                ..
            }
        ));
    }

    #[test]
    fn parse_missing_precedence() {
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);
        PdrId::new(1).encode(&mut w).unwrap();
        uplink_pdi().encode(&mut w).unwrap();
        let err = CreatePdr::parse(w.written()).unwrap_err();
        assert!(matches!(
            err,
            PfcpError::MissingMandatoryIe {
                ie_type: IeType::Precedence,
                ..
            }
        ));
    }
}
