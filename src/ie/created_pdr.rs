//! Created PDR grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::f_teid::Fteid;
use crate::ie::rule_ids::PdrId;
use crate::ie::ue_ip_address::UeIpAddress;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Created PDR: the UP function's answer to a Create PDR that used CHOOSE,
/// carrying the F-TEID or UE IP address it allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPdr {
    pub pdr_id: PdrId,
    pub local_fteid: Option<Fteid>,
    pub ue_ip_address: Option<UeIpAddress>,
}

impl CreatedPdr {
    pub fn new(pdr_id: PdrId) -> Self {
        CreatedPdr {
            pdr_id,
            local_fteid: None,
            ue_ip_address: None,
        }
    }

    pub fn with_fteid(pdr_id: PdrId, fteid: Fteid) -> Self {
        CreatedPdr {
            pdr_id,
            local_fteid: Some(fteid),
            ue_ip_address: None,
        }
    }
}

impl IeBody for CreatedPdr {
    const TYPE: IeType = IeType::CreatedPdr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.pdr_id.encode(w)?;
        if let Some(fteid) = &self.local_fteid {
            fteid.encode(w)?;
        }
        if let Some(ue) = &self.ue_ip_address {
            ue.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut pdr_id = None;
        let mut local_fteid = None;
        let mut ue_ip_address = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::PdrId => put_slot(
                    &mut pdr_id,
                    PdrId::parse(child.body)?,
                    child.ie_type,
                    "Created PDR",
                ),
                IeType::Fteid => put_slot(
                    &mut local_fteid,
                    Fteid::parse(child.body)?,
                    child.ie_type,
                    "Created PDR",
                ),
                IeType::UeIpAddress => put_slot(
                    &mut ue_ip_address,
                    UeIpAddress::parse(child.body)?,
                    child.ie_type,
                    "Created PDR",
                ),
                _ => {}
            }
        }
        Ok(CreatedPdr {
            pdr_id: pdr_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::PdrId,
                parent: Some(IeType::CreatedPdr),
            })?,
            local_fteid,
            ue_ip_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn created_pdr_round_trip() {
        let created = CreatedPdr::with_fteid(
            PdrId::new(1),
            Fteid::ipv4(0x1234_5678, Ipv4Addr::new(10, 0, 0, 1)),
        );
        let ie = created.to_ie().unwrap();
        let parsed = CreatedPdr::parse(&ie.payload).unwrap();
        assert_eq!(parsed, created);
        assert_eq!(parsed.local_fteid.unwrap().teid, 0x1234_5678);
    }

    #[test]
    fn pdr_id_mandatory() {
        assert!(matches!(
            CreatedPdr::parse(&[]),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::PdrId,
                ..
            })
        ));
    }
}
