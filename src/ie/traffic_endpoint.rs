//! Create Traffic Endpoint grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::f_teid::Fteid;
use crate::ie::filters::NetworkInstance;
use crate::ie::rule_ids::TrafficEndpointId;
use crate::ie::ue_ip_address::UeIpAddress;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Create Traffic Endpoint: a reusable bundle of endpoint details several
/// PDRs can reference instead of repeating F-TEID and addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTrafficEndpoint {
    pub endpoint_id: TrafficEndpointId,
    pub local_fteid: Option<Fteid>,
    pub network_instance: Option<NetworkInstance>,
    pub ue_ip_address: Option<UeIpAddress>,
}

impl CreateTrafficEndpoint {
    pub fn new(endpoint_id: TrafficEndpointId) -> Self {
        CreateTrafficEndpoint {
            endpoint_id,
            local_fteid: None,
            network_instance: None,
            ue_ip_address: None,
        }
    }
}

impl IeBody for CreateTrafficEndpoint {
    const TYPE: IeType = IeType::CreateTrafficEndpoint;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.endpoint_id.encode(w)?;
        if let Some(fteid) = &self.local_fteid {
            fteid.encode(w)?;
        }
        if let Some(ni) = &self.network_instance {
            ni.encode(w)?;
        }
        if let Some(ue) = &self.ue_ip_address {
            ue.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut endpoint_id = None;
        let mut local_fteid = None;
        let mut network_instance = None;
        let mut ue_ip_address = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::TrafficEndpointId => put_slot(
                    &mut endpoint_id,
                    TrafficEndpointId::parse(child.body)?,
                    child.ie_type,
                    "Create Traffic Endpoint",
                ),
                IeType::Fteid => put_slot(
                    &mut local_fteid,
                    Fteid::parse(child.body)?,
                    child.ie_type,
                    "Create Traffic Endpoint",
                ),
                IeType::NetworkInstance => put_slot(
                    &mut network_instance,
                    NetworkInstance::parse(child.body)?,
                    child.ie_type,
                    "Create Traffic Endpoint",
                ),
                IeType::UeIpAddress => put_slot(
                    &mut ue_ip_address,
                    UeIpAddress::parse(child.body)?,
                    child.ie_type,
                    "Create Traffic Endpoint",
                ),
                _ => {}
            }
        }
        Ok(CreateTrafficEndpoint {
            endpoint_id: endpoint_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::TrafficEndpointId,
                parent: Some(IeType::CreateTrafficEndpoint),
            })?,
            local_fteid,
            network_instance,
            ue_ip_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn traffic_endpoint_round_trip() {
        let mut te = CreateTrafficEndpoint::new(TrafficEndpointId::new(3));
        te.local_fteid = Some(Fteid::ipv4(0x77, Ipv4Addr::new(10, 9, 8, 7)));
        te.network_instance = Some(NetworkInstance::new("core"));
        let ie = te.to_ie().unwrap();
        assert_eq!(CreateTrafficEndpoint::parse(&ie.payload).unwrap(), te);
    }

    #[test]
    fn endpoint_id_mandatory() {
        assert!(matches!(
            CreateTrafficEndpoint::parse(&[]),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::TrafficEndpointId,
                ..
            })
        ));
    }
}
