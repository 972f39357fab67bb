//! PDI (Packet Detection Information) grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::ethernet::EthernetPacketFilter;
use crate::ie::f_teid::Fteid;
use crate::ie::filters::{ApplicationId, NetworkInstance, SdfFilter};
use crate::ie::interface::SourceInterface;
use crate::ie::qos::Qfi;
use crate::ie::ue_ip_address::UeIpAddress;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// PDI: the match conditions of a PDR. Source interface is the only
/// mandatory child; everything else narrows the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdi {
    pub source_interface: SourceInterface,
    pub local_fteid: Option<Fteid>,
    pub network_instance: Option<NetworkInstance>,
    pub ue_ip_address: Option<UeIpAddress>,
    pub sdf_filters: Vec<SdfFilter>,
    pub application_id: Option<ApplicationId>,
    pub ethernet_packet_filters: Vec<EthernetPacketFilter>,
    pub qfis: Vec<Qfi>,
}

impl Pdi {
    pub fn new(source_interface: SourceInterface) -> Self {
        Pdi {
            source_interface,
            local_fteid: None,
            network_instance: None,
            ue_ip_address: None,
            sdf_filters: Vec::new(),
            application_id: None,
            ethernet_packet_filters: Vec::new(),
            qfis: Vec::new(),
        }
    }

    /// Uplink match: traffic arriving from the access side.
    pub fn uplink_access() -> PdiBuilder {
        PdiBuilder::new(SourceInterface::access())
    }

    /// Downlink match: traffic arriving from the core side.
    pub fn downlink_core() -> PdiBuilder {
        PdiBuilder::new(SourceInterface::core())
    }
}

impl IeBody for Pdi {
    const TYPE: IeType = IeType::Pdi;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.source_interface.encode(w)?;
        if let Some(fteid) = &self.local_fteid {
            fteid.encode(w)?;
        }
        if let Some(ni) = &self.network_instance {
            ni.encode(w)?;
        }
        if let Some(ue) = &self.ue_ip_address {
            ue.encode(w)?;
        }
        for sdf in &self.sdf_filters {
            sdf.encode(w)?;
        }
        if let Some(app) = &self.application_id {
            app.encode(w)?;
        }
        for filter in &self.ethernet_packet_filters {
            filter.encode(w)?;
        }
        for qfi in &self.qfis {
            qfi.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut source_interface = None;
        let mut local_fteid = None;
        let mut network_instance = None;
        let mut ue_ip_address = None;
        let mut sdf_filters = Vec::new();
        let mut application_id = None;
        let mut ethernet_packet_filters = Vec::new();
        let mut qfis = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::SourceInterface => put_slot(
                    &mut source_interface,
                    SourceInterface::parse(child.body)?,
                    child.ie_type,
                    "PDI",
                ),
                IeType::Fteid => put_slot(
                    &mut local_fteid,
                    Fteid::parse(child.body)?,
                    child.ie_type,
                    "PDI",
                ),
                IeType::NetworkInstance => put_slot(
                    &mut network_instance,
                    NetworkInstance::parse(child.body)?,
                    child.ie_type,
                    "PDI",
                ),
                IeType::UeIpAddress => put_slot(
                    &mut ue_ip_address,
                    UeIpAddress::parse(child.body)?,
                    child.ie_type,
                    "PDI",
                ),
                IeType::SdfFilter => sdf_filters.push(SdfFilter::parse(child.body)?),
                IeType::ApplicationId => put_slot(
                    &mut application_id,
                    ApplicationId::parse(child.body)?,
                    child.ie_type,
                    "PDI",
                ),
                IeType::EthernetPacketFilter => {
                    ethernet_packet_filters.push(EthernetPacketFilter::parse(child.body)?)
                }
                IeType::Qfi => qfis.push(Qfi::parse(child.body)?),
                _ => {}
            }
        }
        Ok(Pdi {
            source_interface: source_interface.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::SourceInterface,
                parent: Some(IeType::Pdi),
            })?,
            local_fteid,
            network_instance,
            ue_ip_address,
            sdf_filters,
            application_id,
            ethernet_packet_filters,
            qfis,
        })
    }
}

/// Builder for [`Pdi`].
#[derive(Debug)]
pub struct PdiBuilder {
    pdi: Pdi,
}

impl PdiBuilder {
    pub fn new(source_interface: SourceInterface) -> Self {
        PdiBuilder {
            pdi: Pdi::new(source_interface),
        }
    }

    pub fn local_fteid(mut self, fteid: Fteid) -> Self {
        self.pdi.local_fteid = Some(fteid);
        self
    }

    pub fn network_instance(mut self, ni: NetworkInstance) -> Self {
        self.pdi.network_instance = Some(ni);
        self
    }

    pub fn ue_ip_address(mut self, ue: UeIpAddress) -> Self {
        self.pdi.ue_ip_address = Some(ue);
        self
    }

    pub fn sdf_filter(mut self, sdf: SdfFilter) -> Self {
        self.pdi.sdf_filters.push(sdf);
        self
    }

    pub fn application_id(mut self, app: ApplicationId) -> Self {
        self.pdi.application_id = Some(app);
        self
    }

    pub fn ethernet_packet_filter(mut self, filter: EthernetPacketFilter) -> Self {
        self.pdi.ethernet_packet_filters.push(filter);
        self
    }

    pub fn qfi(mut self, qfi: Qfi) -> Self {
        self.pdi.qfis.push(qfi);
        self
    }

    pub fn build(self) -> Pdi {
        self.pdi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn minimal_pdi_round_trip() {
        let pdi = Pdi::new(SourceInterface::access());
        let ie = pdi.to_ie().unwrap();
        assert_eq!(Pdi::parse(&ie.payload).unwrap(), pdi);
    }

    #[test]
    fn full_uplink_pdi_round_trip() {
        let pdi = Pdi::uplink_access()
            .local_fteid(Fteid::ipv4(0x0000_0001, Ipv4Addr::new(10, 0, 0, 1)))
            .network_instance(NetworkInstance::new("access"))
            .ue_ip_address(UeIpAddress::ipv4(Ipv4Addr::new(100, 64, 0, 5)))
            .sdf_filter(SdfFilter::flow("permit out ip from any to assigned"))
            .qfi(Qfi::new(5))
            .build();
        let ie = pdi.to_ie().unwrap();
        assert_eq!(Pdi::parse(&ie.payload).unwrap(), pdi);
    }

    #[test]
    fn source_interface_mandatory() {
        assert!(matches!(
            Pdi::parse(&[]),
            Err(PfcpError::MissingMandatoryIe {
                ie_type: IeType::SourceInterface,
                ..
            })
        ));
    }
}
