//! Ethernet traffic classification Information Elements.

use bitflags::bitflags;

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::filters::SdfFilter;
use crate::ie::{put_slot, scalar_ie, IeBody, IeReader, IeType};

scalar_ie!(
    #[doc = " Ethernet Filter identifier, unique within a session."]
    EthernetFilterId, u32, EthernetFilterId, write_u32, read_u32, 4
);

bitflags! {
    /// Ethernet Filter Properties: currently only BIDE (bidirectional).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EthernetFilterProperties: u8 {
        const BIDE = 1 << 0;
    }
}

impl IeBody for EthernetFilterProperties {
    const TYPE: IeType = IeType::EthernetFilterProperties;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("Ethernet Filter Properties", 1, 0)),
        }
    }
}

const MAC_FLAG_SOUR: u8 = 0x01;
const MAC_FLAG_DEST: u8 = 0x02;

/// MAC Address: source and/or destination addresses to match on.
///
/// The upper-address flag pairs (UDES/USOU) describe address ranges and are
/// not modelled; their flag bits parse as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacAddress {
    pub source: Option<[u8; 6]>,
    pub destination: Option<[u8; 6]>,
}

impl MacAddress {
    pub fn source(addr: [u8; 6]) -> Self {
        MacAddress {
            source: Some(addr),
            ..Default::default()
        }
    }
}

impl IeBody for MacAddress {
    const TYPE: IeType = IeType::MacAddress;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.source.is_some() {
            flags |= MAC_FLAG_SOUR;
        }
        if self.destination.is_some() {
            flags |= MAC_FLAG_DEST;
        }
        w.write_u8(flags)?;
        if let Some(addr) = self.source {
            w.write_bytes(&addr)?;
        }
        if let Some(addr) = self.destination {
            w.write_bytes(&addr)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let source = if flags & MAC_FLAG_SOUR != 0 {
            Some(r.read_bytes(6)?.try_into().unwrap())
        } else {
            None
        };
        let destination = if flags & MAC_FLAG_DEST != 0 {
            Some(r.read_bytes(6)?.try_into().unwrap())
        } else {
            None
        };
        Ok(MacAddress {
            source,
            destination,
        })
    }
}

scalar_ie!(
    #[doc = " Ethertype of the frames a filter matches."]
    Ethertype, u16, Ethertype, write_u16, read_u16, 2
);

/// 802.1Q tag fields: PCP, DEI, VID packed into three octets the way
/// TS 29.244 lays out C-TAG and S-TAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VlanTag {
    pub pcp: u8,
    pub dei: bool,
    pub vid: u16,
}

impl VlanTag {
    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        // Octet 5: flags indicating which fields are meaningful; all three
        // are always carried here.
        w.write_u8(0x07)?;
        w.write_u8(((self.pcp & 0x07) << 5) | ((self.dei as u8) << 4) | ((self.vid >> 8) as u8 & 0x0F))?;
        w.write_u8((self.vid & 0xFF) as u8)
    }

    fn parse(body: &[u8], context: &'static str) -> Result<Self, PfcpError> {
        if body.len() < 3 {
            return Err(PfcpError::too_short(context, 3, body.len()));
        }
        Ok(VlanTag {
            pcp: (body[1] >> 5) & 0x07,
            dei: body[1] & 0x10 != 0,
            vid: ((body[1] as u16 & 0x0F) << 8) | body[2] as u16,
        })
    }
}

/// Customer VLAN tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CTag {
    pub tag: VlanTag,
}

impl IeBody for CTag {
    const TYPE: IeType = IeType::CTag;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.tag.emit(w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        Ok(CTag {
            tag: VlanTag::parse(body, "C-TAG")?,
        })
    }
}

/// Service VLAN tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct STag {
    pub tag: VlanTag,
}

impl IeBody for STag {
    const TYPE: IeType = IeType::STag;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.tag.emit(w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        Ok(STag {
            tag: VlanTag::parse(body, "S-TAG")?,
        })
    }
}

/// Ethernet Packet Filter: the layer-2 counterpart of the SDF filter,
/// grouped from MAC/VLAN/ethertype children plus optional IP filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EthernetPacketFilter {
    pub filter_id: Option<EthernetFilterId>,
    pub properties: Option<EthernetFilterProperties>,
    pub mac_address: Option<MacAddress>,
    pub ethertype: Option<Ethertype>,
    pub c_tag: Option<CTag>,
    pub s_tag: Option<STag>,
    pub sdf_filters: Vec<SdfFilter>,
}

impl IeBody for EthernetPacketFilter {
    const TYPE: IeType = IeType::EthernetPacketFilter;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        if let Some(id) = &self.filter_id {
            id.encode(w)?;
        }
        if let Some(props) = &self.properties {
            props.encode(w)?;
        }
        if let Some(mac) = &self.mac_address {
            mac.encode(w)?;
        }
        if let Some(ethertype) = &self.ethertype {
            ethertype.encode(w)?;
        }
        if let Some(c_tag) = &self.c_tag {
            c_tag.encode(w)?;
        }
        if let Some(s_tag) = &self.s_tag {
            s_tag.encode(w)?;
        }
        for sdf in &self.sdf_filters {
            sdf.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut filter = EthernetPacketFilter::default();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::EthernetFilterId => put_slot(
                    &mut filter.filter_id,
                    EthernetFilterId::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::EthernetFilterProperties => put_slot(
                    &mut filter.properties,
                    EthernetFilterProperties::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::MacAddress => put_slot(
                    &mut filter.mac_address,
                    MacAddress::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::Ethertype => put_slot(
                    &mut filter.ethertype,
                    Ethertype::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::CTag => put_slot(
                    &mut filter.c_tag,
                    CTag::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::STag => put_slot(
                    &mut filter.s_tag,
                    STag::parse(child.body)?,
                    child.ie_type,
                    "Ethernet Packet Filter",
                ),
                IeType::SdfFilter => filter.sdf_filters.push(SdfFilter::parse(child.body)?),
                _ => {}
            }
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_round_trip() {
        let mac = MacAddress {
            source: Some([0, 1, 2, 3, 4, 5]),
            destination: Some([6, 7, 8, 9, 10, 11]),
        };
        let ie = mac.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 1 + 6 + 6);
        assert_eq!(MacAddress::parse(&ie.payload).unwrap(), mac);
    }

    #[test]
    fn vlan_tag_packing() {
        let tag = CTag {
            tag: VlanTag {
                pcp: 5,
                dei: true,
                vid: 0x123,
            },
        };
        let ie = tag.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x07, 0xB1, 0x23]);
        assert_eq!(CTag::parse(&ie.payload).unwrap(), tag);
    }

    #[test]
    fn ethernet_packet_filter_round_trip() {
        let filter = EthernetPacketFilter {
            filter_id: Some(EthernetFilterId::new(1)),
            properties: Some(EthernetFilterProperties::BIDE),
            mac_address: Some(MacAddress::source([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])),
            ethertype: Some(Ethertype::new(0x0800)),
            c_tag: None,
            s_tag: None,
            sdf_filters: vec![SdfFilter::flow("permit out ip from any to any")],
        };
        let ie = filter.to_ie().unwrap();
        assert_eq!(EthernetPacketFilter::parse(&ie.payload).unwrap(), filter);
    }

    #[test]
    fn unknown_children_skipped() {
        let mut body = Vec::new();
        // unrecognised child followed by an ethertype
        body.extend_from_slice(&[0x0F, 0xA0, 0x00, 0x01, 0x55]);
        body.extend_from_slice(&[0x00, 0x88, 0x00, 0x02, 0x08, 0x06]);
        let filter = EthernetPacketFilter::parse(&body).unwrap();
        assert_eq!(filter.ethertype, Some(Ethertype::new(0x0806)));
    }
}
