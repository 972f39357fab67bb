//! UE IP Address Information Element.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

const FLAG_V6: u8 = 0x01;
const FLAG_V4: u8 = 0x02;
const FLAG_SD: u8 = 0x04;
const FLAG_IPV6D: u8 = 0x08;
const FLAG_CHV4: u8 = 0x10;
const FLAG_CHV6: u8 = 0x20;

/// UE IP Address: the address (or request to choose one) a PDR matches on.
///
/// `source` distinguishes whether the address is the packet source (uplink)
/// or destination (downlink). The CHOOSE bits ask the UPF to allocate; like
/// F-TEID, a CHOOSE bit suppresses the corresponding address bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeIpAddress {
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    /// S/D bit: set when the address is a destination address.
    pub destination: bool,
    /// IPv6 prefix delegation length, when signalled.
    pub ipv6_prefix_delegation: Option<u8>,
    pub choose_v4: bool,
    pub choose_v6: bool,
}

impl UeIpAddress {
    pub fn ipv4(addr: Ipv4Addr) -> Self {
        UeIpAddress {
            ipv4: Some(addr),
            ..Default::default()
        }
    }

    pub fn ipv6(addr: Ipv6Addr) -> Self {
        UeIpAddress {
            ipv6: Some(addr),
            ..Default::default()
        }
    }

    pub fn choose(v4: bool, v6: bool) -> Self {
        UeIpAddress {
            choose_v4: v4,
            choose_v6: v6,
            ..Default::default()
        }
    }
}

impl IeBody for UeIpAddress {
    const TYPE: IeType = IeType::UeIpAddress;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.ipv6.is_some() {
            flags |= FLAG_V6;
        }
        if self.ipv4.is_some() {
            flags |= FLAG_V4;
        }
        if self.destination {
            flags |= FLAG_SD;
        }
        if self.ipv6_prefix_delegation.is_some() {
            flags |= FLAG_IPV6D;
        }
        if self.choose_v4 {
            flags |= FLAG_CHV4;
        }
        if self.choose_v6 {
            flags |= FLAG_CHV6;
        }
        w.write_u8(flags)?;
        if let Some(addr) = self.ipv4 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(addr) = self.ipv6 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(len) = self.ipv6_prefix_delegation {
            w.write_u8(len)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let ipv4 = if flags & FLAG_V4 != 0 {
            let octets: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
            Some(Ipv4Addr::from(octets))
        } else {
            None
        };
        let ipv6 = if flags & FLAG_V6 != 0 {
            let octets: [u8; 16] = r.read_bytes(16)?.try_into().unwrap();
            Some(Ipv6Addr::from(octets))
        } else {
            None
        };
        let ipv6_prefix_delegation = if flags & FLAG_IPV6D != 0 {
            Some(r.read_u8()?)
        } else {
            None
        };
        Ok(UeIpAddress {
            ipv4,
            ipv6,
            destination: flags & FLAG_SD != 0,
            ipv6_prefix_delegation,
            choose_v4: flags & FLAG_CHV4 != 0,
            choose_v6: flags & FLAG_CHV6 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_round_trip() {
        let ue = UeIpAddress::ipv4(Ipv4Addr::new(100, 64, 0, 1));
        let ie = ue.to_ie().unwrap();
        assert_eq!(ie.payload, vec![FLAG_V4, 100, 64, 0, 1]);
        assert_eq!(UeIpAddress::parse(&ie.payload).unwrap(), ue);
    }

    #[test]
    fn destination_bit_round_trip() {
        let ue = UeIpAddress {
            ipv4: Some(Ipv4Addr::new(100, 64, 0, 2)),
            destination: true,
            ..Default::default()
        };
        let ie = ue.to_ie().unwrap();
        assert_eq!(ie.payload[0], FLAG_V4 | FLAG_SD);
        assert_eq!(UeIpAddress::parse(&ie.payload).unwrap(), ue);
    }

    #[test]
    fn choose_carries_no_address() {
        let ue = UeIpAddress::choose(true, false);
        let ie = ue.to_ie().unwrap();
        assert_eq!(ie.payload, vec![FLAG_CHV4]);
        assert_eq!(UeIpAddress::parse(&ie.payload).unwrap(), ue);
    }

    #[test]
    fn prefix_delegation_round_trip() {
        let ue = UeIpAddress {
            ipv6: Some("2001:db8:1::".parse().unwrap()),
            ipv6_prefix_delegation: Some(56),
            ..Default::default()
        };
        let ie = ue.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 1 + 16 + 1);
        assert_eq!(UeIpAddress::parse(&ie.payload).unwrap(), ue);
    }

    #[test]
    fn short_body_rejected() {
        assert!(UeIpAddress::parse(&[FLAG_V6, 1, 2]).is_err());
    }
}
