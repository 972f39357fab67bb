//! Outer Header Creation and Outer Header Removal Information Elements.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

// Outer Header Creation description bitmap, octets 5-6.
const DESC_GTPU_UDP_IPV4: u16 = 0x0100;
const DESC_GTPU_UDP_IPV6: u16 = 0x0200;
const DESC_UDP_IPV4: u16 = 0x0400;
const DESC_UDP_IPV6: u16 = 0x0800;

/// Outer Header Creation: the encapsulation a FAR applies before forwarding.
///
/// The description bitmap gates which of TEID, address, and port follow.
/// GTP-U encapsulations carry a TEID; plain UDP encapsulations carry a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OuterHeaderCreation {
    pub description: u16,
    pub teid: Option<u32>,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    pub port: Option<u16>,
}

impl OuterHeaderCreation {
    pub fn gtpu_ipv4(teid: u32, addr: Ipv4Addr) -> Self {
        OuterHeaderCreation {
            description: DESC_GTPU_UDP_IPV4,
            teid: Some(teid),
            ipv4: Some(addr),
            ..Default::default()
        }
    }

    pub fn gtpu_ipv6(teid: u32, addr: Ipv6Addr) -> Self {
        OuterHeaderCreation {
            description: DESC_GTPU_UDP_IPV6,
            teid: Some(teid),
            ipv6: Some(addr),
            ..Default::default()
        }
    }

    pub fn udp_ipv4(addr: Ipv4Addr, port: u16) -> Self {
        OuterHeaderCreation {
            description: DESC_UDP_IPV4,
            ipv4: Some(addr),
            port: Some(port),
            ..Default::default()
        }
    }

    fn wants_teid(description: u16) -> bool {
        description & (DESC_GTPU_UDP_IPV4 | DESC_GTPU_UDP_IPV6) != 0
    }

    fn wants_ipv4(description: u16) -> bool {
        description & (DESC_GTPU_UDP_IPV4 | DESC_UDP_IPV4) != 0
    }

    fn wants_ipv6(description: u16) -> bool {
        description & (DESC_GTPU_UDP_IPV6 | DESC_UDP_IPV6) != 0
    }

    fn wants_port(description: u16) -> bool {
        description & (DESC_UDP_IPV4 | DESC_UDP_IPV6) != 0
    }
}

impl IeBody for OuterHeaderCreation {
    const TYPE: IeType = IeType::OuterHeaderCreation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u16(self.description)?;
        if Self::wants_teid(self.description) {
            w.write_u32(self.teid.unwrap_or(0))?;
        }
        if Self::wants_ipv4(self.description) {
            w.write_bytes(&self.ipv4.unwrap_or(Ipv4Addr::UNSPECIFIED).octets())?;
        }
        if Self::wants_ipv6(self.description) {
            w.write_bytes(&self.ipv6.unwrap_or(Ipv6Addr::UNSPECIFIED).octets())?;
        }
        if Self::wants_port(self.description) {
            w.write_u16(self.port.unwrap_or(0))?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let description = r.read_u16()?;
        let teid = if Self::wants_teid(description) {
            Some(r.read_u32()?)
        } else {
            None
        };
        let ipv4 = if Self::wants_ipv4(description) {
            let octets: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
            Some(Ipv4Addr::from(octets))
        } else {
            None
        };
        let ipv6 = if Self::wants_ipv6(description) {
            let octets: [u8; 16] = r.read_bytes(16)?.try_into().unwrap();
            Some(Ipv6Addr::from(octets))
        } else {
            None
        };
        let port = if Self::wants_port(description) {
            Some(r.read_u16()?)
        } else {
            None
        };
        Ok(OuterHeaderCreation {
            description,
            teid,
            ipv4,
            ipv6,
            port,
        })
    }
}

/// Outer Header Removal values per TS 29.244 §8.2.64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuterHeaderRemovalDescription {
    GtpuUdpIpv4,
    GtpuUdpIpv6,
    UdpIpv4,
    UdpIpv6,
    Ipv4,
    Ipv6,
    GtpuUdpIp,
    VlanSTag,
    STagAndCTag,
    Unknown(u8),
}

impl OuterHeaderRemovalDescription {
    pub fn code(self) -> u8 {
        match self {
            Self::GtpuUdpIpv4 => 0,
            Self::GtpuUdpIpv6 => 1,
            Self::UdpIpv4 => 2,
            Self::UdpIpv6 => 3,
            Self::Ipv4 => 4,
            Self::Ipv6 => 5,
            Self::GtpuUdpIp => 6,
            Self::VlanSTag => 7,
            Self::STagAndCTag => 8,
            Self::Unknown(v) => v,
        }
    }
}

impl From<u8> for OuterHeaderRemovalDescription {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::GtpuUdpIpv4,
            1 => Self::GtpuUdpIpv6,
            2 => Self::UdpIpv4,
            3 => Self::UdpIpv6,
            4 => Self::Ipv4,
            5 => Self::Ipv6,
            6 => Self::GtpuUdpIp,
            7 => Self::VlanSTag,
            8 => Self::STagAndCTag,
            other => Self::Unknown(other),
        }
    }
}

/// Outer Header Removal: which encapsulation a PDR strips on match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuterHeaderRemoval {
    pub description: OuterHeaderRemovalDescription,
}

impl OuterHeaderRemoval {
    pub fn new(description: OuterHeaderRemovalDescription) -> Self {
        OuterHeaderRemoval { description }
    }
}

impl IeBody for OuterHeaderRemoval {
    const TYPE: IeType = IeType::OuterHeaderRemoval;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.description.code())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        // A second octet (GTP-U extension header deletion) exists in later
        // releases; tolerated and ignored.
        match body.first() {
            Some(&v) => Ok(OuterHeaderRemoval::new(v.into())),
            None => Err(PfcpError::too_short("Outer Header Removal", 1, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtpu_ipv4_round_trip() {
        let ohc = OuterHeaderCreation::gtpu_ipv4(0xDEAD_BEEF, Ipv4Addr::new(10, 1, 2, 3));
        let ie = ohc.to_ie().unwrap();
        assert_eq!(
            ie.payload,
            vec![0x01, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 10, 1, 2, 3]
        );
        assert_eq!(OuterHeaderCreation::parse(&ie.payload).unwrap(), ohc);
    }

    #[test]
    fn udp_ipv4_carries_port_not_teid() {
        let ohc = OuterHeaderCreation::udp_ipv4(Ipv4Addr::new(192, 0, 2, 1), 2152);
        let ie = ohc.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 2 + 4 + 2);
        let parsed = OuterHeaderCreation::parse(&ie.payload).unwrap();
        assert_eq!(parsed.teid, None);
        assert_eq!(parsed.port, Some(2152));
    }

    #[test]
    fn truncated_creation_rejected() {
        let body = [0x01, 0x00, 0xDE, 0xAD];
        assert!(OuterHeaderCreation::parse(&body).is_err());
    }

    #[test]
    fn removal_round_trip() {
        let ohr = OuterHeaderRemoval::new(OuterHeaderRemovalDescription::GtpuUdpIpv4);
        let ie = ohr.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0]);
        assert_eq!(OuterHeaderRemoval::parse(&ie.payload).unwrap(), ohr);
    }

    #[test]
    fn removal_preserves_unknown_description() {
        let parsed = OuterHeaderRemoval::parse(&[42]).unwrap();
        assert_eq!(
            parsed.description,
            OuterHeaderRemovalDescription::Unknown(42)
        );
    }
}
