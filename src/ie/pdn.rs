//! PDU session attribute Information Elements: PDN Type, S-NSSAI, and
//! User Plane IP Resource Information.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// PDN Type: the kind of PDU session being established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdnType {
    Ipv4,
    Ipv6,
    Ipv4v6,
    NonIp,
    Ethernet,
    Unknown(u8),
}

impl PdnType {
    pub fn code(self) -> u8 {
        match self {
            PdnType::Ipv4 => 1,
            PdnType::Ipv6 => 2,
            PdnType::Ipv4v6 => 3,
            PdnType::NonIp => 4,
            PdnType::Ethernet => 5,
            PdnType::Unknown(v) => v,
        }
    }
}

impl From<u8> for PdnType {
    fn from(v: u8) -> Self {
        match v {
            1 => PdnType::Ipv4,
            2 => PdnType::Ipv6,
            3 => PdnType::Ipv4v6,
            4 => PdnType::NonIp,
            5 => PdnType::Ethernet,
            other => PdnType::Unknown(other),
        }
    }
}

impl IeBody for PdnType {
    const TYPE: IeType = IeType::PdnType;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.code() & 0x07)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(PdnType::from(v & 0x07)),
            None => Err(PfcpError::too_short("PDN Type", 1, 0)),
        }
    }
}

/// S-NSSAI: slice/service type plus 24-bit slice differentiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snssai {
    pub sst: u8,
    pub sd: u32,
}

impl Snssai {
    pub fn new(sst: u8, sd: u32) -> Self {
        Snssai {
            sst,
            sd: sd & 0x00FF_FFFF,
        }
    }
}

impl IeBody for Snssai {
    const TYPE: IeType = IeType::Snssai;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.sst)?;
        w.write_u24(self.sd)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let sst = r.read_u8()?;
        let sd = r.read_u24()?;
        Ok(Snssai { sst, sd })
    }
}

const UPIRI_V4: u8 = 0x01;
const UPIRI_V6: u8 = 0x02;
const UPIRI_TEIDRI_MASK: u8 = 0x1C;
const UPIRI_ASSONI: u8 = 0x20;
const UPIRI_ASSOSI: u8 = 0x40;

/// User Plane IP Resource Information: GTP-U addresses and TEID ranges a UP
/// function advertises at association time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPlaneIpResourceInformation {
    /// Number of significant bits in `teid_range` (0 disables partitioning).
    pub teid_range_indication: u8,
    pub teid_range: u8,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    pub network_instance: Option<String>,
    pub source_interface: Option<u8>,
}

impl UserPlaneIpResourceInformation {
    pub fn ipv4(addr: Ipv4Addr) -> Self {
        UserPlaneIpResourceInformation {
            ipv4: Some(addr),
            ..Default::default()
        }
    }
}

impl IeBody for UserPlaneIpResourceInformation {
    const TYPE: IeType = IeType::UserPlaneIpResourceInformation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = (self.teid_range_indication & 0x07) << 2;
        if self.ipv4.is_some() {
            flags |= UPIRI_V4;
        }
        if self.ipv6.is_some() {
            flags |= UPIRI_V6;
        }
        if self.network_instance.is_some() {
            flags |= UPIRI_ASSONI;
        }
        if self.source_interface.is_some() {
            flags |= UPIRI_ASSOSI;
        }
        w.write_u8(flags)?;
        if self.teid_range_indication != 0 {
            w.write_u8(self.teid_range)?;
        }
        if let Some(addr) = self.ipv4 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(addr) = self.ipv6 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(ni) = &self.network_instance {
            w.write_bytes(ni.as_bytes())?;
        }
        if let Some(si) = self.source_interface {
            w.write_u8(si & 0x0F)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let teid_range_indication = (flags & UPIRI_TEIDRI_MASK) >> 2;
        let teid_range = if teid_range_indication != 0 {
            r.read_u8()?
        } else {
            0
        };
        let ipv4 = if flags & UPIRI_V4 != 0 {
            let octets: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
            Some(Ipv4Addr::from(octets))
        } else {
            None
        };
        let ipv6 = if flags & UPIRI_V6 != 0 {
            let octets: [u8; 16] = r.read_bytes(16)?.try_into().unwrap();
            Some(Ipv6Addr::from(octets))
        } else {
            None
        };
        // Network instance runs to the end of the body, or to the source
        // interface octet when ASSOSI is set.
        let with_si = flags & UPIRI_ASSOSI != 0;
        let network_instance = if flags & UPIRI_ASSONI != 0 {
            let len = r.remaining().saturating_sub(if with_si { 1 } else { 0 });
            let bytes = r.read_bytes(len)?;
            match String::from_utf8(bytes.to_vec()) {
                Ok(ni) => Some(ni),
                Err(_) => {
                    return Err(PfcpError::InvalidValue {
                        context: "UP IP Resource network instance",
                        value: len as u64,
                    })
                }
            }
        } else {
            None
        };
        let source_interface = if with_si {
            Some(r.read_u8()? & 0x0F)
        } else {
            None
        };
        Ok(UserPlaneIpResourceInformation {
            teid_range_indication,
            teid_range,
            ipv4,
            ipv6,
            network_instance,
            source_interface,
        })
    }
}
