//! F-SEID Information Element.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

const FLAG_V6: u8 = 0x01;
const FLAG_V4: u8 = 0x02;

/// F-SEID: a 64-bit session endpoint identifier paired with the IP address
/// the assigning node listens on. At least one address family must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fseid {
    pub seid: u64,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl Fseid {
    pub fn new(seid: u64, ipv4: Option<Ipv4Addr>, ipv6: Option<Ipv6Addr>) -> Self {
        Fseid { seid, ipv4, ipv6 }
    }

    pub fn ipv4(seid: u64, addr: Ipv4Addr) -> Self {
        Fseid::new(seid, Some(addr), None)
    }

    pub fn ipv6(seid: u64, addr: Ipv6Addr) -> Self {
        Fseid::new(seid, None, Some(addr))
    }
}

impl IeBody for Fseid {
    const TYPE: IeType = IeType::Fseid;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.ipv6.is_some() {
            flags |= FLAG_V6;
        }
        if self.ipv4.is_some() {
            flags |= FLAG_V4;
        }
        w.write_u8(flags)?;
        w.write_u64(self.seid)?;
        if let Some(addr) = self.ipv4 {
            w.write_bytes(&addr.octets())?;
        }
        if let Some(addr) = self.ipv6 {
            w.write_bytes(&addr.octets())?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = crate::codec::Reader::new(body);
        let flags = r.read_u8()?;
        let seid = r.read_u64()?;
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
        Ok(Fseid { seid, ipv4, ipv6 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_wire_layout() {
        let fseid = Fseid::ipv4(0x1234_5678_90AB_CDEF, Ipv4Addr::new(10, 0, 0, 1));
        let ie = fseid.to_ie().unwrap();
        assert_eq!(
            ie.payload,
            vec![0x02, 0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF, 10, 0, 0, 1]
        );
        assert_eq!(Fseid::parse(&ie.payload).unwrap(), fseid);
    }

    #[test]
    fn dual_stack_round_trip() {
        let fseid = Fseid::new(
            42,
            Some(Ipv4Addr::new(192, 168, 0, 1)),
            Some("2001:db8::2".parse().unwrap()),
        );
        let ie = fseid.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 1 + 8 + 4 + 16);
        assert_eq!(ie.payload[0], FLAG_V4 | FLAG_V6);
        assert_eq!(Fseid::parse(&ie.payload).unwrap(), fseid);
    }

    #[test]
    fn flag_without_address_is_invalid_length() {
        // V4 set but no trailing address bytes.
        let body = [0x02, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            Fseid::parse(&body),
            Err(PfcpError::InvalidLength { .. })
        ));
    }

    #[test]
    fn spare_flag_bits_ignored() {
        let mut body = vec![0xF2u8];
        body.extend_from_slice(&42u64.to_be_bytes());
        body.extend_from_slice(&[10, 0, 0, 9]);
        let fseid = Fseid::parse(&body).unwrap();
        assert_eq!(fseid.ipv4, Some(Ipv4Addr::new(10, 0, 0, 9)));
        assert_eq!(fseid.ipv6, None);
    }
}
