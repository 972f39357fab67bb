//! F-TEID Information Element.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

const FLAG_V4: u8 = 0x01;
const FLAG_V6: u8 = 0x02;
const FLAG_CH: u8 = 0x04;
const FLAG_CHID: u8 = 0x08;

/// F-TEID: a GTP-U tunnel endpoint, or a request for the peer to choose one.
///
/// With the CHOOSE flag set the TEID and addresses are meaningless on the
/// wire and are not transmitted; the V4/V6 flags then only say which address
/// family the peer shall allocate from. CHOOSE ID lets several rules share
/// whatever the peer picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fteid {
    pub v4: bool,
    pub v6: bool,
    pub ch: bool,
    pub chid: bool,
    pub teid: u32,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    pub choose_id: u8,
}

impl Fteid {
    pub fn ipv4(teid: u32, addr: Ipv4Addr) -> Self {
        Fteid {
            v4: true,
            teid,
            ipv4: Some(addr),
            ..Default::default()
        }
    }

    pub fn ipv6(teid: u32, addr: Ipv6Addr) -> Self {
        Fteid {
            v6: true,
            teid,
            ipv6: Some(addr),
            ..Default::default()
        }
    }

    /// Defers allocation to the peer for the given address families.
    pub fn choose(v4: bool, v6: bool) -> Self {
        Fteid {
            v4,
            v6,
            ch: true,
            ..Default::default()
        }
    }

    /// Defers allocation and tags the request so several rules can share the
    /// peer's pick.
    pub fn choose_with_id(v4: bool, v6: bool, choose_id: u8) -> Self {
        Fteid {
            v4,
            v6,
            ch: true,
            chid: true,
            choose_id,
            ..Default::default()
        }
    }
}

impl IeBody for Fteid {
    const TYPE: IeType = IeType::Fteid;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.v4 {
            flags |= FLAG_V4;
        }
        if self.v6 {
            flags |= FLAG_V6;
        }
        if self.ch {
            flags |= FLAG_CH;
        }
        if self.chid {
            flags |= FLAG_CHID;
        }
        w.write_u8(flags)?;
        w.write_u32(if self.ch { 0 } else { self.teid })?;
        if !self.ch {
            if let Some(addr) = self.ipv4 {
                w.write_bytes(&addr.octets())?;
            }
            if let Some(addr) = self.ipv6 {
                w.write_bytes(&addr.octets())?;
            }
        }
        if self.chid {
            w.write_u8(self.choose_id)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        let v4 = flags & FLAG_V4 != 0;
        let v6 = flags & FLAG_V6 != 0;
        let ch = flags & FLAG_CH != 0;
        let chid = flags & FLAG_CHID != 0;
        let teid = r.read_u32()?;
        let ipv4 = if v4 && !ch {
            let octets: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
            Some(Ipv4Addr::from(octets))
        } else {
            None
        };
        let ipv6 = if v6 && !ch {
            let octets: [u8; 16] = r.read_bytes(16)?.try_into().unwrap();
            Some(Ipv6Addr::from(octets))
        } else {
            None
        };
        let choose_id = if chid { r.read_u8()? } else { 0 };
        Ok(Fteid {
            v4,
            v6,
            ch,
            chid,
            teid,
            ipv4,
            ipv6,
            choose_id,
        })
    }
}

/// Builder validating the flag/field combinations before they hit the wire.
#[derive(Debug, Default)]
pub struct FteidBuilder {
    teid: Option<u32>,
    ipv4: Option<Ipv4Addr>,
    ipv6: Option<Ipv6Addr>,
    choose: bool,
    choose_id: Option<u8>,
}

impl FteidBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teid(mut self, teid: u32) -> Self {
        self.teid = Some(teid);
        self
    }

    pub fn ipv4(mut self, addr: Ipv4Addr) -> Self {
        self.ipv4 = Some(addr);
        self
    }

    pub fn ipv6(mut self, addr: Ipv6Addr) -> Self {
        self.ipv6 = Some(addr);
        self
    }

    pub fn choose(mut self) -> Self {
        self.choose = true;
        self
    }

    pub fn choose_id(mut self, id: u8) -> Self {
        self.choose = true;
        self.choose_id = Some(id);
        self
    }

    pub fn build(self) -> Result<Fteid, PfcpError> {
        if self.choose {
            // With CHOOSE the address setters only select the family the
            // peer allocates from; IPv4 is the default.
            let v6 = self.ipv6.is_some();
            let v4 = self.ipv4.is_some() || !v6;
            let mut fteid = Fteid::choose(v4, v6);
            if let Some(id) = self.choose_id {
                fteid.chid = true;
                fteid.choose_id = id;
            }
            return Ok(fteid);
        }
        let teid = self.teid.ok_or(PfcpError::InvalidValue {
            context: "F-TEID without TEID or CHOOSE",
            value: 0,
        })?;
        if self.ipv4.is_none() && self.ipv6.is_none() {
            return Err(PfcpError::InvalidValue {
                context: "F-TEID without address",
                value: teid as u64,
            });
        }
        Ok(Fteid {
            v4: self.ipv4.is_some(),
            v6: self.ipv6.is_some(),
            ch: false,
            chid: false,
            teid,
            ipv4: self.ipv4,
            ipv6: self.ipv6,
            choose_id: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_wire_layout() {
        let fteid = Fteid::ipv4(0x1234_5678, Ipv4Addr::new(10, 0, 0, 1));
        let ie = fteid.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x01, 0x12, 0x34, 0x56, 0x78, 10, 0, 0, 1]);
        assert_eq!(Fteid::parse(&ie.payload).unwrap(), fteid);
    }

    #[test]
    fn choose_has_no_trailing_address() {
        let fteid = Fteid::choose(true, false);
        let ie = fteid.to_ie().unwrap();
        // flags + zero TEID only
        assert_eq!(ie.payload, vec![FLAG_V4 | FLAG_CH, 0, 0, 0, 0]);
        let parsed = Fteid::parse(&ie.payload).unwrap();
        assert!(parsed.ch);
        assert!(parsed.v4);
        assert!(!parsed.v6);
        assert_eq!(parsed.ipv4, None);
    }

    #[test]
    fn choose_id_round_trip() {
        let fteid = Fteid::choose_with_id(false, true, 7);
        let ie = fteid.to_ie().unwrap();
        assert_eq!(ie.payload, vec![FLAG_V6 | FLAG_CH | FLAG_CHID, 0, 0, 0, 0, 7]);
        assert_eq!(Fteid::parse(&ie.payload).unwrap(), fteid);
    }

    #[test]
    fn dual_stack_round_trip() {
        let fteid = Fteid {
            v4: true,
            v6: true,
            teid: 99,
            ipv4: Some(Ipv4Addr::new(172, 16, 0, 1)),
            ipv6: Some("fd00::1".parse().unwrap()),
            ..Default::default()
        };
        let ie = fteid.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 1 + 4 + 4 + 16);
        assert_eq!(Fteid::parse(&ie.payload).unwrap(), fteid);
    }

    #[test]
    fn v6_flag_without_address_rejected() {
        let body = [FLAG_V6, 0, 0, 0, 1, 0xAA, 0xBB];
        assert!(matches!(
            Fteid::parse(&body),
            Err(PfcpError::InvalidLength { .. })
        ));
    }

    #[test]
    fn builder_requires_address_or_choose() {
        assert!(FteidBuilder::new().teid(1).build().is_err());
        let ok = FteidBuilder::new()
            .teid(1)
            .ipv4(Ipv4Addr::LOCALHOST)
            .build()
            .unwrap();
        assert!(ok.v4 && !ok.ch);
        let ch = FteidBuilder::new().choose_id(3).build().unwrap();
        assert!(ch.ch && ch.chid);
        assert_eq!(ch.choose_id, 3);
    }
}
