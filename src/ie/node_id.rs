//! Node ID Information Element.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// Node ID: a one-octet discriminator followed by an IPv4 address, an IPv6
/// address, or an FQDN. Discriminators beyond the three assigned values are
/// reserved by 3GPP; they are preserved rather than rejected so a node can
/// forward what it does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeId {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Fqdn(String),
    Unknown { discriminator: u8, raw: Vec<u8> },
}

impl NodeId {
    pub fn from_ip(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => NodeId::Ipv4(v4),
            IpAddr::V6(v6) => NodeId::Ipv6(v6),
        }
    }

    pub fn fqdn(name: &str) -> Self {
        NodeId::Fqdn(name.to_string())
    }
}

impl IeBody for NodeId {
    const TYPE: IeType = IeType::NodeId;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        match self {
            NodeId::Ipv4(addr) => {
                w.write_u8(0)?;
                w.write_bytes(&addr.octets())
            }
            NodeId::Ipv6(addr) => {
                w.write_u8(1)?;
                w.write_bytes(&addr.octets())
            }
            NodeId::Fqdn(name) => {
                w.write_u8(2)?;
                w.write_bytes(name.as_bytes())
            }
            NodeId::Unknown { discriminator, raw } => {
                w.write_u8(*discriminator)?;
                w.write_bytes(raw)
            }
        }
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let (&disc, rest) = body
            .split_first()
            .ok_or_else(|| PfcpError::too_short("Node ID", 1, 0))?;
        match disc {
            0 => {
                if rest.len() < 4 {
                    return Err(PfcpError::too_short("Node ID IPv4", 4, rest.len()));
                }
                let octets: [u8; 4] = rest[..4].try_into().unwrap();
                Ok(NodeId::Ipv4(Ipv4Addr::from(octets)))
            }
            1 => {
                if rest.len() < 16 {
                    return Err(PfcpError::too_short("Node ID IPv6", 16, rest.len()));
                }
                let octets: [u8; 16] = rest[..16].try_into().unwrap();
                Ok(NodeId::Ipv6(Ipv6Addr::from(octets)))
            }
            // FQDN length is implicit: the IE length minus the discriminator.
            2 => match String::from_utf8(rest.to_vec()) {
                Ok(name) => Ok(NodeId::Fqdn(name)),
                Err(_) => Err(PfcpError::InvalidValue {
                    context: "Node ID FQDN",
                    value: disc as u64,
                }),
            },
            other => Ok(NodeId::Unknown {
                discriminator: other,
                raw: rest.to_vec(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_round_trip() {
        let id = NodeId::Ipv4(Ipv4Addr::new(192, 168, 1, 1));
        let ie = id.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0, 192, 168, 1, 1]);
        assert_eq!(NodeId::parse(&ie.payload).unwrap(), id);
    }

    #[test]
    fn ipv6_round_trip() {
        let id = NodeId::Ipv6("2001:db8::1".parse().unwrap());
        let ie = id.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 17);
        assert_eq!(NodeId::parse(&ie.payload).unwrap(), id);
    }

    #[test]
    fn fqdn_round_trip() {
        let id = NodeId::fqdn("smf.example.org");
        let ie = id.to_ie().unwrap();
        assert_eq!(NodeId::parse(&ie.payload).unwrap(), id);
    }

    #[test]
    fn reserved_discriminator_preserved() {
        let body = [7u8, 0xDE, 0xAD];
        let id = NodeId::parse(&body).unwrap();
        assert_eq!(
            id,
            NodeId::Unknown {
                discriminator: 7,
                raw: vec![0xDE, 0xAD]
            }
        );
        assert_eq!(id.to_ie().unwrap().payload, body.to_vec());
    }

    #[test]
    fn truncated_addresses_rejected() {
        assert!(NodeId::parse(&[0, 10, 0]).is_err());
        assert!(NodeId::parse(&[1, 0, 0, 0]).is_err());
        assert!(NodeId::parse(&[]).is_err());
    }
}
