//! Traffic classification Information Elements: Network Instance,
//! Application ID, and the SDF Filter.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// Network Instance: an opaque routing-context name. Zero length is legal
/// and means "clear" in update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInstance {
    pub name: String,
}

impl NetworkInstance {
    pub fn new(name: &str) -> Self {
        NetworkInstance {
            name: name.to_string(),
        }
    }
}

impl IeBody for NetworkInstance {
    const TYPE: IeType = IeType::NetworkInstance;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_bytes(self.name.as_bytes())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match String::from_utf8(body.to_vec()) {
            Ok(name) => Ok(NetworkInstance { name }),
            Err(_) => Err(PfcpError::InvalidValue {
                context: "Network Instance",
                value: body.len() as u64,
            }),
        }
    }
}

/// Application ID: references a predefined application detection filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationId {
    pub identifier: String,
}

impl ApplicationId {
    pub fn new(identifier: &str) -> Self {
        ApplicationId {
            identifier: identifier.to_string(),
        }
    }
}

impl IeBody for ApplicationId {
    const TYPE: IeType = IeType::ApplicationId;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_bytes(self.identifier.as_bytes())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match String::from_utf8(body.to_vec()) {
            Ok(identifier) => Ok(ApplicationId { identifier }),
            Err(_) => Err(PfcpError::InvalidValue {
                context: "Application ID",
                value: body.len() as u64,
            }),
        }
    }
}

const FLAG_FD: u8 = 0x01;
const FLAG_TTC: u8 = 0x02;
const FLAG_SPI: u8 = 0x04;
const FLAG_FL: u8 = 0x08;
const FLAG_BID: u8 = 0x10;

/// SDF Filter: an IPFilterRule-style flow description plus optional ToS,
/// IPsec SPI, flow label, and filter id fields, each gated by a flag bit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SdfFilter {
    pub flow_description: Option<String>,
    pub tos_traffic_class: Option<u16>,
    pub security_parameter_index: Option<u32>,
    /// 24-bit IPv6 flow label.
    pub flow_label: Option<u32>,
    pub filter_id: Option<u32>,
}

impl SdfFilter {
    pub fn flow(description: &str) -> Self {
        SdfFilter {
            flow_description: Some(description.to_string()),
            ..Default::default()
        }
    }
}

impl IeBody for SdfFilter {
    const TYPE: IeType = IeType::SdfFilter;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.flow_description.is_some() {
            flags |= FLAG_FD;
        }
        if self.tos_traffic_class.is_some() {
            flags |= FLAG_TTC;
        }
        if self.security_parameter_index.is_some() {
            flags |= FLAG_SPI;
        }
        if self.flow_label.is_some() {
            flags |= FLAG_FL;
        }
        if self.filter_id.is_some() {
            flags |= FLAG_BID;
        }
        w.write_u8(flags)?;
        // Octet 6 is spare.
        w.write_u8(0)?;
        if let Some(fd) = &self.flow_description {
            let bytes = fd.as_bytes();
            if bytes.len() > u16::MAX as usize {
                return Err(PfcpError::InvalidLength {
                    context: "SDF flow description",
                    needed: bytes.len(),
                    remaining: u16::MAX as usize,
                });
            }
            w.write_u16(bytes.len() as u16)?;
            w.write_bytes(bytes)?;
        }
        if let Some(ttc) = self.tos_traffic_class {
            w.write_u16(ttc)?;
        }
        if let Some(spi) = self.security_parameter_index {
            w.write_u32(spi)?;
        }
        if let Some(fl) = self.flow_label {
            w.write_u24(fl)?;
        }
        if let Some(bid) = self.filter_id {
            w.write_u32(bid)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        r.skip(1)?; // spare
        let flow_description = if flags & FLAG_FD != 0 {
            let len = r.read_u16()? as usize;
            let bytes = r.read_bytes(len)?;
            match String::from_utf8(bytes.to_vec()) {
                Ok(fd) => Some(fd),
                Err(_) => {
                    return Err(PfcpError::InvalidValue {
                        context: "SDF flow description",
                        value: len as u64,
                    })
                }
            }
        } else {
            None
        };
        let tos_traffic_class = if flags & FLAG_TTC != 0 {
            Some(r.read_u16()?)
        } else {
            None
        };
        let security_parameter_index = if flags & FLAG_SPI != 0 {
            Some(r.read_u32()?)
        } else {
            None
        };
        let flow_label = if flags & FLAG_FL != 0 {
            Some(r.read_u24()?)
        } else {
            None
        };
        let filter_id = if flags & FLAG_BID != 0 {
            Some(r.read_u32()?)
        } else {
            None
        };
        Ok(SdfFilter {
            flow_description,
            tos_traffic_class,
            security_parameter_index,
            flow_label,
            filter_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_instance_round_trip() {
        let ni = NetworkInstance::new("internet");
        let ie = ni.to_ie().unwrap();
        assert_eq!(NetworkInstance::parse(&ie.payload).unwrap(), ni);
    }

    #[test]
    fn network_instance_zero_length() {
        let ni = NetworkInstance::parse(&[]).unwrap();
        assert_eq!(ni.name, "");
    }

    #[test]
    fn application_id_round_trip() {
        let app = ApplicationId::new("com.example.video");
        let ie = app.to_ie().unwrap();
        assert_eq!(ApplicationId::parse(&ie.payload).unwrap(), app);
    }

    #[test]
    fn sdf_filter_flow_description() {
        let sdf = SdfFilter::flow("permit out ip from any to assigned");
        let ie = sdf.to_ie().unwrap();
        assert_eq!(ie.payload[0], FLAG_FD);
        assert_eq!(ie.payload[1], 0);
        assert_eq!(SdfFilter::parse(&ie.payload).unwrap(), sdf);
    }

    #[test]
    fn sdf_filter_all_fields() {
        let sdf = SdfFilter {
            flow_description: Some("permit out 17 from any to any".to_string()),
            tos_traffic_class: Some(0x2E00),
            security_parameter_index: Some(0xAABB_CCDD),
            flow_label: Some(0x0001_2345),
            filter_id: Some(7),
        };
        let ie = sdf.to_ie().unwrap();
        assert_eq!(SdfFilter::parse(&ie.payload).unwrap(), sdf);
    }

    #[test]
    fn sdf_filter_description_length_honoured() {
        // FD flag set, declared length longer than the remaining body.
        let body = [FLAG_FD, 0, 0x00, 0x10, b'a', b'b'];
        assert!(matches!(
            SdfFilter::parse(&body),
            Err(PfcpError::InvalidLength { .. })
        ));
    }
}
