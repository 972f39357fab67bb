//! QoS enforcement Information Elements: gate status, bitrates, QFI and
//! transport-level marking.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// Per-direction gate positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateValue {
    Open,
    Closed,
    Unknown(u8),
}

impl GateValue {
    pub fn code(self) -> u8 {
        match self {
            GateValue::Open => 0,
            GateValue::Closed => 1,
            GateValue::Unknown(v) => v,
        }
    }
}

impl From<u8> for GateValue {
    fn from(v: u8) -> Self {
        match v {
            0 => GateValue::Open,
            1 => GateValue::Closed,
            other => GateValue::Unknown(other),
        }
    }
}

/// Gate Status: uplink gate in bits 3-4, downlink gate in bits 1-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    pub uplink: GateValue,
    pub downlink: GateValue,
}

impl GateStatus {
    pub fn new(uplink: GateValue, downlink: GateValue) -> Self {
        GateStatus { uplink, downlink }
    }

    pub fn open() -> Self {
        GateStatus::new(GateValue::Open, GateValue::Open)
    }

    pub fn closed() -> Self {
        GateStatus::new(GateValue::Closed, GateValue::Closed)
    }
}

impl IeBody for GateStatus {
    const TYPE: IeType = IeType::GateStatus;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8((self.uplink.code() & 0x03) << 2 | (self.downlink.code() & 0x03))
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(GateStatus {
                uplink: GateValue::from((v >> 2) & 0x03),
                downlink: GateValue::from(v & 0x03),
            }),
            None => Err(PfcpError::too_short("Gate Status", 1, 0)),
        }
    }
}

/// MBR: maximum bitrates in kbit/s, 40 bits per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mbr {
    pub uplink: u64,
    pub downlink: u64,
}

impl Mbr {
    pub fn new(uplink: u64, downlink: u64) -> Self {
        Mbr { uplink, downlink }
    }
}

fn emit_u40(w: &mut Writer<'_>, v: u64) -> Result<(), PfcpError> {
    w.write_bytes(&v.to_be_bytes()[3..])
}

fn read_u40(r: &mut Reader<'_>) -> Result<u64, PfcpError> {
    let b = r.read_bytes(5)?;
    Ok(u64::from_be_bytes([0, 0, 0, b[0], b[1], b[2], b[3], b[4]]))
}

impl IeBody for Mbr {
    const TYPE: IeType = IeType::Mbr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        emit_u40(w, self.uplink)?;
        emit_u40(w, self.downlink)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        Ok(Mbr {
            uplink: read_u40(&mut r)?,
            downlink: read_u40(&mut r)?,
        })
    }
}

/// GBR: guaranteed bitrates, same layout as MBR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gbr {
    pub uplink: u64,
    pub downlink: u64,
}

impl Gbr {
    pub fn new(uplink: u64, downlink: u64) -> Self {
        Gbr { uplink, downlink }
    }
}

impl IeBody for Gbr {
    const TYPE: IeType = IeType::Gbr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        emit_u40(w, self.uplink)?;
        emit_u40(w, self.downlink)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        Ok(Gbr {
            uplink: read_u40(&mut r)?,
            downlink: read_u40(&mut r)?,
        })
    }
}

/// QFI: QoS Flow Identifier, 6 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qfi {
    pub value: u8,
}

impl Qfi {
    pub fn new(value: u8) -> Self {
        Qfi {
            value: value & 0x3F,
        }
    }
}

impl IeBody for Qfi {
    const TYPE: IeType = IeType::Qfi;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.value & 0x3F)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Qfi::new(v)),
            None => Err(PfcpError::too_short("QFI", 1, 0)),
        }
    }
}

/// Transport Level Marking: the ToS/Traffic Class applied to outer headers,
/// value in the first octet, mask in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportLevelMarking {
    pub tos_traffic_class: u16,
}

impl TransportLevelMarking {
    pub fn new(tos_traffic_class: u16) -> Self {
        TransportLevelMarking { tos_traffic_class }
    }
}

impl IeBody for TransportLevelMarking {
    const TYPE: IeType = IeType::TransportLevelMarking;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u16(self.tos_traffic_class)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        if body.len() < 2 {
            return Err(PfcpError::too_short("Transport Level Marking", 2, body.len()));
        }
        Ok(TransportLevelMarking {
            tos_traffic_class: u16::from_be_bytes([body[0], body[1]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_status_round_trip() {
        let gs = GateStatus::new(GateValue::Open, GateValue::Closed);
        let ie = gs.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0b0000_0001]);
        assert_eq!(GateStatus::parse(&ie.payload).unwrap(), gs);
    }

    #[test]
    fn mbr_is_forty_bits_per_direction() {
        let mbr = Mbr::new(1_000_000, 2_000_000);
        let ie = mbr.to_ie().unwrap();
        assert_eq!(ie.payload.len(), 10);
        assert_eq!(Mbr::parse(&ie.payload).unwrap(), mbr);
    }

    #[test]
    fn gbr_round_trip() {
        let gbr = Gbr::new(0xFF_FFFF_FFFF, 1);
        let ie = gbr.to_ie().unwrap();
        assert_eq!(&ie.payload[..5], &[0xFF; 5]);
        assert_eq!(Gbr::parse(&ie.payload).unwrap(), gbr);
    }

    #[test]
    fn qfi_masks_to_six_bits() {
        let qfi = Qfi::new(0xFF);
        assert_eq!(qfi.value, 0x3F);
        let ie = qfi.to_ie().unwrap();
        assert_eq!(Qfi::parse(&ie.payload).unwrap(), qfi);
    }

    #[test]
    fn transport_level_marking_round_trip() {
        let tlm = TransportLevelMarking::new(0x2E00);
        let ie = tlm.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x2E, 0x00]);
        assert_eq!(TransportLevelMarking::parse(&ie.payload).unwrap(), tlm);
    }

    #[test]
    fn truncated_mbr_rejected() {
        assert!(Mbr::parse(&[1, 2, 3, 4, 5, 6]).is_err());
    }
}
