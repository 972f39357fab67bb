//! Source Interface and Destination Interface Information Elements.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// Interface values shared by both IEs; LI Function and 5G VN internal are
/// destination-only but nothing is gained by rejecting them on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceValue {
    Access,
    Core,
    SgiLanN6Lan,
    CpFunction,
    LiFunction,
    FiveGVnInternal,
    Unknown(u8),
}

impl InterfaceValue {
    pub fn code(self) -> u8 {
        match self {
            InterfaceValue::Access => 0,
            InterfaceValue::Core => 1,
            InterfaceValue::SgiLanN6Lan => 2,
            InterfaceValue::CpFunction => 3,
            InterfaceValue::LiFunction => 4,
            InterfaceValue::FiveGVnInternal => 5,
            InterfaceValue::Unknown(v) => v,
        }
    }
}

impl From<u8> for InterfaceValue {
    fn from(v: u8) -> Self {
        match v {
            0 => InterfaceValue::Access,
            1 => InterfaceValue::Core,
            2 => InterfaceValue::SgiLanN6Lan,
            3 => InterfaceValue::CpFunction,
            4 => InterfaceValue::LiFunction,
            5 => InterfaceValue::FiveGVnInternal,
            other => InterfaceValue::Unknown(other),
        }
    }
}

fn emit_interface(value: InterfaceValue, w: &mut Writer<'_>) -> Result<(), PfcpError> {
    // Value lives in the low nibble; the high nibble is spare.
    w.write_u8(value.code() & 0x0F)
}

fn parse_interface(body: &[u8], context: &'static str) -> Result<InterfaceValue, PfcpError> {
    match body.first() {
        Some(&v) => Ok(InterfaceValue::from(v & 0x0F)),
        None => Err(PfcpError::too_short(context, 1, 0)),
    }
}

/// Source Interface: where a PDR expects matched traffic to arrive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInterface {
    pub value: InterfaceValue,
}

impl SourceInterface {
    pub fn new(value: InterfaceValue) -> Self {
        SourceInterface { value }
    }

    pub fn access() -> Self {
        SourceInterface::new(InterfaceValue::Access)
    }

    pub fn core() -> Self {
        SourceInterface::new(InterfaceValue::Core)
    }
}

impl IeBody for SourceInterface {
    const TYPE: IeType = IeType::SourceInterface;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        emit_interface(self.value, w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        Ok(SourceInterface {
            value: parse_interface(body, "Source Interface")?,
        })
    }
}

/// Destination Interface: where a FAR steers matched traffic to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationInterface {
    pub value: InterfaceValue,
}

impl DestinationInterface {
    pub fn new(value: InterfaceValue) -> Self {
        DestinationInterface { value }
    }

    pub fn access() -> Self {
        DestinationInterface::new(InterfaceValue::Access)
    }

    pub fn core() -> Self {
        DestinationInterface::new(InterfaceValue::Core)
    }
}

impl IeBody for DestinationInterface {
    const TYPE: IeType = IeType::DestinationInterface;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        emit_interface(self.value, w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        Ok(DestinationInterface {
            value: parse_interface(body, "Destination Interface")?,
        })
    }
}
