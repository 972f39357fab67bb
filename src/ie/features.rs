//! UP Function Features and CP Function Features Information Elements.

use bitflags::bitflags;

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

bitflags! {
    /// UP Function Features, first two feature octets (octets 5-6).
    ///
    /// Later releases append further octets; they are tolerated on parse and
    /// dropped, since nothing in this library acts on them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UpFunctionFeatures: u16 {
        const BUCP = 1 << 0;
        const DDND = 1 << 1;
        const DLBD = 1 << 2;
        const TRST = 1 << 3;
        const FTUP = 1 << 4;
        const PFDM = 1 << 5;
        const HEEU = 1 << 6;
        const TREU = 1 << 7;
        const EMPU = 1 << 8;
        const PDIU = 1 << 9;
        const UDBC = 1 << 10;
        const QUOAC = 1 << 11;
        const TRACE = 1 << 12;
        const FRRT = 1 << 13;
        const PFDE = 1 << 14;
        const EPFAR = 1 << 15;
    }
}

impl IeBody for UpFunctionFeatures {
    const TYPE: IeType = IeType::UpFunctionFeatures;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        // Feature octets are transmitted least significant octet first.
        w.write_bytes(&self.bits().to_le_bytes())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body {
            [] => Err(PfcpError::too_short("UP Function Features", 1, 0)),
            [b0] => Ok(Self::from_bits_truncate(*b0 as u16)),
            [b0, b1, ..] => Ok(Self::from_bits_truncate(u16::from_le_bytes([*b0, *b1]))),
        }
    }
}

bitflags! {
    /// CP Function Features, one feature octet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CpFunctionFeatures: u8 {
        const LOAD = 1 << 0;
        const OVRL = 1 << 1;
        const EPFAR = 1 << 2;
        const SSET = 1 << 3;
        const BUNDL = 1 << 4;
        const MPAS = 1 << 5;
        const ARDR = 1 << 6;
        const UIAUR = 1 << 7;
    }
}

impl IeBody for CpFunctionFeatures {
    const TYPE: IeType = IeType::CpFunctionFeatures;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("CP Function Features", 1, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_features_round_trip() {
        let f = UpFunctionFeatures::BUCP | UpFunctionFeatures::FTUP | UpFunctionFeatures::EPFAR;
        let ie = f.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x11, 0x80]);
        assert_eq!(UpFunctionFeatures::parse(&ie.payload).unwrap(), f);
    }

    #[test]
    fn up_features_single_octet_tolerated() {
        let f = UpFunctionFeatures::parse(&[0x01]).unwrap();
        assert_eq!(f, UpFunctionFeatures::BUCP);
    }

    #[test]
    fn up_features_extra_octets_ignored() {
        let f = UpFunctionFeatures::parse(&[0x01, 0x80, 0xFF, 0xFF]).unwrap();
        assert_eq!(f, UpFunctionFeatures::BUCP | UpFunctionFeatures::EPFAR);
    }

    #[test]
    fn cp_features_round_trip() {
        let f = CpFunctionFeatures::LOAD | CpFunctionFeatures::OVRL;
        let ie = f.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x03]);
        assert_eq!(CpFunctionFeatures::parse(&ie.payload).unwrap(), f);
    }
}
