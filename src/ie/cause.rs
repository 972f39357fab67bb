//! Cause and Offending IE Information Elements.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};

/// Cause values per TS 29.244 §8.2.1. Values below 64 report acceptance,
/// 64 and above report rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseValue {
    RequestAccepted,
    MoreUsageReportToSend,
    RequestRejected,
    SessionContextNotFound,
    MandatoryIeMissing,
    ConditionalIeMissing,
    InvalidLength,
    MandatoryIeIncorrect,
    InvalidForwardingPolicy,
    InvalidFteidAllocationOption,
    NoEstablishedPfcpAssociation,
    RuleCreationModificationFailure,
    PfcpEntityInCongestion,
    NoResourcesAvailable,
    ServiceNotSupported,
    SystemFailure,
    RedirectionRequested,
    AllDynamicAddressesOccupied,
    /// Value outside the documented set, preserved verbatim.
    Unknown(u8),
}

impl CauseValue {
    pub fn code(self) -> u8 {
        match self {
            CauseValue::RequestAccepted => 1,
            CauseValue::MoreUsageReportToSend => 2,
            CauseValue::RequestRejected => 64,
            CauseValue::SessionContextNotFound => 65,
            CauseValue::MandatoryIeMissing => 66,
            CauseValue::ConditionalIeMissing => 67,
            CauseValue::InvalidLength => 68,
            CauseValue::MandatoryIeIncorrect => 69,
            CauseValue::InvalidForwardingPolicy => 70,
            CauseValue::InvalidFteidAllocationOption => 71,
            CauseValue::NoEstablishedPfcpAssociation => 72,
            CauseValue::RuleCreationModificationFailure => 73,
            CauseValue::PfcpEntityInCongestion => 74,
            CauseValue::NoResourcesAvailable => 75,
            CauseValue::ServiceNotSupported => 76,
            CauseValue::SystemFailure => 77,
            CauseValue::RedirectionRequested => 78,
            CauseValue::AllDynamicAddressesOccupied => 79,
            CauseValue::Unknown(v) => v,
        }
    }

    /// Acceptance/rejection classification: the success space is 1..=63.
    pub fn is_accepted(self) -> bool {
        self.code() < 64
    }
}

impl From<u8> for CauseValue {
    fn from(v: u8) -> Self {
        match v {
            1 => CauseValue::RequestAccepted,
            2 => CauseValue::MoreUsageReportToSend,
            64 => CauseValue::RequestRejected,
            65 => CauseValue::SessionContextNotFound,
            66 => CauseValue::MandatoryIeMissing,
            67 => CauseValue::ConditionalIeMissing,
            68 => CauseValue::InvalidLength,
            69 => CauseValue::MandatoryIeIncorrect,
            70 => CauseValue::InvalidForwardingPolicy,
            71 => CauseValue::InvalidFteidAllocationOption,
            72 => CauseValue::NoEstablishedPfcpAssociation,
            73 => CauseValue::RuleCreationModificationFailure,
            74 => CauseValue::PfcpEntityInCongestion,
            75 => CauseValue::NoResourcesAvailable,
            76 => CauseValue::ServiceNotSupported,
            77 => CauseValue::SystemFailure,
            78 => CauseValue::RedirectionRequested,
            79 => CauseValue::AllDynamicAddressesOccupied,
            other => CauseValue::Unknown(other),
        }
    }
}

/// Cause IE: one octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cause {
    pub value: CauseValue,
}

impl Cause {
    pub fn new(value: CauseValue) -> Self {
        Cause { value }
    }

    pub fn accepted() -> Self {
        Cause::new(CauseValue::RequestAccepted)
    }

    pub fn is_accepted(&self) -> bool {
        self.value.is_accepted()
    }
}

impl IeBody for Cause {
    const TYPE: IeType = IeType::Cause;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.value.code())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Cause::new(CauseValue::from(v))),
            None => Err(PfcpError::too_short("Cause", 1, 0)),
        }
    }
}

/// Offending IE: the 16-bit type code of the IE a rejection complains about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffendingIe {
    pub ie_type: IeType,
}

impl OffendingIe {
    pub fn new(ie_type: IeType) -> Self {
        OffendingIe { ie_type }
    }
}

impl IeBody for OffendingIe {
    const TYPE: IeType = IeType::OffendingIe;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u16(self.ie_type.code())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        if body.len() < 2 {
            return Err(PfcpError::too_short("Offending IE", 2, body.len()));
        }
        Ok(OffendingIe {
            ie_type: IeType::from(u16::from_be_bytes([body[0], body[1]])),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_round_trip() {
        let cause = Cause::accepted();
        let ie = cause.to_ie().unwrap();
        assert_eq!(ie.payload, vec![1]);
        assert_eq!(Cause::parse(&ie.payload).unwrap(), cause);
    }

    #[test]
    fn cause_classification() {
        assert!(CauseValue::RequestAccepted.is_accepted());
        assert!(CauseValue::MoreUsageReportToSend.is_accepted());
        assert!(!CauseValue::RequestRejected.is_accepted());
        assert!(!CauseValue::MandatoryIeMissing.is_accepted());
        assert!(!CauseValue::Unknown(200).is_accepted());
        assert!(CauseValue::Unknown(42).is_accepted());
    }

    #[test]
    fn cause_preserves_unknown_values() {
        let parsed = Cause::parse(&[0xC8]).unwrap();
        assert_eq!(parsed.value, CauseValue::Unknown(200));
        assert_eq!(parsed.to_ie().unwrap().payload, vec![200]);
    }

    #[test]
    fn cause_empty_body() {
        assert!(Cause::parse(&[]).is_err());
    }

    #[test]
    fn offending_ie_round_trip() {
        let off = OffendingIe::new(IeType::Fseid);
        let ie = off.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x00, 57]);
        assert_eq!(OffendingIe::parse(&ie.payload).unwrap(), off);
    }
}
