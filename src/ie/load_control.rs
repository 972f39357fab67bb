//! Load Control and Overload Control Information Elements.
//!
//! Both are grouped IEs a UP function attaches to responses to steer the
//! CP function's request rate.

use bitflags::bitflags;

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{put_slot, scalar_ie, IeBody, IeReader, IeType};

scalar_ie!(
    #[doc = " Sequence Number: orders successive load/overload updates."]
    SequenceNumber, u32, SequenceNumber, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Metric: load or overload percentage, 0..=100."]
    Metric, u8, Metric, write_u8, read_u8, 1
);

/// Timer: value plus 3-bit unit multiplier packed into one octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// Unit: 0 = 2s, 1 = 1min, 2 = 10min, 3 = 1h, 4 = 10h, 7 = infinite.
    pub unit: u8,
    pub value: u8,
}

impl Timer {
    pub fn new(unit: u8, value: u8) -> Self {
        Timer {
            unit: unit & 0x07,
            value: value & 0x1F,
        }
    }
}

impl IeBody for Timer {
    const TYPE: IeType = IeType::Timer;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8((self.unit << 5) | self.value)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Timer {
                unit: v >> 5,
                value: v & 0x1F,
            }),
            None => Err(PfcpError::too_short("Timer", 1, 0)),
        }
    }
}

bitflags! {
    /// OCI Flags: overload control information qualifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OciFlags: u8 {
        /// Associated QoS flows should be released first.
        const AOCI = 1 << 0;
    }
}

impl IeBody for OciFlags {
    const TYPE: IeType = IeType::OciFlags;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("OCI Flags", 1, 0)),
        }
    }
}

/// Load Control Information: sequence number plus load metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadControlInformation {
    pub sequence_number: SequenceNumber,
    pub metric: Metric,
}

impl LoadControlInformation {
    pub fn new(sequence_number: u32, metric: u8) -> Self {
        LoadControlInformation {
            sequence_number: SequenceNumber::new(sequence_number),
            metric: Metric::new(metric),
        }
    }
}

impl IeBody for LoadControlInformation {
    const TYPE: IeType = IeType::LoadControlInformation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.sequence_number.encode(w)?;
        self.metric.encode(w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut sequence_number = None;
        let mut metric = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::SequenceNumber => put_slot(
                    &mut sequence_number,
                    SequenceNumber::parse(child.body)?,
                    child.ie_type,
                    "Load Control Information",
                ),
                IeType::Metric => put_slot(
                    &mut metric,
                    Metric::parse(child.body)?,
                    child.ie_type,
                    "Load Control Information",
                ),
                _ => {}
            }
        }
        Ok(LoadControlInformation {
            sequence_number: sequence_number.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::SequenceNumber,
                parent: Some(IeType::LoadControlInformation),
            })?,
            metric: metric.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Metric,
                parent: Some(IeType::LoadControlInformation),
            })?,
        })
    }
}

/// Overload Control Information: load control plus validity timer and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverloadControlInformation {
    pub sequence_number: SequenceNumber,
    pub metric: Metric,
    pub period_of_validity: Timer,
    pub flags: Option<OciFlags>,
}

impl OverloadControlInformation {
    pub fn new(sequence_number: u32, metric: u8, period_of_validity: Timer) -> Self {
        OverloadControlInformation {
            sequence_number: SequenceNumber::new(sequence_number),
            metric: Metric::new(metric),
            period_of_validity,
            flags: None,
        }
    }
}

impl IeBody for OverloadControlInformation {
    const TYPE: IeType = IeType::OverloadControlInformation;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.sequence_number.encode(w)?;
        self.metric.encode(w)?;
        self.period_of_validity.encode(w)?;
        if let Some(flags) = &self.flags {
            flags.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut sequence_number = None;
        let mut metric = None;
        let mut period_of_validity = None;
        let mut flags = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::SequenceNumber => put_slot(
                    &mut sequence_number,
                    SequenceNumber::parse(child.body)?,
                    child.ie_type,
                    "Overload Control Information",
                ),
                IeType::Metric => put_slot(
                    &mut metric,
                    Metric::parse(child.body)?,
                    child.ie_type,
                    "Overload Control Information",
                ),
                IeType::Timer => put_slot(
                    &mut period_of_validity,
                    Timer::parse(child.body)?,
                    child.ie_type,
                    "Overload Control Information",
                ),
                IeType::OciFlags => put_slot(
                    &mut flags,
                    OciFlags::parse(child.body)?,
                    child.ie_type,
                    "Overload Control Information",
                ),
                _ => {}
            }
        }
        let parent = Some(IeType::OverloadControlInformation);
        Ok(OverloadControlInformation {
            sequence_number: sequence_number.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::SequenceNumber,
                parent,
            })?,
            metric: metric.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Metric,
                parent,
            })?,
            period_of_validity: period_of_validity.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Timer,
                parent,
            })?,
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_packing() {
        let t = Timer::new(1, 20);
        let ie = t.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x34]);
        assert_eq!(Timer::parse(&ie.payload).unwrap(), t);
    }

    #[test]
    fn load_control_round_trip() {
        let lci = LoadControlInformation::new(7, 85);
        let ie = lci.to_ie().unwrap();
        assert_eq!(LoadControlInformation::parse(&ie.payload).unwrap(), lci);
    }

    #[test]
    fn load_control_missing_metric() {
        let seq = SequenceNumber::new(1);
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        seq.encode(&mut w).unwrap();
        let err = LoadControlInformation::parse(w.written()).unwrap_err();
        assert!(matches!(
            err,
            PfcpError::MissingMandatoryIe {
                ie_type: IeType::Metric,
                ..
            }
        ));
    }

    #[test]
    fn overload_control_round_trip() {
        let mut oci = OverloadControlInformation::new(3, 100, Timer::new(0, 5));
        oci.flags = Some(OciFlags::AOCI);
        let ie = oci.to_ie().unwrap();
        assert_eq!(
            OverloadControlInformation::parse(&ie.payload).unwrap(),
            oci
        );
    }
}
