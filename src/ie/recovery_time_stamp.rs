//! Recovery Time Stamp Information Element.

use std::time::SystemTime;

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::{IeBody, IeType};
use crate::ntp;

/// Recovery Time Stamp: when the sending node (re)started, in NTP seconds.
/// A peer seeing this value change knows the other side lost its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryTimeStamp {
    pub timestamp: SystemTime,
}

impl RecoveryTimeStamp {
    pub fn new(timestamp: SystemTime) -> Self {
        RecoveryTimeStamp { timestamp }
    }

    /// The raw NTP seconds value as transmitted.
    pub fn ntp_seconds(&self) -> u32 {
        ntp::to_ntp(self.timestamp)
    }
}

impl IeBody for RecoveryTimeStamp {
    const TYPE: IeType = IeType::RecoveryTimeStamp;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u32(self.ntp_seconds())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        if body.len() < 4 {
            return Err(PfcpError::too_short("Recovery Time Stamp", 4, body.len()));
        }
        let ntp_secs = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        Ok(RecoveryTimeStamp {
            timestamp: ntp::from_ntp(ntp_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn known_value_wire_layout() {
        // NTP 0x12345678 corresponds to a fixed instant; the IE must carry
        // exactly those four octets.
        let ts = RecoveryTimeStamp::parse(&[0x12, 0x34, 0x56, 0x78]).unwrap();
        assert_eq!(ts.ntp_seconds(), 0x1234_5678);
        assert_eq!(ts.to_ie().unwrap().payload, vec![0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn round_trip_truncates_to_seconds() {
        let t = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let ts = RecoveryTimeStamp::new(t);
        let ie = ts.to_ie().unwrap();
        let parsed = RecoveryTimeStamp::parse(&ie.payload).unwrap();
        assert_eq!(
            parsed.timestamp,
            UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
    }

    #[test]
    fn short_body_rejected() {
        assert!(RecoveryTimeStamp::parse(&[1, 2, 3]).is_err());
    }
}
