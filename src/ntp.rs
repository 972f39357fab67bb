//! NTP timestamp conversion.
//!
//! PFCP timestamps (Recovery Time Stamp, Start/End Time, Time of First/Last
//! Packet) are 32-bit counts of seconds since the NTP epoch, 1900-01-01 UTC.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const UNIX_TO_NTP_OFFSET: u64 = 2_208_988_800;

/// Converts a `SystemTime` to NTP seconds, truncating sub-second precision.
///
/// Times before the Unix epoch clamp to the epoch; PFCP has no use for them.
pub fn to_ntp(t: SystemTime) -> u32 {
    let unix = t
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    (unix + UNIX_TO_NTP_OFFSET) as u32
}

/// Converts NTP seconds back to a `SystemTime`.
///
/// Values below the offset (timestamps before 1970) saturate to the Unix
/// epoch rather than failing; such values do not occur in live deployments.
pub fn from_ntp(ntp: u32) -> SystemTime {
    let unix = (ntp as u64).saturating_sub(UNIX_TO_NTP_OFFSET);
    UNIX_EPOCH + Duration::from_secs(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_offset() {
        assert_eq!(to_ntp(UNIX_EPOCH), UNIX_TO_NTP_OFFSET as u32);
        assert_eq!(from_ntp(UNIX_TO_NTP_OFFSET as u32), UNIX_EPOCH);
    }

    #[test]
    fn round_trip_whole_seconds() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(from_ntp(to_ntp(t)), t);
    }

    #[test]
    fn pre_1970_saturates() {
        assert_eq!(from_ntp(1234), UNIX_EPOCH);
    }
}
