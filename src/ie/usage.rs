//! Usage measurement and reporting-control Information Elements.

use std::time::SystemTime;

use bitflags::bitflags;

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::{scalar_ie, IeBody, IeType};
use crate::ntp;

bitflags! {
    /// Measurement Method: what a URR counts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MeasurementMethod: u8 {
        const DURAT = 1 << 0;
        const VOLUM = 1 << 1;
        const EVENT = 1 << 2;
    }
}

impl IeBody for MeasurementMethod {
    const TYPE: IeType = IeType::MeasurementMethod;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_u8(self.bits())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        match body.first() {
            Some(&v) => Ok(Self::from_bits_truncate(v)),
            None => Err(PfcpError::too_short("Measurement Method", 1, 0)),
        }
    }
}

bitflags! {
    /// Reporting Triggers: which events make the UP function report usage.
    /// Two feature octets; a third exists in later releases and is ignored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReportingTriggers: u16 {
        const PERIO = 1 << 0;
        const VOLTH = 1 << 1;
        const TIMTH = 1 << 2;
        const QUHTI = 1 << 3;
        const START = 1 << 4;
        const STOPT = 1 << 5;
        const DROTH = 1 << 6;
        const LIUSA = 1 << 7;
        const VOLQU = 1 << 8;
        const TIMQU = 1 << 9;
        const ENVCL = 1 << 10;
        const MACAR = 1 << 11;
        const EVETH = 1 << 12;
        const EVEQU = 1 << 13;
        const IPMJL = 1 << 14;
        const QUVTI = 1 << 15;
    }
}

impl IeBody for ReportingTriggers {
    const TYPE: IeType = IeType::ReportingTriggers;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_bytes(&self.bits().to_le_bytes())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        if body.len() < 2 {
            return Err(PfcpError::too_short("Reporting Triggers", 2, body.len()));
        }
        Ok(Self::from_bits_truncate(u16::from_le_bytes([
            body[0], body[1],
        ])))
    }
}

bitflags! {
    /// Usage Report Trigger: why a particular usage report was generated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UsageReportTrigger: u16 {
        const PERIO = 1 << 0;
        const VOLTH = 1 << 1;
        const TIMTH = 1 << 2;
        const QUHTI = 1 << 3;
        const START = 1 << 4;
        const STOPT = 1 << 5;
        const DROTH = 1 << 6;
        const IMMER = 1 << 7;
        const VOLQU = 1 << 8;
        const TIMQU = 1 << 9;
        const LIUSA = 1 << 10;
        const TERMR = 1 << 11;
        const MONIT = 1 << 12;
        const ENVCL = 1 << 13;
        const MACAR = 1 << 14;
        const EVETH = 1 << 15;
    }
}

impl IeBody for UsageReportTrigger {
    const TYPE: IeType = IeType::UsageReportTrigger;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        w.write_bytes(&self.bits().to_le_bytes())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        if body.len() < 2 {
            return Err(PfcpError::too_short("Usage Report Trigger", 2, body.len()));
        }
        Ok(Self::from_bits_truncate(u16::from_le_bytes([
            body[0], body[1],
        ])))
    }
}

const FLAG_TOVOL: u8 = 0x01;
const FLAG_ULVOL: u8 = 0x02;
const FLAG_DLVOL: u8 = 0x04;

/// Total/uplink/downlink octet counts, each present iff its flag is set.
/// Shared body layout of Volume Threshold and Volume Quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeFields {
    pub total: Option<u64>,
    pub uplink: Option<u64>,
    pub downlink: Option<u64>,
}

impl VolumeFields {
    pub fn total(octets: u64) -> Self {
        VolumeFields {
            total: Some(octets),
            ..Default::default()
        }
    }

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.total.is_some() {
            flags |= FLAG_TOVOL;
        }
        if self.uplink.is_some() {
            flags |= FLAG_ULVOL;
        }
        if self.downlink.is_some() {
            flags |= FLAG_DLVOL;
        }
        w.write_u8(flags)?;
        for v in [self.total, self.uplink, self.downlink].into_iter().flatten() {
            w.write_u64(v)?;
        }
        Ok(())
    }

    fn parse(body: &[u8], context: &'static str) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8().map_err(|_| PfcpError::too_short(context, 1, 0))?;
        let total = if flags & FLAG_TOVOL != 0 {
            Some(r.read_u64()?)
        } else {
            None
        };
        let uplink = if flags & FLAG_ULVOL != 0 {
            Some(r.read_u64()?)
        } else {
            None
        };
        let downlink = if flags & FLAG_DLVOL != 0 {
            Some(r.read_u64()?)
        } else {
            None
        };
        Ok(VolumeFields {
            total,
            uplink,
            downlink,
        })
    }
}

macro_rules! volume_ie {
    ($(#[doc = $doc:expr])* $name:ident, $ie_type:ident, $context:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            pub volumes: VolumeFields,
        }

        impl $name {
            pub fn new(volumes: VolumeFields) -> Self {
                $name { volumes }
            }

            pub fn total(octets: u64) -> Self {
                $name {
                    volumes: VolumeFields::total(octets),
                }
            }
        }

        impl IeBody for $name {
            const TYPE: IeType = IeType::$ie_type;

            fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
                self.volumes.emit(w)
            }

            fn parse(body: &[u8]) -> Result<Self, PfcpError> {
                Ok($name {
                    volumes: VolumeFields::parse(body, $context)?,
                })
            }
        }
    };
}

volume_ie!(
    #[doc = " Volume Threshold: octet counts that trigger a usage report."]
    VolumeThreshold, VolumeThreshold, "Volume Threshold"
);
volume_ie!(
    #[doc = " Volume Quota: octet counts after which traffic handling changes."]
    VolumeQuota, VolumeQuota, "Volume Quota"
);
volume_ie!(
    #[doc = " Volume Measurement: octet counts accumulated by a URR."]
    VolumeMeasurement, VolumeMeasurement, "Volume Measurement"
);

scalar_ie!(
    #[doc = " Time Threshold: seconds of usage that trigger a report."]
    TimeThreshold, u32, TimeThreshold, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Time Quota: seconds of allowed usage."]
    TimeQuota, u32, TimeQuota, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Duration Measurement: seconds of usage accumulated by a URR."]
    DurationMeasurement, u32, DurationMeasurement, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " UR-SEQN: per-URR usage report sequence number."]
    UrSeqn, u32, UrSeqn, write_u32, read_u32, 4
);

/// Defines an IE whose body is a 4-octet NTP timestamp.
macro_rules! timestamp_ie {
    ($(#[doc = $doc:expr])* $name:ident, $ie_type:ident, $context:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub timestamp: SystemTime,
        }

        impl $name {
            pub fn new(timestamp: SystemTime) -> Self {
                $name { timestamp }
            }
        }

        impl IeBody for $name {
            const TYPE: IeType = IeType::$ie_type;

            fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
                w.write_u32(ntp::to_ntp(self.timestamp))
            }

            fn parse(body: &[u8]) -> Result<Self, PfcpError> {
                if body.len() < 4 {
                    return Err(PfcpError::too_short($context, 4, body.len()));
                }
                let secs = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                Ok($name {
                    timestamp: ntp::from_ntp(secs),
                })
            }
        }
    };
}

timestamp_ie!(
    #[doc = " Start Time: beginning of a usage measurement period."]
    StartTime, StartTime, "Start Time"
);
timestamp_ie!(
    #[doc = " End Time: end of a usage measurement period."]
    EndTime, EndTime, "End Time"
);
timestamp_ie!(
    #[doc = " Time of First Packet observed in the reporting period."]
    TimeOfFirstPacket, TimeOfFirstPacket, "Time of First Packet"
);
timestamp_ie!(
    #[doc = " Time of Last Packet observed in the reporting period."]
    TimeOfLastPacket, TimeOfLastPacket, "Time of Last Packet"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn measurement_method_round_trip() {
        let mm = MeasurementMethod::VOLUM | MeasurementMethod::DURAT;
        let ie = mm.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x03]);
        assert_eq!(MeasurementMethod::parse(&ie.payload).unwrap(), mm);
    }

    #[test]
    fn reporting_triggers_octet_order() {
        let rt = ReportingTriggers::PERIO | ReportingTriggers::VOLQU;
        let ie = rt.to_ie().unwrap();
        // first feature octet carries PERIO, second carries VOLQU
        assert_eq!(ie.payload, vec![0x01, 0x01]);
        assert_eq!(ReportingTriggers::parse(&ie.payload).unwrap(), rt);
    }

    #[test]
    fn usage_report_trigger_round_trip() {
        let t = UsageReportTrigger::VOLTH | UsageReportTrigger::TERMR;
        let ie = t.to_ie().unwrap();
        assert_eq!(UsageReportTrigger::parse(&ie.payload).unwrap(), t);
    }

    #[test]
    fn volume_threshold_flag_field_consistency() {
        let vt = VolumeThreshold::new(VolumeFields {
            total: Some(1_000_000),
            uplink: None,
            downlink: Some(500_000),
        });
        let ie = vt.to_ie().unwrap();
        assert_eq!(ie.payload[0], FLAG_TOVOL | FLAG_DLVOL);
        assert_eq!(ie.payload.len(), 1 + 8 + 8);
        assert_eq!(VolumeThreshold::parse(&ie.payload).unwrap(), vt);
    }

    #[test]
    fn volume_quota_missing_gated_field_rejected() {
        let body = [FLAG_TOVOL | FLAG_ULVOL, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            VolumeQuota::parse(&body),
            Err(PfcpError::InvalidLength { .. })
        ));
    }

    #[test]
    fn time_quota_round_trip() {
        let tq = TimeQuota::new(3600);
        let ie = tq.to_ie().unwrap();
        assert_eq!(ie.payload, vec![0x00, 0x00, 0x0E, 0x10]);
        assert_eq!(TimeQuota::parse(&ie.payload).unwrap(), tq);
    }

    #[test]
    fn start_end_time_round_trip() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let start = StartTime::new(t);
        let end = EndTime::new(t + Duration::from_secs(60));
        assert_eq!(
            StartTime::parse(&start.to_ie().unwrap().payload).unwrap(),
            start
        );
        assert_eq!(EndTime::parse(&end.to_ie().unwrap().payload).unwrap(), end);
    }
}
