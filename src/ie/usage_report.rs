//! Usage Report grouped Information Elements.
//!
//! The same record travels under three TLV codes depending on the message it
//! appears in: Session Modification Response (78), Session Deletion Response
//! (79), and Session Report Request (80).

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::rule_ids::UrrId;
use crate::ie::usage::{
    DurationMeasurement, EndTime, StartTime, TimeOfFirstPacket, TimeOfLastPacket, UrSeqn,
    UsageReportTrigger, VolumeMeasurement,
};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// One usage report: which URR it belongs to, why it was generated, and the
/// measurements collected during the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    pub urr_id: UrrId,
    pub ur_seqn: UrSeqn,
    pub trigger: UsageReportTrigger,
    pub start_time: Option<StartTime>,
    pub end_time: Option<EndTime>,
    pub volume_measurement: Option<VolumeMeasurement>,
    pub duration_measurement: Option<DurationMeasurement>,
    pub time_of_first_packet: Option<TimeOfFirstPacket>,
    pub time_of_last_packet: Option<TimeOfLastPacket>,
}

impl UsageReport {
    pub fn new(urr_id: UrrId, ur_seqn: UrSeqn, trigger: UsageReportTrigger) -> Self {
        UsageReport {
            urr_id,
            ur_seqn,
            trigger,
            start_time: None,
            end_time: None,
            volume_measurement: None,
            duration_measurement: None,
            time_of_first_packet: None,
            time_of_last_packet: None,
        }
    }

    fn emit_children(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.urr_id.encode(w)?;
        self.ur_seqn.encode(w)?;
        self.trigger.encode(w)?;
        if let Some(t) = &self.start_time {
            t.encode(w)?;
        }
        if let Some(t) = &self.end_time {
            t.encode(w)?;
        }
        if let Some(v) = &self.volume_measurement {
            v.encode(w)?;
        }
        if let Some(d) = &self.duration_measurement {
            d.encode(w)?;
        }
        if let Some(t) = &self.time_of_first_packet {
            t.encode(w)?;
        }
        if let Some(t) = &self.time_of_last_packet {
            t.encode(w)?;
        }
        Ok(())
    }

    fn parse_children(body: &[u8], parent: IeType) -> Result<Self, PfcpError> {
        let mut urr_id = None;
        let mut ur_seqn = None;
        let mut trigger = None;
        let mut start_time = None;
        let mut end_time = None;
        let mut volume_measurement = None;
        let mut duration_measurement = None;
        let mut time_of_first_packet = None;
        let mut time_of_last_packet = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::UrrId => put_slot(
                    &mut urr_id,
                    UrrId::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::UrSeqn => put_slot(
                    &mut ur_seqn,
                    UrSeqn::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::UsageReportTrigger => put_slot(
                    &mut trigger,
                    UsageReportTrigger::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::StartTime => put_slot(
                    &mut start_time,
                    StartTime::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::EndTime => put_slot(
                    &mut end_time,
                    EndTime::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::VolumeMeasurement => put_slot(
                    &mut volume_measurement,
                    VolumeMeasurement::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::DurationMeasurement => put_slot(
                    &mut duration_measurement,
                    DurationMeasurement::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::TimeOfFirstPacket => put_slot(
                    &mut time_of_first_packet,
                    TimeOfFirstPacket::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                IeType::TimeOfLastPacket => put_slot(
                    &mut time_of_last_packet,
                    TimeOfLastPacket::parse(child.body)?,
                    child.ie_type,
                    "Usage Report",
                ),
                _ => {}
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(parent),
        };
        Ok(UsageReport {
            urr_id: urr_id.ok_or_else(|| missing(IeType::UrrId))?,
            ur_seqn: ur_seqn.ok_or_else(|| missing(IeType::UrSeqn))?,
            trigger: trigger.ok_or_else(|| missing(IeType::UsageReportTrigger))?,
            start_time,
            end_time,
            volume_measurement,
            duration_measurement,
            time_of_first_packet,
            time_of_last_packet,
        })
    }
}

macro_rules! usage_report_alias {
    ($(#[doc = $doc:expr])* $name:ident, $ie_type:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub UsageReport);

        impl IeBody for $name {
            const TYPE: IeType = IeType::$ie_type;

            fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
                self.0.emit_children(w)
            }

            fn parse(body: &[u8]) -> Result<Self, PfcpError> {
                Ok($name(UsageReport::parse_children(body, Self::TYPE)?))
            }
        }
    };
}

usage_report_alias!(
    #[doc = " Usage Report within a Session Modification Response."]
    UsageReportSmr, UsageReportWithinSessionModificationResponse
);
usage_report_alias!(
    #[doc = " Usage Report within a Session Deletion Response."]
    UsageReportSdr, UsageReportWithinSessionDeletionResponse
);
usage_report_alias!(
    #[doc = " Usage Report within a Session Report Request."]
    UsageReportSrr, UsageReportWithinSessionReportRequest
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::usage::VolumeFields;
    use std::time::{Duration, UNIX_EPOCH};

    fn sample_report() -> UsageReport {
        let mut report = UsageReport::new(
            UrrId::new(5),
            UrSeqn::new(17),
            UsageReportTrigger::VOLTH,
        );
        report.volume_measurement = Some(VolumeMeasurement::new(VolumeFields {
            total: Some(123_456),
            uplink: Some(100_000),
            downlink: Some(23_456),
        }));
        report.duration_measurement = Some(DurationMeasurement::new(60));
        report.start_time = Some(StartTime::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000)));
        report.end_time = Some(EndTime::new(UNIX_EPOCH + Duration::from_secs(1_700_000_060)));
        report
    }

    #[test]
    fn srr_round_trip() {
        let report = UsageReportSrr(sample_report());
        let ie = report.to_ie().unwrap();
        assert_eq!(ie.ie_type, IeType::UsageReportWithinSessionReportRequest);
        assert_eq!(UsageReportSrr::parse(&ie.payload).unwrap(), report);
    }

    #[test]
    fn sdr_and_smr_use_their_own_codes() {
        let report = sample_report();
        let sdr = UsageReportSdr(report.clone()).to_ie().unwrap();
        let smr = UsageReportSmr(report).to_ie().unwrap();
        assert_eq!(sdr.ie_type.code(), 79);
        assert_eq!(smr.ie_type.code(), 78);
        // Same body, different frame.
        assert_eq!(sdr.payload, smr.payload);
    }

    #[test]
    fn trigger_is_mandatory() {
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        UrrId::new(1).encode(&mut w).unwrap();
        UrSeqn::new(1).encode(&mut w).unwrap();
        let err = UsageReportSrr::parse(w.written()).unwrap_err();
        assert!(matches!(
            err,
            PfcpError::MissingMandatoryIe {
                ie_type: IeType::UsageReportTrigger,
                ..
            }
        ));
    }
}
