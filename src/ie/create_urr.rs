//! Create URR grouped Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::rule_ids::UrrId;
use crate::ie::usage::{
    MeasurementMethod, ReportingTriggers, TimeQuota, TimeThreshold, VolumeQuota, VolumeThreshold,
};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Create URR: a usage reporting rule. Measurement method and reporting
/// triggers are mandatory; thresholds and quotas arm the triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUrr {
    pub urr_id: UrrId,
    pub measurement_method: MeasurementMethod,
    pub reporting_triggers: ReportingTriggers,
    pub volume_threshold: Option<VolumeThreshold>,
    pub time_threshold: Option<TimeThreshold>,
    pub volume_quota: Option<VolumeQuota>,
    pub time_quota: Option<TimeQuota>,
}

impl CreateUrr {
    pub fn new(
        urr_id: UrrId,
        measurement_method: MeasurementMethod,
        reporting_triggers: ReportingTriggers,
    ) -> Self {
        CreateUrr {
            urr_id,
            measurement_method,
            reporting_triggers,
            volume_threshold: None,
            time_threshold: None,
            volume_quota: None,
            time_quota: None,
        }
    }
}

impl IeBody for CreateUrr {
    const TYPE: IeType = IeType::CreateUrr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.urr_id.encode(w)?;
        self.measurement_method.encode(w)?;
        self.reporting_triggers.encode(w)?;
        if let Some(vt) = &self.volume_threshold {
            vt.encode(w)?;
        }
        if let Some(tt) = &self.time_threshold {
            tt.encode(w)?;
        }
        if let Some(vq) = &self.volume_quota {
            vq.encode(w)?;
        }
        if let Some(tq) = &self.time_quota {
            tq.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut urr_id = None;
        let mut measurement_method = None;
        let mut reporting_triggers = None;
        let mut volume_threshold = None;
        let mut time_threshold = None;
        let mut volume_quota = None;
        let mut time_quota = None;
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::UrrId => put_slot(
                    &mut urr_id,
                    UrrId::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::MeasurementMethod => put_slot(
                    &mut measurement_method,
                    MeasurementMethod::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::ReportingTriggers => put_slot(
                    &mut reporting_triggers,
                    ReportingTriggers::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::VolumeThreshold => put_slot(
                    &mut volume_threshold,
                    VolumeThreshold::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::TimeThreshold => put_slot(
                    &mut time_threshold,
                    TimeThreshold::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::VolumeQuota => put_slot(
                    &mut volume_quota,
                    VolumeQuota::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                IeType::TimeQuota => put_slot(
                    &mut time_quota,
                    TimeQuota::parse(child.body)?,
                    child.ie_type,
                    "Create URR",
                ),
                _ => {}
            }
        }
        let missing = |ie_type| PfcpError::MissingMandatoryIe {
            ie_type,
            parent: Some(IeType::CreateUrr),
        };
        Ok(CreateUrr {
            urr_id: urr_id.ok_or_else(|| missing(IeType::UrrId))?,
            measurement_method: measurement_method
                .ok_or_else(|| missing(IeType::MeasurementMethod))?,
            reporting_triggers: reporting_triggers
                .ok_or_else(|| missing(IeType::ReportingTriggers))?,
            volume_threshold,
            time_threshold,
            volume_quota,
            time_quota,
        })
    }
}
