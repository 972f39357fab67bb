//! Information Elements for PFCP messages.
//!
//! Every IE travels as a TLV frame: 2-byte type, 2-byte length (body only),
//! body. Vendor-specific types (code >= 0x8000) carry a 2-byte enterprise id
//! between the length and the body, counted by the length field. Typed IEs
//! implement [`IeBody`]; anything unrecognised survives as a raw [`Ie`] so
//! forward compatibility is never lost.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;

pub mod cause;
pub mod create_far;
pub mod create_pdr;
pub mod create_qer;
pub mod create_urr;
pub mod created_pdr;
pub mod ethernet;
pub mod f_seid;
pub mod f_teid;
pub mod features;
pub mod filters;
pub mod interface;
pub mod load_control;
pub mod node_id;
pub mod outer_header;
pub mod pdi;
pub mod pdn;
pub mod pfd;
pub mod qos;
pub mod query_urr;
pub mod recovery_time_stamp;
pub mod remove_rules;
pub mod reports;
pub mod rule_ids;
pub mod traffic_endpoint;
pub mod ue_ip_address;
pub mod update_rules;
pub mod usage;
pub mod usage_report;

pub use cause::{Cause, CauseValue};
pub use f_seid::Fseid;
pub use f_teid::Fteid;
pub use node_id::NodeId;
pub use recovery_time_stamp::RecoveryTimeStamp;

macro_rules! ie_types {
    ($($name:ident = $code:literal,)+) => {
        /// IE type codes from 3GPP TS 29.244 Release 18.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum IeType {
            $($name,)+
            /// Code this release does not recognise, preserved verbatim.
            Unknown(u16),
        }

        impl IeType {
            pub fn code(self) -> u16 {
                match self {
                    $(IeType::$name => $code,)+
                    IeType::Unknown(c) => c,
                }
            }
        }

        impl From<u16> for IeType {
            fn from(v: u16) -> Self {
                match v {
                    $($code => IeType::$name,)+
                    other => IeType::Unknown(other),
                }
            }
        }
    };
}

ie_types! {
    CreatePdr = 1,
    Pdi = 2,
    CreateFar = 3,
    ForwardingParameters = 4,
    DuplicatingParameters = 5,
    CreateUrr = 6,
    CreateQer = 7,
    CreatedPdr = 8,
    UpdatePdr = 9,
    UpdateFar = 10,
    UpdateForwardingParameters = 11,
    UpdateBarWithinSessionReportResponse = 12,
    UpdateUrr = 13,
    UpdateQer = 14,
    RemovePdr = 15,
    RemoveFar = 16,
    RemoveUrr = 17,
    RemoveQer = 18,
    Cause = 19,
    SourceInterface = 20,
    Fteid = 21,
    NetworkInstance = 22,
    SdfFilter = 23,
    ApplicationId = 24,
    GateStatus = 25,
    Mbr = 26,
    Gbr = 27,
    QerCorrelationId = 28,
    Precedence = 29,
    TransportLevelMarking = 30,
    VolumeThreshold = 31,
    TimeThreshold = 32,
    MonitoringTime = 33,
    SubsequentVolumeThreshold = 34,
    SubsequentTimeThreshold = 35,
    InactivityDetectionTime = 36,
    ReportingTriggers = 37,
    RedirectInformation = 38,
    ReportType = 39,
    OffendingIe = 40,
    ForwardingPolicy = 41,
    DestinationInterface = 42,
    UpFunctionFeatures = 43,
    ApplyAction = 44,
    DownlinkDataServiceInformation = 45,
    DownlinkDataNotificationDelay = 46,
    DlBufferingDuration = 47,
    DlBufferingSuggestedPacketCount = 48,
    PfcpsmReqFlags = 49,
    PfcpsrRspFlags = 50,
    LoadControlInformation = 51,
    SequenceNumber = 52,
    Metric = 53,
    OverloadControlInformation = 54,
    Timer = 55,
    PdrId = 56,
    Fseid = 57,
    ApplicationIdsPfds = 58,
    PfdContext = 59,
    NodeId = 60,
    PfdContents = 61,
    MeasurementMethod = 62,
    UsageReportTrigger = 63,
    MeasurementPeriod = 64,
    FqCsid = 65,
    VolumeMeasurement = 66,
    DurationMeasurement = 67,
    ApplicationDetectionInformation = 68,
    TimeOfFirstPacket = 69,
    TimeOfLastPacket = 70,
    QuotaHoldingTime = 71,
    DroppedDlTrafficThreshold = 72,
    VolumeQuota = 73,
    TimeQuota = 74,
    StartTime = 75,
    EndTime = 76,
    QueryUrr = 77,
    UsageReportWithinSessionModificationResponse = 78,
    UsageReportWithinSessionDeletionResponse = 79,
    UsageReportWithinSessionReportRequest = 80,
    UrrId = 81,
    LinkedUrrId = 82,
    DownlinkDataReport = 83,
    OuterHeaderCreation = 84,
    CreateBar = 85,
    UpdateBar = 86,
    RemoveBar = 87,
    BarId = 88,
    CpFunctionFeatures = 89,
    UsageInformation = 90,
    ApplicationInstanceId = 91,
    FlowInformation = 92,
    UeIpAddress = 93,
    PacketRate = 94,
    OuterHeaderRemoval = 95,
    RecoveryTimeStamp = 96,
    DlFlowLevelMarking = 97,
    HeaderEnrichment = 98,
    ErrorIndicationReport = 99,
    MeasurementInformation = 100,
    NodeReportType = 101,
    UserPlanePathFailureReport = 102,
    RemoteGtpuPeer = 103,
    UrSeqn = 104,
    UpdateDuplicatingParameters = 105,
    ActivatePredefinedRules = 106,
    DeactivatePredefinedRules = 107,
    FarId = 108,
    QerId = 109,
    OciFlags = 110,
    PfcpAssociationReleaseRequest = 111,
    GracefulReleasePeriod = 112,
    PdnType = 113,
    FailedRuleId = 114,
    TimeQuotaMechanism = 115,
    UserPlaneIpResourceInformation = 116,
    UserPlaneInactivityTimer = 117,
    AggregatedUrrs = 118,
    Multiplier = 119,
    AggregatedUrrId = 120,
    SubsequentVolumeQuota = 121,
    SubsequentTimeQuota = 122,
    Rqi = 123,
    Qfi = 124,
    QueryUrrReference = 125,
    AdditionalUsageReportsInformation = 126,
    CreateTrafficEndpoint = 127,
    CreatedTrafficEndpoint = 128,
    UpdateTrafficEndpoint = 129,
    RemoveTrafficEndpoint = 130,
    TrafficEndpointId = 131,
    EthernetPacketFilter = 132,
    MacAddress = 133,
    CTag = 134,
    STag = 135,
    Ethertype = 136,
    Proxying = 137,
    EthernetFilterId = 138,
    EthernetFilterProperties = 139,
    SuggestedBufferingPacketsCount = 140,
    UserId = 141,
    EthernetPduSessionInformation = 142,
    EthernetTrafficInformation = 143,
    MacAddressesDetected = 144,
    MacAddressesRemoved = 145,
    EthernetInactivityTimer = 146,
    AdditionalMonitoringTime = 147,
    EventQuota = 148,
    EventThreshold = 149,
    SubsequentEventQuota = 150,
    SubsequentEventThreshold = 151,
    TraceInformation = 152,
    FramedRoute = 153,
    FramedRouting = 154,
    FramedIpv6Route = 155,
    EventTimeStamp = 156,
    AveragingWindow = 157,
    PagingPolicyIndicator = 158,
    ApnDnn = 159,
    TgppInterfaceType = 160,
    PfcpsrReqFlags = 161,
    PfcpauReqFlags = 162,
    ActivationTime = 163,
    DeactivationTime = 164,
    AlternativeSmfIpAddress = 178,
    SmfSetId = 180,
    QuotaValidityTime = 181,
    NumberOfReports = 182,
    SourceIpAddress = 192,
    PacketRateStatus = 193,
    GtpuPathQosControlInformation = 238,
    GtpuPathQosReport = 239,
    QosInformation = 240,
    AveragePacketDelay = 234,
    MinimumPacketDelay = 235,
    MaximumPacketDelay = 236,
    Snssai = 257,
}

/// A raw TLV: the pass-through representation for IE types this library does
/// not model (or does not need to interpret in context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ie {
    pub ie_type: IeType,
    /// Present exactly when the type code has the vendor bit (0x8000) set.
    pub enterprise_id: Option<u16>,
    pub payload: Vec<u8>,
}

impl Ie {
    pub fn new(ie_type: IeType, payload: Vec<u8>) -> Self {
        Ie {
            ie_type,
            enterprise_id: None,
            payload,
        }
    }

    pub fn vendor_specific(code: u16, enterprise_id: u16, payload: Vec<u8>) -> Self {
        debug_assert!(code & 0x8000 != 0, "vendor IE codes have the top bit set");
        Ie {
            ie_type: IeType::from(code),
            enterprise_id: Some(enterprise_id),
            payload,
        }
    }

    /// Size of the full TLV frame on the wire.
    pub fn encoded_len(&self) -> usize {
        4 + if self.enterprise_id.is_some() { 2 } else { 0 } + self.payload.len()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_tlv(w, self.ie_type, |w| {
            if let Some(eid) = self.enterprise_id {
                w.write_u16(eid)?;
            }
            w.write_bytes(&self.payload)
        })
    }
}

/// Writes one TLV frame: type, reserved length, body, back-patched length.
///
/// The length field counts everything after itself, which for vendor IEs
/// includes the enterprise id the `body` closure writes first.
pub fn encode_tlv(
    w: &mut Writer<'_>,
    ie_type: IeType,
    body: impl FnOnce(&mut Writer<'_>) -> Result<(), PfcpError>,
) -> Result<(), PfcpError> {
    w.write_u16(ie_type.code())?;
    let len_pos = w.skip(2)?;
    let start = w.position();
    body(w)?;
    let len = w.position() - start;
    if len > u16::MAX as usize {
        return Err(PfcpError::InvalidLength {
            context: "IE body",
            needed: len,
            remaining: u16::MAX as usize,
        });
    }
    w.patch_u16(len_pos, len as u16);
    Ok(())
}

/// A borrowed TLV frame produced by [`IeReader`].
#[derive(Debug, Clone, Copy)]
pub struct RawIe<'a> {
    pub ie_type: IeType,
    pub enterprise_id: Option<u16>,
    pub body: &'a [u8],
}

impl RawIe<'_> {
    pub fn to_owned(&self) -> Ie {
        Ie {
            ie_type: self.ie_type,
            enterprise_id: self.enterprise_id,
            payload: self.body.to_vec(),
        }
    }
}

/// Iterates the TLV frames packed into a message body or a grouped-IE body.
///
/// A frame whose declared length overruns the input terminates iteration
/// with `InvalidLength`; the loop otherwise stops exactly at the end of the
/// input, so residual garbage can never be silently absorbed.
pub struct IeReader<'a> {
    r: Reader<'a>,
}

impl<'a> IeReader<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        IeReader {
            r: Reader::new(body),
        }
    }

    fn next_ie(&mut self) -> Result<RawIe<'a>, PfcpError> {
        let code = self.r.read_u16()?;
        let length = self.r.read_u16()? as usize;
        let (enterprise_id, body_len) = if code & 0x8000 != 0 {
            if length < 2 {
                return Err(PfcpError::too_short("vendor IE", 2, length));
            }
            (Some(self.r.read_u16()?), length - 2)
        } else {
            (None, length)
        };
        let body = self.r.read_bytes(body_len).map_err(|_| {
            PfcpError::too_short("IE body", body_len, self.r.remaining())
        })?;
        Ok(RawIe {
            ie_type: IeType::from(code),
            enterprise_id,
            body,
        })
    }
}

impl<'a> Iterator for IeReader<'a> {
    type Item = Result<RawIe<'a>, PfcpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.r.is_empty() {
            return None;
        }
        Some(self.next_ie())
    }
}

/// A typed IE body: knows its type code and how to put its payload on the
/// wire (and back). `encode` adds the TLV frame around `emit`.
pub trait IeBody: Sized {
    const TYPE: IeType;

    /// Writes the body (no TLV frame).
    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError>;

    /// Parses the body; implementations must account for every byte they
    /// require and tolerate trailing octets added by later releases only
    /// where the IE definition says so.
    fn parse(body: &[u8]) -> Result<Self, PfcpError>;

    fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_tlv(w, Self::TYPE, |w| self.emit(w))
    }

    /// Convenience conversion to a raw TLV, mainly for tests and tooling.
    fn to_ie(&self) -> Result<Ie, PfcpError> {
        let mut buf = vec![0u8; crate::MAX_MESSAGE_SIZE];
        let mut w = Writer::new(&mut buf);
        self.emit(&mut w)?;
        let n = w.position();
        buf.truncate(n);
        Ok(Ie::new(Self::TYPE, buf))
    }
}

/// Defines an IE whose body is a single fixed-width big-endian integer.
macro_rules! scalar_ie {
    ($(#[doc = $doc:expr])* $name:ident, $ty:ty, $ie_type:ident, $write:ident, $read:ident, $width:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub value: $ty,
        }

        impl $name {
            pub fn new(value: $ty) -> Self {
                $name { value }
            }
        }

        impl $crate::ie::IeBody for $name {
            const TYPE: $crate::ie::IeType = $crate::ie::IeType::$ie_type;

            fn emit(&self, w: &mut $crate::codec::Writer<'_>) -> Result<(), $crate::error::PfcpError> {
                w.$write(self.value)
            }

            fn parse(body: &[u8]) -> Result<Self, $crate::error::PfcpError> {
                let mut r = $crate::codec::Reader::new(body);
                let value = r.$read().map_err(|_| {
                    $crate::error::PfcpError::too_short(stringify!($name), $width, body.len())
                })?;
                Ok($name { value })
            }
        }
    };
}
pub(crate) use scalar_ie;

/// Fills a single-cardinality slot during a grouped-IE or message parse.
///
/// Duplicates are not a protocol violation; the last occurrence wins and the
/// overwrite is surfaced on the warning channel.
pub(crate) fn put_slot<T>(slot: &mut Option<T>, value: T, ie_type: IeType, scope: &'static str) {
    if slot.replace(value).is_some() {
        tracing::warn!(ie = ie_type.code(), scope, "duplicate IE, last occurrence wins");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ie_type_code_round_trip() {
        assert_eq!(IeType::from(19), IeType::Cause);
        assert_eq!(IeType::Cause.code(), 19);
        assert_eq!(IeType::from(57), IeType::Fseid);
        assert_eq!(IeType::from(257), IeType::Snssai);
        assert_eq!(IeType::from(9999), IeType::Unknown(9999));
        assert_eq!(IeType::Unknown(9999).code(), 9999);
    }

    #[test]
    fn raw_ie_encode_decode() {
        let ie = Ie::new(IeType::Cause, vec![1]);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        ie.encode(&mut w).unwrap();
        assert_eq!(w.written(), &[0x00, 0x13, 0x00, 0x01, 0x01]);

        let mut it = IeReader::new(w.written());
        let raw = it.next().unwrap().unwrap();
        assert_eq!(raw.ie_type, IeType::Cause);
        assert_eq!(raw.body, &[1]);
        assert!(it.next().is_none());
    }

    #[test]
    fn vendor_ie_carries_enterprise_id() {
        let ie = Ie::vendor_specific(0x8001, 0x0BAD, vec![0xCA, 0xFE]);
        let mut buf = [0u8; 16];
        let mut w = Writer::new(&mut buf);
        ie.encode(&mut w).unwrap();
        // length counts enterprise id + body
        assert_eq!(w.written(), &[0x80, 0x01, 0x00, 0x04, 0x0B, 0xAD, 0xCA, 0xFE]);

        let raw = IeReader::new(w.written()).next().unwrap().unwrap();
        assert_eq!(raw.enterprise_id, Some(0x0BAD));
        assert_eq!(raw.body, &[0xCA, 0xFE]);
        assert_eq!(raw.to_owned(), ie);
    }

    #[test]
    fn overrunning_child_is_invalid_length() {
        // Declares 4 body bytes, supplies 2.
        let data = [0x00, 0x13, 0x00, 0x04, 0x01, 0x02];
        let mut it = IeReader::new(&data);
        assert!(matches!(
            it.next().unwrap(),
            Err(PfcpError::InvalidLength { .. })
        ));
    }

    #[test]
    fn unknown_types_iterate_as_raw() {
        let data = [0x0F, 0xA0, 0x00, 0x01, 0xAA, 0x00, 0x13, 0x00, 0x01, 0x01];
        let ies: Vec<_> = IeReader::new(&data).collect::<Result<_, _>>().unwrap();
        assert_eq!(ies.len(), 2);
        assert_eq!(ies[0].ie_type, IeType::Unknown(4000));
        assert_eq!(ies[1].ie_type, IeType::Cause);
    }
}
