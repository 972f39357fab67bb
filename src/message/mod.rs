//! PFCP messages: typed records of Information Elements behind a common
//! sum type, [`Msg`].
//!
//! Encoding writes the header with a reserved length field, emits mandatory
//! IEs in canonical order followed by the present optional ones, then
//! back-patches the length. Decoding walks TLVs until the declared length is
//! exhausted, fills typed slots, keeps unrecognised IEs as raw extras, and
//! validates mandatory presence at the end.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, CauseValue, OffendingIe};
use crate::ie::IeType;

pub mod association_release;
pub mod association_setup;
pub mod association_update;
pub mod header;
pub mod heartbeat;
pub mod node_report;
pub mod pfd_management;
pub mod session_deletion;
pub mod session_establishment;
pub mod session_modification;
pub mod session_report;
pub mod session_set_deletion;
pub mod version_not_supported;

pub use header::Header;

macro_rules! msg_types {
    ($($name:ident = $code:literal,)+) => {
        /// PFCP message type codes: node messages 1-15, session messages 50-57.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MsgType {
            $($name,)+
            /// Code outside the assigned ranges, preserved for the
            /// Version Not Supported reply path.
            Unknown(u8),
        }

        impl MsgType {
            pub fn code(self) -> u8 {
                match self {
                    $(MsgType::$name => $code,)+
                    MsgType::Unknown(c) => c,
                }
            }
        }

        impl From<u8> for MsgType {
            fn from(v: u8) -> Self {
                match v {
                    $($code => MsgType::$name,)+
                    other => MsgType::Unknown(other),
                }
            }
        }
    };
}

msg_types! {
    HeartbeatRequest = 1,
    HeartbeatResponse = 2,
    PfdManagementRequest = 3,
    PfdManagementResponse = 4,
    AssociationSetupRequest = 5,
    AssociationSetupResponse = 6,
    AssociationUpdateRequest = 7,
    AssociationUpdateResponse = 8,
    AssociationReleaseRequest = 9,
    AssociationReleaseResponse = 10,
    VersionNotSupportedResponse = 11,
    NodeReportRequest = 12,
    NodeReportResponse = 13,
    SessionSetDeletionRequest = 14,
    SessionSetDeletionResponse = 15,
    SessionEstablishmentRequest = 50,
    SessionEstablishmentResponse = 51,
    SessionModificationRequest = 52,
    SessionModificationResponse = 53,
    SessionDeletionRequest = 54,
    SessionDeletionResponse = 55,
    SessionReportRequest = 56,
    SessionReportResponse = 57,
}

impl MsgType {
    /// Session messages carry a SEID in the header.
    pub fn has_seid(self) -> bool {
        matches!(self.code(), 50..=57)
    }

    /// True for the response half of each request/response pair.
    pub fn is_response(self) -> bool {
        matches!(
            self,
            MsgType::HeartbeatResponse
                | MsgType::PfdManagementResponse
                | MsgType::AssociationSetupResponse
                | MsgType::AssociationUpdateResponse
                | MsgType::AssociationReleaseResponse
                | MsgType::VersionNotSupportedResponse
                | MsgType::NodeReportResponse
                | MsgType::SessionSetDeletionResponse
                | MsgType::SessionEstablishmentResponse
                | MsgType::SessionModificationResponse
                | MsgType::SessionDeletionResponse
                | MsgType::SessionReportResponse
        )
    }
}

/// Writes a full message: header, body, back-patched length.
pub(crate) fn encode_message(
    w: &mut Writer<'_>,
    header: &Header,
    body: impl FnOnce(&mut Writer<'_>) -> Result<(), PfcpError>,
) -> Result<(), PfcpError> {
    let start = w.position();
    let len_pos = header.encode(w)?;
    body(w)?;
    let total = w.position() - start;
    if total - 4 > u16::MAX as usize {
        return Err(PfcpError::InvalidLength {
            context: "message length",
            needed: total - 4,
            remaining: u16::MAX as usize,
        });
    }
    w.patch_u16(len_pos, (total - 4) as u16);
    Ok(())
}

/// Extracts the IE body slice a decoded header declares, leaving any
/// trailing bytes beyond the declared length unread (and ignored).
pub(crate) fn message_body<'a>(
    r: &mut Reader<'a>,
    body_len: usize,
) -> Result<&'a [u8], PfcpError> {
    r.read_bytes(body_len)
        .map_err(|_| PfcpError::InvalidLength {
            context: "message body",
            needed: body_len,
            remaining: r.remaining(),
        })
}

macro_rules! messages {
    ($($variant:ident => $path:path,)+) => {
        /// A parsed or to-be-sent PFCP message.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Msg {
            $($variant($path),)+
        }

        impl Msg {
            pub fn msg_type(&self) -> MsgType {
                match self {
                    $(Msg::$variant(m) => m.header.message_type,)+
                }
            }

            pub fn seid(&self) -> Option<u64> {
                match self {
                    $(Msg::$variant(m) => m.header.seid,)+
                }
            }

            pub fn sequence(&self) -> u32 {
                match self {
                    $(Msg::$variant(m) => m.header.sequence,)+
                }
            }

            pub fn set_sequence(&mut self, sequence: u32) {
                match self {
                    $(Msg::$variant(m) => m.header.sequence = sequence & 0x00FF_FFFF,)+
                }
            }

            /// Encodes the message into a caller-supplied buffer.
            pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
                match self {
                    $(Msg::$variant(m) => m.encode(w),)+
                }
            }
        }
    };
}

messages! {
    HeartbeatRequest => heartbeat::HeartbeatRequest,
    HeartbeatResponse => heartbeat::HeartbeatResponse,
    PfdManagementRequest => pfd_management::PfdManagementRequest,
    PfdManagementResponse => pfd_management::PfdManagementResponse,
    AssociationSetupRequest => association_setup::AssociationSetupRequest,
    AssociationSetupResponse => association_setup::AssociationSetupResponse,
    AssociationUpdateRequest => association_update::AssociationUpdateRequest,
    AssociationUpdateResponse => association_update::AssociationUpdateResponse,
    AssociationReleaseRequest => association_release::AssociationReleaseRequest,
    AssociationReleaseResponse => association_release::AssociationReleaseResponse,
    VersionNotSupportedResponse => version_not_supported::VersionNotSupportedResponse,
    NodeReportRequest => node_report::NodeReportRequest,
    NodeReportResponse => node_report::NodeReportResponse,
    SessionSetDeletionRequest => session_set_deletion::SessionSetDeletionRequest,
    SessionSetDeletionResponse => session_set_deletion::SessionSetDeletionResponse,
    SessionEstablishmentRequest => session_establishment::SessionEstablishmentRequest,
    SessionEstablishmentResponse => session_establishment::SessionEstablishmentResponse,
    SessionModificationRequest => session_modification::SessionModificationRequest,
    SessionModificationResponse => session_modification::SessionModificationResponse,
    SessionDeletionRequest => session_deletion::SessionDeletionRequest,
    SessionDeletionResponse => session_deletion::SessionDeletionResponse,
    SessionReportRequest => session_report::SessionReportRequest,
    SessionReportResponse => session_report::SessionReportResponse,
}

impl Msg {
    /// Parses a datagram into a typed message, dispatching on the header's
    /// message type. Unknown types fail with `InvalidMessageType` so the
    /// endpoint can answer with a Version Not Supported Response.
    pub fn parse(data: &[u8]) -> Result<Msg, PfcpError> {
        let (header, _) = Header::decode(&mut Reader::new(data))?;
        match header.message_type {
            MsgType::HeartbeatRequest => {
                Ok(Msg::HeartbeatRequest(heartbeat::HeartbeatRequest::parse(data)?))
            }
            MsgType::HeartbeatResponse => {
                Ok(Msg::HeartbeatResponse(heartbeat::HeartbeatResponse::parse(data)?))
            }
            MsgType::PfdManagementRequest => Ok(Msg::PfdManagementRequest(
                pfd_management::PfdManagementRequest::parse(data)?,
            )),
            MsgType::PfdManagementResponse => Ok(Msg::PfdManagementResponse(
                pfd_management::PfdManagementResponse::parse(data)?,
            )),
            MsgType::AssociationSetupRequest => Ok(Msg::AssociationSetupRequest(
                association_setup::AssociationSetupRequest::parse(data)?,
            )),
            MsgType::AssociationSetupResponse => Ok(Msg::AssociationSetupResponse(
                association_setup::AssociationSetupResponse::parse(data)?,
            )),
            MsgType::AssociationUpdateRequest => Ok(Msg::AssociationUpdateRequest(
                association_update::AssociationUpdateRequest::parse(data)?,
            )),
            MsgType::AssociationUpdateResponse => Ok(Msg::AssociationUpdateResponse(
                association_update::AssociationUpdateResponse::parse(data)?,
            )),
            MsgType::AssociationReleaseRequest => Ok(Msg::AssociationReleaseRequest(
                association_release::AssociationReleaseRequest::parse(data)?,
            )),
            MsgType::AssociationReleaseResponse => Ok(Msg::AssociationReleaseResponse(
                association_release::AssociationReleaseResponse::parse(data)?,
            )),
            MsgType::VersionNotSupportedResponse => Ok(Msg::VersionNotSupportedResponse(
                version_not_supported::VersionNotSupportedResponse::parse(data)?,
            )),
            MsgType::NodeReportRequest => Ok(Msg::NodeReportRequest(
                node_report::NodeReportRequest::parse(data)?,
            )),
            MsgType::NodeReportResponse => Ok(Msg::NodeReportResponse(
                node_report::NodeReportResponse::parse(data)?,
            )),
            MsgType::SessionSetDeletionRequest => Ok(Msg::SessionSetDeletionRequest(
                session_set_deletion::SessionSetDeletionRequest::parse(data)?,
            )),
            MsgType::SessionSetDeletionResponse => Ok(Msg::SessionSetDeletionResponse(
                session_set_deletion::SessionSetDeletionResponse::parse(data)?,
            )),
            MsgType::SessionEstablishmentRequest => Ok(Msg::SessionEstablishmentRequest(
                session_establishment::SessionEstablishmentRequest::parse(data)?,
            )),
            MsgType::SessionEstablishmentResponse => Ok(Msg::SessionEstablishmentResponse(
                session_establishment::SessionEstablishmentResponse::parse(data)?,
            )),
            MsgType::SessionModificationRequest => Ok(Msg::SessionModificationRequest(
                session_modification::SessionModificationRequest::parse(data)?,
            )),
            MsgType::SessionModificationResponse => Ok(Msg::SessionModificationResponse(
                session_modification::SessionModificationResponse::parse(data)?,
            )),
            MsgType::SessionDeletionRequest => Ok(Msg::SessionDeletionRequest(
                session_deletion::SessionDeletionRequest::parse(data)?,
            )),
            MsgType::SessionDeletionResponse => Ok(Msg::SessionDeletionResponse(
                session_deletion::SessionDeletionResponse::parse(data)?,
            )),
            MsgType::SessionReportRequest => Ok(Msg::SessionReportRequest(
                session_report::SessionReportRequest::parse(data)?,
            )),
            MsgType::SessionReportResponse => Ok(Msg::SessionReportResponse(
                session_report::SessionReportResponse::parse(data)?,
            )),
            MsgType::Unknown(code) => Err(PfcpError::InvalidMessageType(code)),
        }
    }

    /// Encodes into a fresh buffer sized at [`crate::MAX_MESSAGE_SIZE`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, PfcpError> {
        let mut buf = vec![0u8; crate::MAX_MESSAGE_SIZE];
        let mut w = Writer::new(&mut buf);
        self.encode(&mut w)?;
        let n = w.position();
        buf.truncate(n);
        Ok(buf)
    }
}

/// Builds the rejection response for a request whose body failed validation,
/// echoing the sequence and carrying Cause plus the offending IE type.
///
/// Session-level rejections go out with SEID 0: the receiving node failed to
/// parse the request, so no session context can be attributed.
pub fn reject_response(
    request_type: MsgType,
    sequence: u32,
    cause: CauseValue,
    offending: Option<IeType>,
) -> Option<Msg> {
    let cause = Cause::new(cause);
    let offending_ie = offending.map(OffendingIe::new);
    match request_type {
        MsgType::SessionEstablishmentRequest => Some(Msg::SessionEstablishmentResponse(
            session_establishment::SessionEstablishmentResponse::rejected(
                0,
                sequence,
                cause,
                offending_ie,
            ),
        )),
        MsgType::SessionModificationRequest => Some(Msg::SessionModificationResponse(
            session_modification::SessionModificationResponse::rejected(
                0,
                sequence,
                cause,
                offending_ie,
            ),
        )),
        MsgType::SessionDeletionRequest => Some(Msg::SessionDeletionResponse(
            session_deletion::SessionDeletionResponse::rejected(0, sequence, cause, offending_ie),
        )),
        MsgType::SessionReportRequest => Some(Msg::SessionReportResponse(
            session_report::SessionReportResponse::rejected(0, sequence, cause, offending_ie),
        )),
        MsgType::PfdManagementRequest => Some(Msg::PfdManagementResponse(
            pfd_management::PfdManagementResponse::new(sequence, cause, offending_ie),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_type_code_round_trip() {
        assert_eq!(MsgType::from(1), MsgType::HeartbeatRequest);
        assert_eq!(MsgType::from(57), MsgType::SessionReportResponse);
        assert_eq!(MsgType::from(99), MsgType::Unknown(99));
        assert_eq!(MsgType::Unknown(99).code(), 99);
    }

    #[test]
    fn seid_follows_message_class() {
        assert!(!MsgType::HeartbeatRequest.has_seid());
        assert!(!MsgType::NodeReportRequest.has_seid());
        assert!(MsgType::SessionEstablishmentRequest.has_seid());
        assert!(MsgType::SessionReportResponse.has_seid());
    }

    #[test]
    fn response_classification() {
        assert!(MsgType::HeartbeatResponse.is_response());
        assert!(MsgType::VersionNotSupportedResponse.is_response());
        assert!(MsgType::SessionEstablishmentResponse.is_response());
        assert!(!MsgType::HeartbeatRequest.is_response());
        assert!(!MsgType::SessionReportRequest.is_response());
        assert!(!MsgType::Unknown(200).is_response());
    }

    #[test]
    fn unknown_message_type_fails_parse() {
        // Well-formed header with unassigned type 40.
        let data = [0x20, 40, 0x00, 0x04, 0x00, 0x00, 0x07, 0x00];
        assert!(matches!(
            Msg::parse(&data),
            Err(PfcpError::InvalidMessageType(40))
        ));
    }
}
