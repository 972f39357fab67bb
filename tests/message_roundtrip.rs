//! End-to-end message codec tests over the public API: known wire images,
//! structural round-trips, and mandatory-IE enforcement.

use std::net::Ipv4Addr;

use pfcplink::ie::cause::CauseValue;
use pfcplink::ie::create_far::{CreateFar, ForwardingParameters};
use pfcplink::ie::create_pdr::CreatePdr;
use pfcplink::ie::created_pdr::CreatedPdr;
use pfcplink::ie::f_seid::Fseid;
use pfcplink::ie::f_teid::Fteid;
use pfcplink::ie::interface::DestinationInterface;
use pfcplink::ie::node_id::NodeId;
use pfcplink::ie::pdi::Pdi;
use pfcplink::ie::recovery_time_stamp::RecoveryTimeStamp;
use pfcplink::ie::rule_ids::{FarId, PdrId, Precedence};
use pfcplink::ie::{IeBody, IeType};
use pfcplink::message::association_setup::AssociationSetupRequest;
use pfcplink::message::heartbeat::HeartbeatRequest;
use pfcplink::message::session_establishment::{
    SessionEstablishmentRequest, SessionEstablishmentResponse,
};
use pfcplink::message::Msg;
use pfcplink::{ntp, PfcpError};

#[test]
fn heartbeat_known_wire_image() {
    let req = Msg::HeartbeatRequest(HeartbeatRequest::new(
        42,
        RecoveryTimeStamp::new(ntp::from_ntp(0x1234_5678)),
    ));
    let bytes = req.to_bytes().unwrap();
    assert_eq!(bytes.len(), 16);
    // version 1, no flags; type 1; length = total - 4; sequence 42; spare.
    assert_eq!(bytes[0], 0x20);
    assert_eq!(bytes[1], 0x01);
    assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]) as usize, bytes.len() - 4);
    assert_eq!(&bytes[4..7], &[0x00, 0x00, 0x2A]);
    assert_eq!(bytes[7], 0x00);
    // Recovery Time Stamp TLV.
    assert_eq!(&bytes[8..], &[0x00, 0x60, 0x00, 0x04, 0x12, 0x34, 0x56, 0x78]);

    let parsed = Msg::parse(&bytes).unwrap();
    assert_eq!(parsed, req);
    assert_eq!(parsed.sequence(), 42);
    assert_eq!(parsed.seid(), None);
}

#[test]
fn association_setup_round_trip() {
    let req = Msg::AssociationSetupRequest(AssociationSetupRequest::new(
        100,
        NodeId::Ipv4(Ipv4Addr::new(192, 168, 1, 1)),
        RecoveryTimeStamp::new(ntp::from_ntp(0x8765_4321)),
    ));
    let bytes = req.to_bytes().unwrap();
    let parsed = Msg::parse(&bytes).unwrap();
    assert_eq!(parsed, req);
    assert_eq!(parsed.sequence(), 100);
    match parsed {
        Msg::AssociationSetupRequest(req) => {
            assert_eq!(req.node_id, NodeId::Ipv4(Ipv4Addr::new(192, 168, 1, 1)));
            assert_eq!(req.recovery_time_stamp.ntp_seconds(), 0x8765_4321);
        }
        other => panic!("wrong variant {other:?}"),
    }
}

const SEID: u64 = 0x1234_5678_90AB_CDEF;

#[test]
fn session_establishment_request_wire_shape() {
    let req = Msg::SessionEstablishmentRequest(
        SessionEstablishmentRequest::builder(SEID, 200)
            .node_id(NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
            .cp_fseid(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)))
            .build()
            .unwrap(),
    );
    let bytes = req.to_bytes().unwrap();
    // version 1 + S flag, 16-byte header with the SEID.
    assert_eq!(bytes[0], 0x21);
    assert_eq!(bytes[1], 50);
    assert_eq!(&bytes[4..12], &SEID.to_be_bytes());
    // Node ID (4 + 5) + F-SEID (4 + 13) after the 16-byte header.
    let length = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    assert_eq!(length, bytes.len() - 4);
    assert_eq!(bytes.len(), 16 + 9 + 17);

    let parsed = Msg::parse(&bytes).unwrap();
    assert_eq!(parsed.seid(), Some(SEID));
    match parsed {
        Msg::SessionEstablishmentRequest(req) => {
            assert_eq!(req.cp_fseid.seid, SEID);
            assert_eq!(req.cp_fseid.ipv4, Some(Ipv4Addr::new(10, 0, 0, 1)));
        }
        other => panic!("wrong variant {other:?}"),
    }
}

#[test]
fn session_establishment_with_rules_round_trip() {
    let pdr = CreatePdr::new(
        PdrId::new(1),
        Precedence::new(255),
        Pdi::uplink_access()
            .local_fteid(Fteid::choose(true, false))
            .build(),
    );
    let far = CreateFar::forward(
        FarId::new(1),
        ForwardingParameters::new(DestinationInterface::core()),
    );
    let req = Msg::SessionEstablishmentRequest(
        SessionEstablishmentRequest::builder(SEID, 201)
            .node_id(NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
            .cp_fseid(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)))
            .create_pdr(pdr)
            .create_far(far)
            .build()
            .unwrap(),
    );
    let parsed = Msg::parse(&req.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, req);
}

#[test]
fn session_establishment_response_with_created_pdr() {
    let mut resp = SessionEstablishmentResponse::accepted(
        SEID,
        200,
        NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 2)),
        Fseid::ipv4(0x0000_BEEF, Ipv4Addr::new(10, 0, 0, 2)),
    );
    resp.created_pdrs.push(CreatedPdr::with_fteid(
        PdrId::new(1),
        Fteid::ipv4(0x1234_5678, Ipv4Addr::new(10, 0, 0, 1)),
    ));
    let msg = Msg::SessionEstablishmentResponse(resp);
    let parsed = Msg::parse(&msg.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, msg);
    match parsed {
        Msg::SessionEstablishmentResponse(resp) => {
            assert!(resp.cause.is_accepted());
            assert_eq!(resp.created_pdrs[0].pdr_id, PdrId::new(1));
            assert_eq!(resp.created_pdrs[0].local_fteid.unwrap().teid, 0x1234_5678);
        }
        other => panic!("wrong variant {other:?}"),
    }
}

#[test]
fn fteid_choose_wire_shape() {
    let fteid = Fteid::choose(true, false);
    let ie = fteid.to_ie().unwrap();
    // CH + V4 flags, zero TEID, no trailing address.
    assert_eq!(ie.payload, vec![0x05, 0, 0, 0, 0]);
    let parsed = Fteid::parse(&ie.payload).unwrap();
    assert!(parsed.ch);
    assert!(parsed.v4);
    assert!(!parsed.v6);
    assert_eq!(parsed.ipv4, None);
    assert_eq!(parsed.ipv6, None);
}

#[test]
fn missing_fseid_surfaces_offending_ie() {
    // A well-formed Session Establishment Request, then the F-SEID IE
    // replaced by padding extras so only Node ID remains.
    let req = SessionEstablishmentRequest::builder(SEID, 7)
        .node_id(NodeId::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
        .cp_fseid(Fseid::ipv4(SEID, Ipv4Addr::new(10, 0, 0, 1)))
        .build()
        .unwrap();
    let mut bytes = Msg::SessionEstablishmentRequest(req).to_bytes().unwrap();
    // Truncate the trailing F-SEID TLV (17 bytes) and fix up the length.
    let new_len = bytes.len() - 17;
    bytes.truncate(new_len);
    let length = (new_len - 4) as u16;
    bytes[2..4].copy_from_slice(&length.to_be_bytes());

    let err = Msg::parse(&bytes).unwrap_err();
    match &err {
        PfcpError::MissingMandatoryIe { ie_type, .. } => {
            assert_eq!(*ie_type, IeType::Fseid);
            assert_eq!(ie_type.code(), 57);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.offending_ie(), Some(IeType::Fseid));
}

#[test]
fn cause_values_match_ts29244_numbering() {
    assert_eq!(CauseValue::RequestAccepted.code(), 1);
    assert_eq!(CauseValue::RequestRejected.code(), 64);
    assert_eq!(CauseValue::SessionContextNotFound.code(), 65);
    assert_eq!(CauseValue::MandatoryIeMissing.code(), 66);
}

#[test]
fn trailing_bytes_beyond_declared_length_are_ignored() {
    let req = Msg::HeartbeatRequest(HeartbeatRequest::new(
        9,
        RecoveryTimeStamp::new(ntp::from_ntp(0x1234_5678)),
    ));
    let mut bytes = req.to_bytes().unwrap();
    bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let parsed = Msg::parse(&bytes).unwrap();
    assert_eq!(parsed, req);
}
