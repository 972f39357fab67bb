//! Property tests: round-trips and flag/field consistency for the primitive
//! codec and the flag-gated IEs.

use std::net::{Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use pfcplink::codec::{Reader, Writer};
use pfcplink::ie::f_seid::Fseid;
use pfcplink::ie::f_teid::Fteid;
use pfcplink::ie::ue_ip_address::UeIpAddress;
use pfcplink::ie::usage::{VolumeFields, VolumeThreshold};
use pfcplink::ie::IeBody;
use pfcplink::message::{Header, MsgType};

proptest! {
    #[test]
    fn primitive_integers_round_trip(a in any::<u8>(), b in any::<u16>(), c in 0u32..1 << 24, d in any::<u32>(), e in any::<u64>()) {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        w.write_u8(a).unwrap();
        w.write_u16(b).unwrap();
        w.write_u24(c).unwrap();
        w.write_u32(d).unwrap();
        w.write_u64(e).unwrap();
        let mut r = Reader::new(w.written());
        prop_assert_eq!(r.read_u8().unwrap(), a);
        prop_assert_eq!(r.read_u16().unwrap(), b);
        prop_assert_eq!(r.read_u24().unwrap(), c);
        prop_assert_eq!(r.read_u32().unwrap(), d);
        prop_assert_eq!(r.read_u64().unwrap(), e);
        prop_assert!(r.is_empty());
    }

    #[test]
    fn header_round_trip(
        mp in any::<bool>(),
        seid in proptest::option::of(any::<u64>()),
        sequence in 0u32..1 << 24,
    ) {
        let mut header = Header::new(MsgType::SessionReportRequest, seid, sequence);
        header.mp = mp;
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        let len_pos = header.encode(&mut w).unwrap();
        let total = w.position();
        w.patch_u16(len_pos, (total - 4) as u16);
        let (decoded, body_len) = Header::decode(&mut Reader::new(w.written())).unwrap();
        prop_assert_eq!(decoded, header);
        prop_assert_eq!(body_len, 0);
    }

    #[test]
    fn fteid_round_trip(
        teid in any::<u32>(),
        v4 in proptest::option::of(any::<[u8; 4]>()),
        v6 in proptest::option::of(any::<[u8; 16]>()),
    ) {
        prop_assume!(v4.is_some() || v6.is_some());
        let fteid = Fteid {
            v4: v4.is_some(),
            v6: v6.is_some(),
            teid,
            ipv4: v4.map(Ipv4Addr::from),
            ipv6: v6.map(Ipv6Addr::from),
            ..Default::default()
        };
        let ie = fteid.to_ie().unwrap();
        let parsed = Fteid::parse(&ie.payload).unwrap();
        prop_assert_eq!(parsed, fteid);
        // Flag/field consistency: present flags mean present fields.
        prop_assert_eq!(parsed.ipv4.is_some(), parsed.v4);
        prop_assert_eq!(parsed.ipv6.is_some(), parsed.v6);
    }

    #[test]
    fn fteid_choose_round_trip(v4 in any::<bool>(), chid in proptest::option::of(any::<u8>())) {
        let fteid = match chid {
            Some(id) => Fteid::choose_with_id(v4, !v4, id),
            None => Fteid::choose(v4, !v4),
        };
        let ie = fteid.to_ie().unwrap();
        let parsed = Fteid::parse(&ie.payload).unwrap();
        prop_assert_eq!(parsed, fteid);
        prop_assert!(parsed.ipv4.is_none());
        prop_assert!(parsed.ipv6.is_none());
    }

    #[test]
    fn fseid_round_trip(
        seid in any::<u64>(),
        v4 in proptest::option::of(any::<[u8; 4]>()),
        v6 in proptest::option::of(any::<[u8; 16]>()),
    ) {
        let fseid = Fseid::new(seid, v4.map(Ipv4Addr::from), v6.map(Ipv6Addr::from));
        let ie = fseid.to_ie().unwrap();
        prop_assert_eq!(Fseid::parse(&ie.payload).unwrap(), fseid);
    }

    #[test]
    fn ue_ip_address_round_trip(
        v4 in proptest::option::of(any::<[u8; 4]>()),
        v6 in proptest::option::of(any::<[u8; 16]>()),
        destination in any::<bool>(),
        prefix in proptest::option::of(any::<u8>()),
    ) {
        let ue = UeIpAddress {
            ipv4: v4.map(Ipv4Addr::from),
            ipv6: v6.map(Ipv6Addr::from),
            destination,
            ipv6_prefix_delegation: prefix,
            choose_v4: false,
            choose_v6: false,
        };
        let ie = ue.to_ie().unwrap();
        prop_assert_eq!(UeIpAddress::parse(&ie.payload).unwrap(), ue);
    }

    #[test]
    fn volume_threshold_round_trip(
        total in proptest::option::of(any::<u64>()),
        uplink in proptest::option::of(any::<u64>()),
        downlink in proptest::option::of(any::<u64>()),
    ) {
        let vt = VolumeThreshold::new(VolumeFields { total, uplink, downlink });
        let ie = vt.to_ie().unwrap();
        let parsed = VolumeThreshold::parse(&ie.payload).unwrap();
        prop_assert_eq!(parsed, vt);
        // The body is exactly flags plus one u64 per present field.
        let expected = 1 + 8 * [total, uplink, downlink].iter().flatten().count();
        prop_assert_eq!(ie.payload.len(), expected);
    }
}
