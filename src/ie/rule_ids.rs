//! Fixed-width scalar rule identifiers.
//!
//! PDR/FAR/QER/URR/BAR identifiers, rule precedence, and the traffic
//! endpoint id are all plain big-endian integers.

use crate::ie::scalar_ie;
#[cfg(test)]
use crate::ie::IeBody;

scalar_ie!(
    #[doc = " Packet Detection Rule identifier, unique within a session."]
    PdrId, u16, PdrId, write_u16, read_u16, 2
);
scalar_ie!(
    #[doc = " Forwarding Action Rule identifier."]
    FarId, u32, FarId, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " QoS Enforcement Rule identifier."]
    QerId, u32, QerId, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Usage Reporting Rule identifier."]
    UrrId, u32, UrrId, write_u32, read_u32, 4
);
scalar_ie!(
    #[doc = " Buffering Action Rule identifier."]
    BarId, u8, BarId, write_u8, read_u8, 1
);
scalar_ie!(
    #[doc = " Traffic Endpoint identifier."]
    TrafficEndpointId, u8, TrafficEndpointId, write_u8, read_u8, 1
);
scalar_ie!(
    #[doc = " PDR matching precedence; lower values match first."]
    Precedence, u32, Precedence, write_u32, read_u32, 4
);
