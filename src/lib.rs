//! # pfcplink
//!
//! A PFCP (Packet Forwarding Control Protocol, 3GPP TS 29.244 Release 18)
//! endpoint library: a bit-exact message codec plus a UDP connection layer
//! with sequence tracking and retransmission.
//!
//! PFCP carries the N4 signalling between a Session Management Function
//! (SMF, control plane) and a User Plane Function (UPF, user plane):
//! packet-detection rules, forwarding-action rules, QoS enforcement,
//! usage reporting, and the sessions that aggregate them.
//!
//! ## Layers
//!
//! - [`codec`]: bounds-checked big-endian writer/reader primitives with
//!   deferred back-patching for length fields.
//! - [`ie`]: typed Information Elements and their TLV codec.
//! - [`message`]: PFCP message types, header framing, and dispatch.
//! - [`endpoint`]: UDP endpoint: sequence allocation, request/response
//!   correlation, retransmission, and a request handler loop.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::{Duration, SystemTime};
//! use pfcplink::endpoint::Endpoint;
//! use pfcplink::ie::recovery_time_stamp::RecoveryTimeStamp;
//! use pfcplink::message::heartbeat::HeartbeatRequest;
//! use pfcplink::message::Msg;
//!
//! # fn main() -> Result<(), pfcplink::PfcpError> {
//! let ep = Endpoint::bind("0.0.0.0:8805")?;
//! let mut req = Msg::HeartbeatRequest(HeartbeatRequest::new(
//!     0,
//!     RecoveryTimeStamp::new(SystemTime::now()),
//! ));
//! let peer = "10.0.0.2:8805".parse().unwrap();
//! let seq = ep.send_request(&mut req, peer)?;
//! let resp = ep.await_response(seq, Duration::from_secs(10))?;
//! println!("peer answered with {:?}", resp.msg_type());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod ie;
pub mod message;
pub mod ntp;

pub use error::PfcpError;

/// Largest encoded PFCP message this library will produce or accept.
///
/// PFCP runs over UDP with one message per datagram; 8 KiB comfortably
/// exceeds anything TS 29.244 describes while bounding buffer sizes.
pub const MAX_MESSAGE_SIZE: usize = 8192;
