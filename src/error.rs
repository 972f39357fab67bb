//! Error taxonomy for the PFCP codec and endpoint.
//!
//! Codec errors are local and side-effect free: an encode failure leaves the
//! output buffer content unspecified but transmits nothing, a parse failure
//! consumes nothing the caller can observe. Endpoint errors resolve the
//! pending request they belong to; no operation blocks indefinitely.

use std::io;

use thiserror::Error;

use crate::ie::IeType;

/// All failures surfaced by this library.
#[derive(Debug, Error)]
pub enum PfcpError {
    /// Encoder ran out of output capacity.
    #[error("output buffer too small: {needed} bytes needed, {remaining} remaining")]
    BufferTooSmall { needed: usize, remaining: usize },

    /// A length field is inconsistent with the bytes actually present, or a
    /// decoder ran off the end of its input.
    #[error("invalid length in {context}: {needed} bytes needed, {remaining} remaining")]
    InvalidLength {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// PFCP header carried a version other than 1.
    #[error("unsupported PFCP version {0}")]
    InvalidVersion(u8),

    /// Message type code outside the ranges defined by TS 29.244.
    #[error("unknown message type {0}")]
    InvalidMessageType(u8),

    /// A field carried a value the IE definition does not allow.
    #[error("invalid {context} value {value}")]
    InvalidValue { context: &'static str, value: u64 },

    /// A message or grouped IE was parsed without one of its mandatory IEs.
    #[error("missing mandatory IE {ie_type:?}{}", .parent.map(|p| format!(" in {p:?}")).unwrap_or_default())]
    MissingMandatoryIe {
        ie_type: IeType,
        parent: Option<IeType>,
    },

    /// No response within the deadline, after the configured retransmissions.
    #[error("request timed out")]
    Timeout,

    /// The pending request was cancelled by the caller.
    #[error("request cancelled")]
    Cancelled,

    /// Underlying socket I/O failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

impl PfcpError {
    pub(crate) fn too_short(context: &'static str, needed: usize, remaining: usize) -> Self {
        PfcpError::InvalidLength {
            context,
            needed,
            remaining,
        }
    }

    /// The IE type to echo in an Offending IE field, when this error warrants
    /// a `Cause = mandatory IE missing` rejection.
    pub fn offending_ie(&self) -> Option<IeType> {
        match self {
            PfcpError::MissingMandatoryIe { ie_type, .. } => Some(*ie_type),
            _ => None,
        }
    }
}
