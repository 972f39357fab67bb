//! Heartbeat Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::recovery_time_stamp::RecoveryTimeStamp;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// Heartbeat Request: proves liveness and carries the sender's recovery
/// timestamp so peers can detect restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatRequest {
    pub header: Header,
    pub recovery_time_stamp: RecoveryTimeStamp,
    pub extras: Vec<Ie>,
}

impl HeartbeatRequest {
    pub fn new(sequence: u32, recovery_time_stamp: RecoveryTimeStamp) -> Self {
        HeartbeatRequest {
            header: Header::node(MsgType::HeartbeatRequest, sequence),
            recovery_time_stamp,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.recovery_time_stamp.encode(w)?;
            for ie in &self.extras {
                ie.encode(w)?;
            }
            Ok(())
        })
    }

    pub fn parse(data: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(data);
        let (header, body_len) = Header::decode(&mut r)?;
        let body = message_body(&mut r, body_len)?;
        let mut recovery_time_stamp = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::RecoveryTimeStamp => put_slot(
                    &mut recovery_time_stamp,
                    RecoveryTimeStamp::parse(child.body)?,
                    child.ie_type,
                    "Heartbeat Request",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(HeartbeatRequest {
            header,
            recovery_time_stamp: recovery_time_stamp.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::RecoveryTimeStamp,
                parent: None,
            })?,
            extras,
        })
    }
}

/// Heartbeat Response: echoes the request sequence with this node's own
/// recovery timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatResponse {
    pub header: Header,
    pub recovery_time_stamp: RecoveryTimeStamp,
    pub extras: Vec<Ie>,
}

impl HeartbeatResponse {
    pub fn new(sequence: u32, recovery_time_stamp: RecoveryTimeStamp) -> Self {
        HeartbeatResponse {
            header: Header::node(MsgType::HeartbeatResponse, sequence),
            recovery_time_stamp,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.recovery_time_stamp.encode(w)?;
            for ie in &self.extras {
                ie.encode(w)?;
            }
            Ok(())
        })
    }

    pub fn parse(data: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(data);
        let (header, body_len) = Header::decode(&mut r)?;
        let body = message_body(&mut r, body_len)?;
        let mut recovery_time_stamp = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::RecoveryTimeStamp => put_slot(
                    &mut recovery_time_stamp,
                    RecoveryTimeStamp::parse(child.body)?,
                    child.ie_type,
                    "Heartbeat Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(HeartbeatResponse {
            header,
            recovery_time_stamp: recovery_time_stamp.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::RecoveryTimeStamp,
                parent: None,
            })?,
            extras,
        })
    }
}
