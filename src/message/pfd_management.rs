//! PFD Management Request and Response messages.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::{Cause, OffendingIe};
use crate::ie::pfd::ApplicationIdsPfds;
use crate::ie::{put_slot, Ie, IeBody, IeReader, IeType};
use crate::message::{encode_message, message_body, Header, MsgType};

/// PFD Management Request: provisions packet flow descriptions per
/// application id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfdManagementRequest {
    pub header: Header,
    pub application_ids_pfds: Vec<ApplicationIdsPfds>,
    pub extras: Vec<Ie>,
}

impl PfdManagementRequest {
    pub fn new(sequence: u32, application_ids_pfds: Vec<ApplicationIdsPfds>) -> Self {
        PfdManagementRequest {
            header: Header::node(MsgType::PfdManagementRequest, sequence),
            application_ids_pfds,
            extras: Vec::new(),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            for group in &self.application_ids_pfds {
                group.encode(w)?;
            }
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
        let mut application_ids_pfds = Vec::new();
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::ApplicationIdsPfds => {
                    application_ids_pfds.push(ApplicationIdsPfds::parse(child.body)?)
                }
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(PfdManagementRequest {
            header,
            application_ids_pfds,
            extras,
        })
    }
}

/// PFD Management Response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfdManagementResponse {
    pub header: Header,
    pub cause: Cause,
    pub offending_ie: Option<OffendingIe>,
    pub extras: Vec<Ie>,
}

impl PfdManagementResponse {
    pub fn new(sequence: u32, cause: Cause, offending_ie: Option<OffendingIe>) -> Self {
        PfdManagementResponse {
            header: Header::node(MsgType::PfdManagementResponse, sequence),
            cause,
            offending_ie,
            extras: Vec::new(),
        }
    }

    pub fn accepted(sequence: u32) -> Self {
        PfdManagementResponse::new(sequence, Cause::accepted(), None)
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        encode_message(w, &self.header, |w| {
            self.cause.encode(w)?;
            if let Some(off) = &self.offending_ie {
                off.encode(w)?;
            }
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
        let mut cause = None;
        let mut offending_ie = None;
        let mut extras = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::Cause => put_slot(
                    &mut cause,
                    Cause::parse(child.body)?,
                    child.ie_type,
                    "PFD Management Response",
                ),
                IeType::OffendingIe => put_slot(
                    &mut offending_ie,
                    OffendingIe::parse(child.body)?,
                    child.ie_type,
                    "PFD Management Response",
                ),
                _ => extras.push(child.to_owned()),
            }
        }
        Ok(PfdManagementResponse {
            header,
            cause: cause.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::Cause,
                parent: None,
            })?,
            offending_ie,
            extras,
        })
    }
}
