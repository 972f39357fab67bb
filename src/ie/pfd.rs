//! PFD provisioning Information Elements.
//!
//! A PFD Management Request carries Application ID's PFDs groups; each pairs
//! an application id with PFD Context groups holding the PFD Contents.

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::filters::ApplicationId;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

const PFD_FLAG_FD: u8 = 0x01;
const PFD_FLAG_URL: u8 = 0x02;
const PFD_FLAG_DN: u8 = 0x04;

/// PFD Contents: the actual detection data, each part flag-gated and
/// length-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PfdContents {
    pub flow_description: Option<String>,
    pub url: Option<String>,
    pub domain_name: Option<String>,
}

impl PfdContents {
    pub fn flow(description: &str) -> Self {
        PfdContents {
            flow_description: Some(description.to_string()),
            ..Default::default()
        }
    }

    fn emit_part(w: &mut Writer<'_>, part: &str, context: &'static str) -> Result<(), PfcpError> {
        let bytes = part.as_bytes();
        if bytes.len() > u16::MAX as usize {
            return Err(PfcpError::InvalidLength {
                context,
                needed: bytes.len(),
                remaining: u16::MAX as usize,
            });
        }
        w.write_u16(bytes.len() as u16)?;
        w.write_bytes(bytes)
    }

    fn parse_part(r: &mut Reader<'_>, context: &'static str) -> Result<String, PfcpError> {
        let len = r.read_u16()? as usize;
        let bytes = r.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PfcpError::InvalidValue {
            context,
            value: len as u64,
        })
    }
}

impl IeBody for PfdContents {
    const TYPE: IeType = IeType::PfdContents;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        let mut flags = 0;
        if self.flow_description.is_some() {
            flags |= PFD_FLAG_FD;
        }
        if self.url.is_some() {
            flags |= PFD_FLAG_URL;
        }
        if self.domain_name.is_some() {
            flags |= PFD_FLAG_DN;
        }
        w.write_u8(flags)?;
        w.write_u8(0)?; // spare
        if let Some(fd) = &self.flow_description {
            Self::emit_part(w, fd, "PFD flow description")?;
        }
        if let Some(url) = &self.url {
            Self::emit_part(w, url, "PFD URL")?;
        }
        if let Some(dn) = &self.domain_name {
            Self::emit_part(w, dn, "PFD domain name")?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut r = Reader::new(body);
        let flags = r.read_u8()?;
        r.skip(1)?;
        let flow_description = if flags & PFD_FLAG_FD != 0 {
            Some(Self::parse_part(&mut r, "PFD flow description")?)
        } else {
            None
        };
        let url = if flags & PFD_FLAG_URL != 0 {
            Some(Self::parse_part(&mut r, "PFD URL")?)
        } else {
            None
        };
        let domain_name = if flags & PFD_FLAG_DN != 0 {
            Some(Self::parse_part(&mut r, "PFD domain name")?)
        } else {
            None
        };
        Ok(PfdContents {
            flow_description,
            url,
            domain_name,
        })
    }
}

/// PFD Context: wraps one or more PFD Contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PfdContext {
    pub contents: Vec<PfdContents>,
}

impl PfdContext {
    pub fn new(contents: Vec<PfdContents>) -> Self {
        PfdContext { contents }
    }
}

impl IeBody for PfdContext {
    const TYPE: IeType = IeType::PfdContext;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        for c in &self.contents {
            c.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut contents = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            if child.ie_type == IeType::PfdContents {
                contents.push(PfdContents::parse(child.body)?);
            }
        }
        Ok(PfdContext { contents })
    }
}

/// Application ID's PFDs: the application id plus its PFD contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationIdsPfds {
    pub application_id: ApplicationId,
    pub contexts: Vec<PfdContext>,
}

impl ApplicationIdsPfds {
    pub fn new(application_id: ApplicationId, contexts: Vec<PfdContext>) -> Self {
        ApplicationIdsPfds {
            application_id,
            contexts,
        }
    }
}

impl IeBody for ApplicationIdsPfds {
    const TYPE: IeType = IeType::ApplicationIdsPfds;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.application_id.encode(w)?;
        for c in &self.contexts {
            c.encode(w)?;
        }
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut application_id = None;
        let mut contexts = Vec::new();
        for child in IeReader::new(body) {
            let child = child?;
            match child.ie_type {
                IeType::ApplicationId => put_slot(
                    &mut application_id,
                    ApplicationId::parse(child.body)?,
                    child.ie_type,
                    "Application ID's PFDs",
                ),
                IeType::PfdContext => contexts.push(PfdContext::parse(child.body)?),
                _ => {}
            }
        }
        Ok(ApplicationIdsPfds {
            application_id: application_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::ApplicationId,
                parent: Some(IeType::ApplicationIdsPfds),
            })?,
            contexts,
        })
    }
}
