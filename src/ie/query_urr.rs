//! Query URR Information Element.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::rule_ids::UrrId;
use crate::ie::{put_slot, IeBody, IeReader, IeType};

/// Query URR: asks the UP function for an immediate usage report for one URR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryUrr {
    pub urr_id: UrrId,
}

impl QueryUrr {
    pub fn new(urr_id: UrrId) -> Self {
        QueryUrr { urr_id }
    }
}

impl IeBody for QueryUrr {
    const TYPE: IeType = IeType::QueryUrr;

    fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
        self.urr_id.encode(w)
    }

    fn parse(body: &[u8]) -> Result<Self, PfcpError> {
        let mut urr_id = None;
        for child in IeReader::new(body) {
            let child = child?;
            if child.ie_type == IeType::UrrId {
                put_slot(
                    &mut urr_id,
                    UrrId::parse(child.body)?,
                    child.ie_type,
                    "Query URR",
                );
            }
        }
        Ok(QueryUrr {
            urr_id: urr_id.ok_or(PfcpError::MissingMandatoryIe {
                ie_type: IeType::UrrId,
                parent: Some(IeType::QueryUrr),
            })?,
        })
    }
}
