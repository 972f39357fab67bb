//! Remove variants of the rule grouped Information Elements.
//!
//! Each carries exactly the id of the rule being deleted.

use crate::codec::Writer;
use crate::error::PfcpError;
use crate::ie::rule_ids::{FarId, PdrId, QerId, UrrId};
use crate::ie::{put_slot, IeBody, IeReader, IeType};

macro_rules! remove_ie {
    ($(#[doc = $doc:expr])* $name:ident, $ie_type:ident, $id_ty:ident, $id_ie:ident, $field:ident, $scope:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub $field: $id_ty,
        }

        impl $name {
            pub fn new($field: $id_ty) -> Self {
                $name { $field }
            }
        }

        impl IeBody for $name {
            const TYPE: IeType = IeType::$ie_type;

            fn emit(&self, w: &mut Writer<'_>) -> Result<(), PfcpError> {
                self.$field.encode(w)
            }

            fn parse(body: &[u8]) -> Result<Self, PfcpError> {
                let mut id = None;
                for child in IeReader::new(body) {
                    let child = child?;
                    if child.ie_type == IeType::$id_ie {
                        put_slot(&mut id, $id_ty::parse(child.body)?, child.ie_type, $scope);
                    }
                }
                Ok($name {
                    $field: id.ok_or(PfcpError::MissingMandatoryIe {
                        ie_type: IeType::$id_ie,
                        parent: Some(IeType::$ie_type),
                    })?,
                })
            }
        }
    };
}

remove_ie!(
    #[doc = " Remove PDR."]
    RemovePdr, RemovePdr, PdrId, PdrId, pdr_id, "Remove PDR"
);
remove_ie!(
    #[doc = " Remove FAR."]
    RemoveFar, RemoveFar, FarId, FarId, far_id, "Remove FAR"
);
remove_ie!(
    #[doc = " Remove URR."]
    RemoveUrr, RemoveUrr, UrrId, UrrId, urr_id, "Remove URR"
);
remove_ie!(
    #[doc = " Remove QER."]
    RemoveQer, RemoveQer, QerId, QerId, qer_id, "Remove QER"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_pdr_round_trip() {
        let remove = RemovePdr::new(PdrId::new(11));
        let ie = remove.to_ie().unwrap();
        assert_eq!(ie.ie_type.code(), 15);
        assert_eq!(RemovePdr::parse(&ie.payload).unwrap(), remove);
    }

    #[test]
    fn remove_far_round_trip() {
        let remove = RemoveFar::new(FarId::new(12));
        let ie = remove.to_ie().unwrap();
        assert_eq!(RemoveFar::parse(&ie.payload).unwrap(), remove);
    }

    #[test]
    fn id_mandatory() {
        assert!(RemovePdr::parse(&[]).is_err());
        assert!(RemoveUrr::parse(&[]).is_err());
        assert!(RemoveQer::parse(&[]).is_err());
    }
}
