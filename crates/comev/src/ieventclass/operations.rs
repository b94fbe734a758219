//! Operation envelopes for IEventClass
//!
//! All methods are BSTR property accessors. Opnums 17 and 18 are reserved
//! and never appear on the wire; no envelope exists for them.

use crate::property::{bstr_get_operation, bstr_set_operation};

pub const OPNUM_GET_EVENT_CLASS_ID: u16 = 7;
pub const OPNUM_SET_EVENT_CLASS_ID: u16 = 8;
pub const OPNUM_GET_EVENT_CLASS_NAME: u16 = 9;
pub const OPNUM_SET_EVENT_CLASS_NAME: u16 = 10;
pub const OPNUM_GET_OWNER_SID: u16 = 11;
pub const OPNUM_SET_OWNER_SID: u16 = 12;
pub const OPNUM_GET_FIRING_INTERFACE_ID: u16 = 13;
pub const OPNUM_SET_FIRING_INTERFACE_ID: u16 = 14;
pub const OPNUM_GET_DESCRIPTION: u16 = 15;
pub const OPNUM_SET_DESCRIPTION: u16 = 16;
pub const OPNUM_RESERVED_17: u16 = 17;
pub const OPNUM_RESERVED_18: u16 = 18;
pub const OPNUM_GET_TYPE_LIB: u16 = 19;
pub const OPNUM_SET_TYPE_LIB: u16 = 20;

bstr_get_operation!(
    GetEventClassIdOperation,
    GetEventClassIdRequest,
    GetEventClassIdResponse,
    OPNUM_GET_EVENT_CLASS_ID,
    "/IEventClass/v0/EventClassID",
    event_class_id
);

bstr_set_operation!(
    SetEventClassIdOperation,
    SetEventClassIdRequest,
    SetEventClassIdResponse,
    OPNUM_SET_EVENT_CLASS_ID,
    "/IEventClass/v0/EventClassID",
    event_class_id
);

bstr_get_operation!(
    GetEventClassNameOperation,
    GetEventClassNameRequest,
    GetEventClassNameResponse,
    OPNUM_GET_EVENT_CLASS_NAME,
    "/IEventClass/v0/EventClassName",
    event_class_name
);

bstr_set_operation!(
    SetEventClassNameOperation,
    SetEventClassNameRequest,
    SetEventClassNameResponse,
    OPNUM_SET_EVENT_CLASS_NAME,
    "/IEventClass/v0/EventClassName",
    event_class_name
);

bstr_get_operation!(
    GetOwnerSidOperation,
    GetOwnerSidRequest,
    GetOwnerSidResponse,
    OPNUM_GET_OWNER_SID,
    "/IEventClass/v0/OwnerSID",
    owner_sid
);

bstr_set_operation!(
    SetOwnerSidOperation,
    SetOwnerSidRequest,
    SetOwnerSidResponse,
    OPNUM_SET_OWNER_SID,
    "/IEventClass/v0/OwnerSID",
    owner_sid
);

bstr_get_operation!(
    GetFiringInterfaceIdOperation,
    GetFiringInterfaceIdRequest,
    GetFiringInterfaceIdResponse,
    OPNUM_GET_FIRING_INTERFACE_ID,
    "/IEventClass/v0/FiringInterfaceID",
    firing_interface_id
);

bstr_set_operation!(
    SetFiringInterfaceIdOperation,
    SetFiringInterfaceIdRequest,
    SetFiringInterfaceIdResponse,
    OPNUM_SET_FIRING_INTERFACE_ID,
    "/IEventClass/v0/FiringInterfaceID",
    firing_interface_id
);

bstr_get_operation!(
    GetDescriptionOperation,
    GetDescriptionRequest,
    GetDescriptionResponse,
    OPNUM_GET_DESCRIPTION,
    "/IEventClass/v0/Description",
    description
);

bstr_set_operation!(
    SetDescriptionOperation,
    SetDescriptionRequest,
    SetDescriptionResponse,
    OPNUM_SET_DESCRIPTION,
    "/IEventClass/v0/Description",
    description
);

bstr_get_operation!(
    GetTypeLibOperation,
    GetTypeLibRequest,
    GetTypeLibResponse,
    OPNUM_GET_TYPE_LIB,
    "/IEventClass/v0/TypeLib",
    type_lib
);

bstr_set_operation!(
    SetTypeLibOperation,
    SetTypeLibRequest,
    SetTypeLibResponse,
    OPNUM_SET_TYPE_LIB,
    "/IEventClass/v0/TypeLib",
    type_lib
);

#[cfg(test)]
mod tests {
    use super::*;
    use dcom::{Operation, OrpcThis};
    use ndr::{NdrReader, NdrWriter};
    use oaut::BStr;

    #[test]
    fn get_response_round_trip() {
        let mut op = GetEventClassIdOperation {
            that: Default::default(),
            event_class_id: Some(BStr::new("{00000000-0000-0000-0000-000000000001}")),
            return_code: dcom::hresult::S_OK,
            ..Default::default()
        };
        let mut w = NdrWriter::new();
        op.marshal_ndr_response(&mut w).unwrap();

        let mut decoded = GetEventClassIdOperation::default();
        let mut r = NdrReader::new(w.into_bytes());
        decoded.unmarshal_ndr_response(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(decoded.event_class_id, op.event_class_id);
        assert_eq!(decoded.return_code, 0);
    }

    #[test]
    fn set_request_round_trip_preserves_null() {
        let mut op = SetOwnerSidOperation {
            this: OrpcThis::for_call(),
            owner_sid: None,
            ..Default::default()
        };
        let mut w = NdrWriter::new();
        op.marshal_ndr_request(&mut w).unwrap();

        let mut decoded = SetOwnerSidOperation::default();
        let mut r = NdrReader::new(w.into_bytes());
        decoded.unmarshal_ndr_request(&mut r).unwrap();
        assert_eq!(decoded.this, op.this);
        assert_eq!(decoded.owner_sid, None);
    }

    #[test]
    fn op_identity() {
        let op = GetTypeLibOperation::default();
        assert_eq!(op.op_num(), 19);
        assert_eq!(op.op_name(), "/IEventClass/v0/TypeLib");
    }
}
