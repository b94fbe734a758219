//! Operation envelopes for IEventClass2
//!
//! Two BSTR properties and two boolean properties; booleans travel as
//! 4-byte integers and any nonzero value decodes as true.

use crate::property::{
    bool_get_operation, bool_set_operation, bstr_get_operation, bstr_set_operation,
};

pub const OPNUM_GET_PUBLISHER_ID: u16 = 21;
pub const OPNUM_SET_PUBLISHER_ID: u16 = 22;
pub const OPNUM_GET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID: u16 = 23;
pub const OPNUM_SET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID: u16 = 24;
pub const OPNUM_GET_ALLOW_IN_PROCESS_ACTIVATION: u16 = 25;
pub const OPNUM_SET_ALLOW_IN_PROCESS_ACTIVATION: u16 = 26;
pub const OPNUM_GET_FIRE_IN_PARALLEL: u16 = 27;
pub const OPNUM_SET_FIRE_IN_PARALLEL: u16 = 28;

bstr_get_operation!(
    GetPublisherIdOperation,
    GetPublisherIdRequest,
    GetPublisherIdResponse,
    OPNUM_GET_PUBLISHER_ID,
    "/IEventClass2/v0/PublisherID",
    publisher_id
);

bstr_set_operation!(
    SetPublisherIdOperation,
    SetPublisherIdRequest,
    SetPublisherIdResponse,
    OPNUM_SET_PUBLISHER_ID,
    "/IEventClass2/v0/PublisherID",
    publisher_id
);

bstr_get_operation!(
    GetMultiInterfacePublisherFilterClassIdOperation,
    GetMultiInterfacePublisherFilterClassIdRequest,
    GetMultiInterfacePublisherFilterClassIdResponse,
    OPNUM_GET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID,
    "/IEventClass2/v0/MultiInterfacePublisherFilterCLSID",
    multi_interface_publisher_filter_class_id
);

bstr_set_operation!(
    SetMultiInterfacePublisherFilterClassIdOperation,
    SetMultiInterfacePublisherFilterClassIdRequest,
    SetMultiInterfacePublisherFilterClassIdResponse,
    OPNUM_SET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID,
    "/IEventClass2/v0/MultiInterfacePublisherFilterCLSID",
    multi_interface_publisher_filter_class_id
);

bool_get_operation!(
    GetAllowInProcessActivationOperation,
    GetAllowInProcessActivationRequest,
    GetAllowInProcessActivationResponse,
    OPNUM_GET_ALLOW_IN_PROCESS_ACTIVATION,
    "/IEventClass2/v0/AllowInprocActivation",
    allow_in_process_activation
);

bool_set_operation!(
    SetAllowInProcessActivationOperation,
    SetAllowInProcessActivationRequest,
    SetAllowInProcessActivationResponse,
    OPNUM_SET_ALLOW_IN_PROCESS_ACTIVATION,
    "/IEventClass2/v0/AllowInprocActivation",
    allow_in_process_activation
);

bool_get_operation!(
    GetFireInParallelOperation,
    GetFireInParallelRequest,
    GetFireInParallelResponse,
    OPNUM_GET_FIRE_IN_PARALLEL,
    "/IEventClass2/v0/FireInParallel",
    fire_in_parallel
);

bool_set_operation!(
    SetFireInParallelOperation,
    SetFireInParallelRequest,
    SetFireInParallelResponse,
    OPNUM_SET_FIRE_IN_PARALLEL,
    "/IEventClass2/v0/FireInParallel",
    fire_in_parallel
);
