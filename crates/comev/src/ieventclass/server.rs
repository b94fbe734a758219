//! IEventClass server trait and dispatch

use async_trait::async_trait;
use dcom::{DcomError, Operation, Result, ServerHandle};
use ndr::NdrReader;
use oaut::idispatch::{self, DispatchServer};
use tracing::debug;

use super::operations::*;
use super::OPNUM_BASE;
use crate::property::dispatch_op;

/// Handler interface for IEventClass methods
#[async_trait]
pub trait EventClassServer: DispatchServer {
    async fn get_event_class_id(
        &self,
        req: &GetEventClassIdRequest,
    ) -> Result<GetEventClassIdResponse>;

    async fn set_event_class_id(
        &self,
        req: &SetEventClassIdRequest,
    ) -> Result<SetEventClassIdResponse>;

    async fn get_event_class_name(
        &self,
        req: &GetEventClassNameRequest,
    ) -> Result<GetEventClassNameResponse>;

    async fn set_event_class_name(
        &self,
        req: &SetEventClassNameRequest,
    ) -> Result<SetEventClassNameResponse>;

    async fn get_owner_sid(&self, req: &GetOwnerSidRequest) -> Result<GetOwnerSidResponse>;

    async fn set_owner_sid(&self, req: &SetOwnerSidRequest) -> Result<SetOwnerSidResponse>;

    async fn get_firing_interface_id(
        &self,
        req: &GetFiringInterfaceIdRequest,
    ) -> Result<GetFiringInterfaceIdResponse>;

    async fn set_firing_interface_id(
        &self,
        req: &SetFiringInterfaceIdRequest,
    ) -> Result<SetFiringInterfaceIdResponse>;

    async fn get_description(&self, req: &GetDescriptionRequest) -> Result<GetDescriptionResponse>;

    async fn set_description(&self, req: &SetDescriptionRequest) -> Result<SetDescriptionResponse>;

    async fn get_type_lib(&self, req: &GetTypeLibRequest) -> Result<GetTypeLibResponse>;

    async fn set_type_lib(&self, req: &SetTypeLibRequest) -> Result<SetTypeLibResponse>;
}

/// Dispatch one IEventClass-chain opnum. Opnums below this interface's
/// range delegate to IDispatch; the reserved opnums 17 and 18 are
/// acknowledged without touching the stream or any handler.
pub async fn server_handle<S>(
    server: &S,
    op_num: u16,
    r: &mut NdrReader,
) -> Result<Option<Box<dyn Operation>>>
where
    S: EventClassServer + ?Sized,
{
    if op_num < OPNUM_BASE {
        return idispatch::server_handle(server, op_num, r).await;
    }
    match op_num {
        OPNUM_GET_EVENT_CLASS_ID => dispatch_op!(
            server,
            r,
            GetEventClassIdOperation,
            GetEventClassIdRequest,
            get_event_class_id
        ),
        OPNUM_SET_EVENT_CLASS_ID => dispatch_op!(
            server,
            r,
            SetEventClassIdOperation,
            SetEventClassIdRequest,
            set_event_class_id
        ),
        OPNUM_GET_EVENT_CLASS_NAME => dispatch_op!(
            server,
            r,
            GetEventClassNameOperation,
            GetEventClassNameRequest,
            get_event_class_name
        ),
        OPNUM_SET_EVENT_CLASS_NAME => dispatch_op!(
            server,
            r,
            SetEventClassNameOperation,
            SetEventClassNameRequest,
            set_event_class_name
        ),
        OPNUM_GET_OWNER_SID => {
            dispatch_op!(server, r, GetOwnerSidOperation, GetOwnerSidRequest, get_owner_sid)
        }
        OPNUM_SET_OWNER_SID => {
            dispatch_op!(server, r, SetOwnerSidOperation, SetOwnerSidRequest, set_owner_sid)
        }
        OPNUM_GET_FIRING_INTERFACE_ID => dispatch_op!(
            server,
            r,
            GetFiringInterfaceIdOperation,
            GetFiringInterfaceIdRequest,
            get_firing_interface_id
        ),
        OPNUM_SET_FIRING_INTERFACE_ID => dispatch_op!(
            server,
            r,
            SetFiringInterfaceIdOperation,
            SetFiringInterfaceIdRequest,
            set_firing_interface_id
        ),
        OPNUM_GET_DESCRIPTION => dispatch_op!(
            server,
            r,
            GetDescriptionOperation,
            GetDescriptionRequest,
            get_description
        ),
        OPNUM_SET_DESCRIPTION => dispatch_op!(
            server,
            r,
            SetDescriptionOperation,
            SetDescriptionRequest,
            set_description
        ),
        OPNUM_RESERVED_17 | OPNUM_RESERVED_18 => {
            debug!(op_num, "reserved opnum, not used on wire");
            Ok(None)
        }
        OPNUM_GET_TYPE_LIB => {
            dispatch_op!(server, r, GetTypeLibOperation, GetTypeLibRequest, get_type_lib)
        }
        OPNUM_SET_TYPE_LIB => {
            dispatch_op!(server, r, SetTypeLibOperation, SetTypeLibRequest, set_type_lib)
        }
        other => Err(DcomError::UnknownOpnum(other)),
    }
}

/// [`ServerHandle`] adapter rooting the chain at IEventClass
pub struct EventClassServerHandle<S>(pub S);

#[async_trait]
impl<S: EventClassServer> ServerHandle for EventClassServerHandle<S> {
    async fn dispatch(&self, op_num: u16, r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>> {
        server_handle(&self.0, op_num, r).await
    }
}

/// Answers every IEventClass method with E_NOTIMPL
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedEventClassServer;

impl dcom::iunknown::UnknownServer for UnimplementedEventClassServer {}

#[async_trait]
impl DispatchServer for UnimplementedEventClassServer {
    async fn get_type_info_count(
        &self,
        _req: &oaut::idispatch::GetTypeInfoCountRequest,
    ) -> Result<oaut::idispatch::GetTypeInfoCountResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_type_info(
        &self,
        _req: &oaut::idispatch::GetTypeInfoRequest,
    ) -> Result<oaut::idispatch::GetTypeInfoResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_ids_of_names(
        &self,
        _req: &oaut::idispatch::GetIDsOfNamesRequest,
    ) -> Result<oaut::idispatch::GetIDsOfNamesResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn invoke(
        &self,
        _req: &oaut::idispatch::InvokeRequest,
    ) -> Result<oaut::idispatch::InvokeResponse> {
        Err(DcomError::NotImplemented)
    }
}

#[async_trait]
impl EventClassServer for UnimplementedEventClassServer {
    async fn get_event_class_id(
        &self,
        _req: &GetEventClassIdRequest,
    ) -> Result<GetEventClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_event_class_id(
        &self,
        _req: &SetEventClassIdRequest,
    ) -> Result<SetEventClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_event_class_name(
        &self,
        _req: &GetEventClassNameRequest,
    ) -> Result<GetEventClassNameResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_event_class_name(
        &self,
        _req: &SetEventClassNameRequest,
    ) -> Result<SetEventClassNameResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_owner_sid(&self, _req: &GetOwnerSidRequest) -> Result<GetOwnerSidResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_owner_sid(&self, _req: &SetOwnerSidRequest) -> Result<SetOwnerSidResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_firing_interface_id(
        &self,
        _req: &GetFiringInterfaceIdRequest,
    ) -> Result<GetFiringInterfaceIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_firing_interface_id(
        &self,
        _req: &SetFiringInterfaceIdRequest,
    ) -> Result<SetFiringInterfaceIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_description(
        &self,
        _req: &GetDescriptionRequest,
    ) -> Result<GetDescriptionResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_description(
        &self,
        _req: &SetDescriptionRequest,
    ) -> Result<SetDescriptionResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_type_lib(&self, _req: &GetTypeLibRequest) -> Result<GetTypeLibResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_type_lib(&self, _req: &SetTypeLibRequest) -> Result<SetTypeLibResponse> {
        Err(DcomError::NotImplemented)
    }
}
