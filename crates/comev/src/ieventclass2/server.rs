//! IEventClass2 server trait and dispatch

use async_trait::async_trait;
use dcom::{DcomError, Operation, Result, ServerHandle};
use ndr::NdrReader;
use oaut::idispatch::DispatchServer;

use super::operations::*;
use super::OPNUM_BASE;
use crate::ieventclass::{self, EventClassServer};
use crate::property::dispatch_op;

/// Handler interface for IEventClass2 methods
#[async_trait]
pub trait EventClass2Server: EventClassServer {
    async fn get_publisher_id(
        &self,
        req: &GetPublisherIdRequest,
    ) -> Result<GetPublisherIdResponse>;

    async fn set_publisher_id(
        &self,
        req: &SetPublisherIdRequest,
    ) -> Result<SetPublisherIdResponse>;

    async fn get_multi_interface_publisher_filter_class_id(
        &self,
        req: &GetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<GetMultiInterfacePublisherFilterClassIdResponse>;

    async fn set_multi_interface_publisher_filter_class_id(
        &self,
        req: &SetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<SetMultiInterfacePublisherFilterClassIdResponse>;

    async fn get_allow_in_process_activation(
        &self,
        req: &GetAllowInProcessActivationRequest,
    ) -> Result<GetAllowInProcessActivationResponse>;

    async fn set_allow_in_process_activation(
        &self,
        req: &SetAllowInProcessActivationRequest,
    ) -> Result<SetAllowInProcessActivationResponse>;

    async fn get_fire_in_parallel(
        &self,
        req: &GetFireInParallelRequest,
    ) -> Result<GetFireInParallelResponse>;

    async fn set_fire_in_parallel(
        &self,
        req: &SetFireInParallelRequest,
    ) -> Result<SetFireInParallelResponse>;
}

/// Dispatch one IEventClass2-chain opnum. Opnums below this interface's
/// range delegate to IEventClass and, through it, to IDispatch.
pub async fn server_handle<S>(
    server: &S,
    op_num: u16,
    r: &mut NdrReader,
) -> Result<Option<Box<dyn Operation>>>
where
    S: EventClass2Server + ?Sized,
{
    if op_num < OPNUM_BASE {
        return ieventclass::server_handle(server, op_num, r).await;
    }
    match op_num {
        OPNUM_GET_PUBLISHER_ID => dispatch_op!(
            server,
            r,
            GetPublisherIdOperation,
            GetPublisherIdRequest,
            get_publisher_id
        ),
        OPNUM_SET_PUBLISHER_ID => dispatch_op!(
            server,
            r,
            SetPublisherIdOperation,
            SetPublisherIdRequest,
            set_publisher_id
        ),
        OPNUM_GET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID => dispatch_op!(
            server,
            r,
            GetMultiInterfacePublisherFilterClassIdOperation,
            GetMultiInterfacePublisherFilterClassIdRequest,
            get_multi_interface_publisher_filter_class_id
        ),
        OPNUM_SET_MULTI_INTERFACE_PUBLISHER_FILTER_CLASS_ID => dispatch_op!(
            server,
            r,
            SetMultiInterfacePublisherFilterClassIdOperation,
            SetMultiInterfacePublisherFilterClassIdRequest,
            set_multi_interface_publisher_filter_class_id
        ),
        OPNUM_GET_ALLOW_IN_PROCESS_ACTIVATION => dispatch_op!(
            server,
            r,
            GetAllowInProcessActivationOperation,
            GetAllowInProcessActivationRequest,
            get_allow_in_process_activation
        ),
        OPNUM_SET_ALLOW_IN_PROCESS_ACTIVATION => dispatch_op!(
            server,
            r,
            SetAllowInProcessActivationOperation,
            SetAllowInProcessActivationRequest,
            set_allow_in_process_activation
        ),
        OPNUM_GET_FIRE_IN_PARALLEL => dispatch_op!(
            server,
            r,
            GetFireInParallelOperation,
            GetFireInParallelRequest,
            get_fire_in_parallel
        ),
        OPNUM_SET_FIRE_IN_PARALLEL => dispatch_op!(
            server,
            r,
            SetFireInParallelOperation,
            SetFireInParallelRequest,
            set_fire_in_parallel
        ),
        other => Err(DcomError::UnknownOpnum(other)),
    }
}

/// [`ServerHandle`] adapter rooting the chain at IEventClass2
pub struct EventClass2ServerHandle<S>(pub S);

#[async_trait]
impl<S: EventClass2Server> ServerHandle for EventClass2ServerHandle<S> {
    async fn dispatch(&self, op_num: u16, r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>> {
        server_handle(&self.0, op_num, r).await
    }
}

/// Answers every IEventClass2 method with E_NOTIMPL
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedEventClass2Server;

impl dcom::iunknown::UnknownServer for UnimplementedEventClass2Server {}

#[async_trait]
impl DispatchServer for UnimplementedEventClass2Server {
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
impl EventClassServer for UnimplementedEventClass2Server {
    async fn get_event_class_id(
        &self,
        _req: &ieventclass::GetEventClassIdRequest,
    ) -> Result<ieventclass::GetEventClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_event_class_id(
        &self,
        _req: &ieventclass::SetEventClassIdRequest,
    ) -> Result<ieventclass::SetEventClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_event_class_name(
        &self,
        _req: &ieventclass::GetEventClassNameRequest,
    ) -> Result<ieventclass::GetEventClassNameResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_event_class_name(
        &self,
        _req: &ieventclass::SetEventClassNameRequest,
    ) -> Result<ieventclass::SetEventClassNameResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_owner_sid(
        &self,
        _req: &ieventclass::GetOwnerSidRequest,
    ) -> Result<ieventclass::GetOwnerSidResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_owner_sid(
        &self,
        _req: &ieventclass::SetOwnerSidRequest,
    ) -> Result<ieventclass::SetOwnerSidResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_firing_interface_id(
        &self,
        _req: &ieventclass::GetFiringInterfaceIdRequest,
    ) -> Result<ieventclass::GetFiringInterfaceIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_firing_interface_id(
        &self,
        _req: &ieventclass::SetFiringInterfaceIdRequest,
    ) -> Result<ieventclass::SetFiringInterfaceIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_description(
        &self,
        _req: &ieventclass::GetDescriptionRequest,
    ) -> Result<ieventclass::GetDescriptionResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_description(
        &self,
        _req: &ieventclass::SetDescriptionRequest,
    ) -> Result<ieventclass::SetDescriptionResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_type_lib(
        &self,
        _req: &ieventclass::GetTypeLibRequest,
    ) -> Result<ieventclass::GetTypeLibResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_type_lib(
        &self,
        _req: &ieventclass::SetTypeLibRequest,
    ) -> Result<ieventclass::SetTypeLibResponse> {
        Err(DcomError::NotImplemented)
    }
}

#[async_trait]
impl EventClass2Server for UnimplementedEventClass2Server {
    async fn get_publisher_id(
        &self,
        _req: &GetPublisherIdRequest,
    ) -> Result<GetPublisherIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_publisher_id(
        &self,
        _req: &SetPublisherIdRequest,
    ) -> Result<SetPublisherIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_multi_interface_publisher_filter_class_id(
        &self,
        _req: &GetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<GetMultiInterfacePublisherFilterClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_multi_interface_publisher_filter_class_id(
        &self,
        _req: &SetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<SetMultiInterfacePublisherFilterClassIdResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_allow_in_process_activation(
        &self,
        _req: &GetAllowInProcessActivationRequest,
    ) -> Result<GetAllowInProcessActivationResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_allow_in_process_activation(
        &self,
        _req: &SetAllowInProcessActivationRequest,
    ) -> Result<SetAllowInProcessActivationResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_fire_in_parallel(
        &self,
        _req: &GetFireInParallelRequest,
    ) -> Result<GetFireInParallelResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn set_fire_in_parallel(
        &self,
        _req: &SetFireInParallelRequest,
    ) -> Result<SetFireInParallelResponse> {
        Err(DcomError::NotImplemented)
    }
}
