//! In-memory plumbing for exercising client proxies against server
//! dispatch without a transport.
//!
//! [`LoopbackConn`] carries each call as real NDR bytes: the request is
//! marshaled, re-read on the server side, dispatched, and the response is
//! marshaled and re-read on the client side. Anything the codec gets
//! wrong shows up here the same way it would over DCE/RPC.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dcom::{CallOptions, Conn, DcomError, Operation, Result, ServerHandle, SyntaxId};
use ndr::{NdrReader, NdrWriter};
use oaut::idispatch::DispatchServer;
use oaut::BStr;
use tracing::debug;

use comev::ieventclass::{
    EventClassServer, GetDescriptionRequest, GetDescriptionResponse, GetEventClassIdRequest,
    GetEventClassIdResponse, GetEventClassNameRequest, GetEventClassNameResponse,
    GetFiringInterfaceIdRequest, GetFiringInterfaceIdResponse, GetOwnerSidRequest,
    GetOwnerSidResponse, GetTypeLibRequest, GetTypeLibResponse, SetDescriptionRequest,
    SetDescriptionResponse, SetEventClassIdRequest, SetEventClassIdResponse,
    SetEventClassNameRequest, SetEventClassNameResponse, SetFiringInterfaceIdRequest,
    SetFiringInterfaceIdResponse, SetOwnerSidRequest, SetOwnerSidResponse, SetTypeLibRequest,
    SetTypeLibResponse,
};
use comev::ieventclass2::{
    EventClass2Server, GetAllowInProcessActivationRequest, GetAllowInProcessActivationResponse,
    GetFireInParallelRequest, GetFireInParallelResponse,
    GetMultiInterfacePublisherFilterClassIdRequest,
    GetMultiInterfacePublisherFilterClassIdResponse, GetPublisherIdRequest, GetPublisherIdResponse,
    SetAllowInProcessActivationRequest, SetAllowInProcessActivationResponse,
    SetFireInParallelRequest, SetFireInParallelResponse,
    SetMultiInterfacePublisherFilterClassIdRequest,
    SetMultiInterfacePublisherFilterClassIdResponse, SetPublisherIdRequest, SetPublisherIdResponse,
};

/// Loopback connection over a [`ServerHandle`]
pub struct LoopbackConn {
    handle: Arc<dyn ServerHandle>,
    sub_conns_available: bool,
}

impl LoopbackConn {
    pub fn new(handle: Arc<dyn ServerHandle>) -> Arc<Self> {
        Arc::new(Self {
            handle,
            sub_conns_available: true,
        })
    }

    /// A connection whose `sub_conn` always fails, so proxies fall back
    /// to the primary connection.
    pub fn without_sub_conns(handle: Arc<dyn ServerHandle>) -> Arc<Self> {
        Arc::new(Self {
            handle,
            sub_conns_available: false,
        })
    }
}

#[async_trait]
impl Conn for LoopbackConn {
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        if opts.ipid().is_none() {
            return Err(DcomError::MissingIpid);
        }
        debug!(op_name = op.op_name(), "loopback call");

        let mut w = NdrWriter::new();
        op.marshal_ndr_request(&mut w)?;
        let mut r = NdrReader::new(w.into_bytes());

        let mut response = self
            .handle
            .dispatch(op.op_num(), &mut r)
            .await?
            .ok_or_else(|| {
                DcomError::Transport(format!("opnum {} produced no response", op.op_num()))
            })?;

        let mut w = NdrWriter::new();
        response.marshal_ndr_response(&mut w)?;
        let mut r = NdrReader::new(w.into_bytes());
        op.unmarshal_ndr_response(&mut r)
    }

    async fn sub_conn(&self, syntax: &SyntaxId) -> Result<Arc<dyn Conn>> {
        if self.sub_conns_available {
            Ok(Arc::new(Self {
                handle: self.handle.clone(),
                sub_conns_available: true,
            }))
        } else {
            Err(DcomError::Transport(format!("no endpoint for {syntax}")))
        }
    }
}

/// Mutable event-class registration backing [`InMemoryEventClass`]
#[derive(Debug, Default)]
pub struct EventClassState {
    pub event_class_id: Option<BStr>,
    pub event_class_name: Option<BStr>,
    pub owner_sid: Option<BStr>,
    pub firing_interface_id: Option<BStr>,
    pub description: Option<BStr>,
    pub type_lib: Option<BStr>,
    pub publisher_id: Option<BStr>,
    pub multi_interface_publisher_filter_class_id: Option<BStr>,
    pub allow_in_process_activation: bool,
    pub fire_in_parallel: bool,
}

/// An IEventClass2 server backed by in-process state. Property gets and
/// sets succeed; the IDispatch surface reports no type information and
/// leaves name lookup and late binding unimplemented.
#[derive(Debug, Default)]
pub struct InMemoryEventClass {
    pub state: Mutex<EventClassState>,
}

impl InMemoryEventClass {
    fn read<T>(&self, f: impl FnOnce(&EventClassState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    fn write(&self, f: impl FnOnce(&mut EventClassState)) {
        f(&mut self.state.lock().unwrap())
    }
}

impl dcom::iunknown::UnknownServer for InMemoryEventClass {}

#[async_trait]
impl DispatchServer for InMemoryEventClass {
    async fn get_type_info_count(
        &self,
        _req: &oaut::idispatch::GetTypeInfoCountRequest,
    ) -> Result<oaut::idispatch::GetTypeInfoCountResponse> {
        Ok(oaut::idispatch::GetTypeInfoCountResponse::default())
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
impl EventClassServer for InMemoryEventClass {
    async fn get_event_class_id(
        &self,
        _req: &GetEventClassIdRequest,
    ) -> Result<GetEventClassIdResponse> {
        Ok(GetEventClassIdResponse {
            event_class_id: self.read(|s| s.event_class_id.clone()),
            ..Default::default()
        })
    }

    async fn set_event_class_id(
        &self,
        req: &SetEventClassIdRequest,
    ) -> Result<SetEventClassIdResponse> {
        self.write(|s| s.event_class_id = req.event_class_id.clone());
        Ok(SetEventClassIdResponse::default())
    }

    async fn get_event_class_name(
        &self,
        _req: &GetEventClassNameRequest,
    ) -> Result<GetEventClassNameResponse> {
        Ok(GetEventClassNameResponse {
            event_class_name: self.read(|s| s.event_class_name.clone()),
            ..Default::default()
        })
    }

    async fn set_event_class_name(
        &self,
        req: &SetEventClassNameRequest,
    ) -> Result<SetEventClassNameResponse> {
        self.write(|s| s.event_class_name = req.event_class_name.clone());
        Ok(SetEventClassNameResponse::default())
    }

    async fn get_owner_sid(&self, _req: &GetOwnerSidRequest) -> Result<GetOwnerSidResponse> {
        Ok(GetOwnerSidResponse {
            owner_sid: self.read(|s| s.owner_sid.clone()),
            ..Default::default()
        })
    }

    async fn set_owner_sid(&self, req: &SetOwnerSidRequest) -> Result<SetOwnerSidResponse> {
        self.write(|s| s.owner_sid = req.owner_sid.clone());
        Ok(SetOwnerSidResponse::default())
    }

    async fn get_firing_interface_id(
        &self,
        _req: &GetFiringInterfaceIdRequest,
    ) -> Result<GetFiringInterfaceIdResponse> {
        Ok(GetFiringInterfaceIdResponse {
            firing_interface_id: self.read(|s| s.firing_interface_id.clone()),
            ..Default::default()
        })
    }

    async fn set_firing_interface_id(
        &self,
        req: &SetFiringInterfaceIdRequest,
    ) -> Result<SetFiringInterfaceIdResponse> {
        self.write(|s| s.firing_interface_id = req.firing_interface_id.clone());
        Ok(SetFiringInterfaceIdResponse::default())
    }

    async fn get_description(
        &self,
        _req: &GetDescriptionRequest,
    ) -> Result<GetDescriptionResponse> {
        Ok(GetDescriptionResponse {
            description: self.read(|s| s.description.clone()),
            ..Default::default()
        })
    }

    async fn set_description(
        &self,
        req: &SetDescriptionRequest,
    ) -> Result<SetDescriptionResponse> {
        self.write(|s| s.description = req.description.clone());
        Ok(SetDescriptionResponse::default())
    }

    async fn get_type_lib(&self, _req: &GetTypeLibRequest) -> Result<GetTypeLibResponse> {
        Ok(GetTypeLibResponse {
            type_lib: self.read(|s| s.type_lib.clone()),
            ..Default::default()
        })
    }

    async fn set_type_lib(&self, req: &SetTypeLibRequest) -> Result<SetTypeLibResponse> {
        self.write(|s| s.type_lib = req.type_lib.clone());
        Ok(SetTypeLibResponse::default())
    }
}

#[async_trait]
impl EventClass2Server for InMemoryEventClass {
    async fn get_publisher_id(
        &self,
        _req: &GetPublisherIdRequest,
    ) -> Result<GetPublisherIdResponse> {
        Ok(GetPublisherIdResponse {
            publisher_id: self.read(|s| s.publisher_id.clone()),
            ..Default::default()
        })
    }

    async fn set_publisher_id(
        &self,
        req: &SetPublisherIdRequest,
    ) -> Result<SetPublisherIdResponse> {
        self.write(|s| s.publisher_id = req.publisher_id.clone());
        Ok(SetPublisherIdResponse::default())
    }

    async fn get_multi_interface_publisher_filter_class_id(
        &self,
        _req: &GetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<GetMultiInterfacePublisherFilterClassIdResponse> {
        Ok(GetMultiInterfacePublisherFilterClassIdResponse {
            multi_interface_publisher_filter_class_id: self
                .read(|s| s.multi_interface_publisher_filter_class_id.clone()),
            ..Default::default()
        })
    }

    async fn set_multi_interface_publisher_filter_class_id(
        &self,
        req: &SetMultiInterfacePublisherFilterClassIdRequest,
    ) -> Result<SetMultiInterfacePublisherFilterClassIdResponse> {
        self.write(|s| {
            s.multi_interface_publisher_filter_class_id =
                req.multi_interface_publisher_filter_class_id.clone()
        });
        Ok(SetMultiInterfacePublisherFilterClassIdResponse::default())
    }

    async fn get_allow_in_process_activation(
        &self,
        _req: &GetAllowInProcessActivationRequest,
    ) -> Result<GetAllowInProcessActivationResponse> {
        Ok(GetAllowInProcessActivationResponse {
            allow_in_process_activation: self.read(|s| s.allow_in_process_activation),
            ..Default::default()
        })
    }

    async fn set_allow_in_process_activation(
        &self,
        req: &SetAllowInProcessActivationRequest,
    ) -> Result<SetAllowInProcessActivationResponse> {
        self.write(|s| s.allow_in_process_activation = req.allow_in_process_activation);
        Ok(SetAllowInProcessActivationResponse::default())
    }

    async fn get_fire_in_parallel(
        &self,
        _req: &GetFireInParallelRequest,
    ) -> Result<GetFireInParallelResponse> {
        Ok(GetFireInParallelResponse {
            fire_in_parallel: self.read(|s| s.fire_in_parallel),
            ..Default::default()
        })
    }

    async fn set_fire_in_parallel(
        &self,
        req: &SetFireInParallelRequest,
    ) -> Result<SetFireInParallelResponse> {
        self.write(|s| s.fire_in_parallel = req.fire_in_parallel);
        Ok(SetFireInParallelResponse::default())
    }
}
