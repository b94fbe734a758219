//! IEventClass client proxy

use std::sync::Arc;

use dcom::{bind_or_primary, Conn, Ipid};
use oaut::idispatch::DispatchClient;

use super::operations::*;
use super::SYNTAX;
use crate::property::proxy_call;

/// Proxy for a remote IEventClass interface.
///
/// Composes an IDispatch proxy for the inherited methods; the accessor
/// [`dispatch`](Self::dispatch) exposes it.
pub struct EventClassClient {
    conn: Arc<dyn Conn>,
    dispatch: DispatchClient,
    ipid: Option<Ipid>,
}

impl EventClassClient {
    pub async fn new(conn: Arc<dyn Conn>) -> Self {
        let dispatch = DispatchClient::new(conn.clone()).await;
        let conn = bind_or_primary(conn, &SYNTAX).await;
        Self {
            conn,
            dispatch,
            ipid: None,
        }
    }

    /// The base IDispatch proxy
    pub fn dispatch(&self) -> &DispatchClient {
        &self.dispatch
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self.dispatch = self.dispatch.with_ipid(ipid);
        self
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    proxy_call!(get_event_class_id, GetEventClassIdRequest, GetEventClassIdResponse);
    proxy_call!(set_event_class_id, SetEventClassIdRequest, SetEventClassIdResponse);
    proxy_call!(get_event_class_name, GetEventClassNameRequest, GetEventClassNameResponse);
    proxy_call!(set_event_class_name, SetEventClassNameRequest, SetEventClassNameResponse);
    proxy_call!(get_owner_sid, GetOwnerSidRequest, GetOwnerSidResponse);
    proxy_call!(set_owner_sid, SetOwnerSidRequest, SetOwnerSidResponse);
    proxy_call!(get_firing_interface_id, GetFiringInterfaceIdRequest, GetFiringInterfaceIdResponse);
    proxy_call!(set_firing_interface_id, SetFiringInterfaceIdRequest, SetFiringInterfaceIdResponse);
    proxy_call!(get_description, GetDescriptionRequest, GetDescriptionResponse);
    proxy_call!(set_description, SetDescriptionRequest, SetDescriptionResponse);
    proxy_call!(get_type_lib, GetTypeLibRequest, GetTypeLibResponse);
    proxy_call!(set_type_lib, SetTypeLibRequest, SetTypeLibResponse);
}
