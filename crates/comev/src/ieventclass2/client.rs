//! IEventClass2 client proxy

use std::sync::Arc;

use dcom::{bind_or_primary, Conn, Ipid};

use super::operations::*;
use super::SYNTAX;
use crate::ieventclass::EventClassClient;
use crate::property::proxy_call;

/// Proxy for a remote IEventClass2 interface.
///
/// Composes an IEventClass proxy for the inherited methods; the accessor
/// [`event_class`](Self::event_class) exposes it.
pub struct EventClass2Client {
    conn: Arc<dyn Conn>,
    event_class: EventClassClient,
    ipid: Option<Ipid>,
}

impl EventClass2Client {
    pub async fn new(conn: Arc<dyn Conn>) -> Self {
        let event_class = EventClassClient::new(conn.clone()).await;
        let conn = bind_or_primary(conn, &SYNTAX).await;
        Self {
            conn,
            event_class,
            ipid: None,
        }
    }

    /// The base IEventClass proxy
    pub fn event_class(&self) -> &EventClassClient {
        &self.event_class
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self.event_class = self.event_class.with_ipid(ipid);
        self
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    proxy_call!(get_publisher_id, GetPublisherIdRequest, GetPublisherIdResponse);
    proxy_call!(set_publisher_id, SetPublisherIdRequest, SetPublisherIdResponse);
    proxy_call!(
        get_multi_interface_publisher_filter_class_id,
        GetMultiInterfacePublisherFilterClassIdRequest,
        GetMultiInterfacePublisherFilterClassIdResponse
    );
    proxy_call!(
        set_multi_interface_publisher_filter_class_id,
        SetMultiInterfacePublisherFilterClassIdRequest,
        SetMultiInterfacePublisherFilterClassIdResponse
    );
    proxy_call!(
        get_allow_in_process_activation,
        GetAllowInProcessActivationRequest,
        GetAllowInProcessActivationResponse
    );
    proxy_call!(
        set_allow_in_process_activation,
        SetAllowInProcessActivationRequest,
        SetAllowInProcessActivationResponse
    );
    proxy_call!(get_fire_in_parallel, GetFireInParallelRequest, GetFireInParallelResponse);
    proxy_call!(set_fire_in_parallel, SetFireInParallelRequest, SetFireInParallelResponse);
}
