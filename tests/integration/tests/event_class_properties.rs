//! End-to-end property calls through the client proxies, over real NDR
//! bytes carried by the loopback connection.

use std::sync::Arc;

use async_trait::async_trait;
use comev::ieventclass::{
    EventClassClient, EventClassServerHandle, GetEventClassIdOperation, GetEventClassIdRequest,
    SetEventClassIdRequest, OPNUM_GET_EVENT_CLASS_ID,
};
use comev::ieventclass2::{
    EventClass2Client, EventClass2ServerHandle, GetFireInParallelRequest,
    GetPublisherIdRequest, SetFireInParallelRequest, UnimplementedEventClass2Server,
};
use dcom::{hresult, CallError, CallOptions, DcomError, Operation, OrpcThis, Result, ServerHandle, Uuid};
use integration_tests::{InMemoryEventClass, LoopbackConn};
use ndr::NdrReader;
use oaut::BStr;

async fn event_class2_client() -> EventClass2Client {
    let conn = LoopbackConn::new(Arc::new(EventClass2ServerHandle(InMemoryEventClass::default())));
    EventClass2Client::new(conn).await.with_ipid(Uuid::generate())
}

#[tokio::test]
async fn bstr_property_round_trips() {
    let conn = LoopbackConn::new(Arc::new(EventClassServerHandle(InMemoryEventClass::default())));
    let client = EventClassClient::new(conn).await.with_ipid(Uuid::generate());

    let set = SetEventClassIdRequest {
        this: OrpcThis::for_call(),
        event_class_id: Some(BStr("{1adc3b33-bc65-4fb6-b7d8-5188d8a1e06a}".to_string())),
    };
    let resp = client
        .set_event_class_id(&set, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.return_code, hresult::S_OK);

    let get = GetEventClassIdRequest {
        this: OrpcThis::for_call(),
    };
    let resp = client
        .get_event_class_id(&get, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.event_class_id, set.event_class_id);
}

#[tokio::test]
async fn unset_property_reads_back_null() {
    let client = event_class2_client().await;
    let resp = client
        .get_publisher_id(&GetPublisherIdRequest::default(), CallOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.publisher_id, None);
    assert_eq!(resp.return_code, hresult::S_OK);
}

#[tokio::test]
async fn bool_property_round_trips() {
    let client = event_class2_client().await;

    let set = SetFireInParallelRequest {
        this: OrpcThis::for_call(),
        fire_in_parallel: true,
    };
    client
        .set_fire_in_parallel(&set, CallOptions::new())
        .await
        .unwrap();

    let resp = client
        .get_fire_in_parallel(&GetFireInParallelRequest::default(), CallOptions::new())
        .await
        .unwrap();
    assert!(resp.fire_in_parallel);
}

#[tokio::test]
async fn missing_ipid_fails_before_dispatch() {
    let conn = LoopbackConn::new(Arc::new(EventClass2ServerHandle(InMemoryEventClass::default())));
    let client = EventClass2Client::new(conn).await;

    let err = client
        .get_publisher_id(&GetPublisherIdRequest::default(), CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::Other(DcomError::MissingIpid)));
}

#[tokio::test]
async fn per_call_ipid_satisfies_the_proxy() {
    let conn = LoopbackConn::new(Arc::new(EventClass2ServerHandle(InMemoryEventClass::default())));
    let client = EventClass2Client::new(conn).await;

    let opts = CallOptions::new().with_ipid(Uuid::generate());
    let resp = client
        .get_fire_in_parallel(&GetFireInParallelRequest::default(), opts)
        .await
        .unwrap();
    assert_eq!(resp.return_code, hresult::S_OK);
}

#[tokio::test]
async fn proxies_degrade_to_the_primary_connection() {
    let conn = LoopbackConn::without_sub_conns(Arc::new(EventClass2ServerHandle(
        InMemoryEventClass::default(),
    )));
    let client = EventClass2Client::new(conn).await.with_ipid(Uuid::generate());

    let resp = client
        .get_publisher_id(&GetPublisherIdRequest::default(), CallOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.return_code, hresult::S_OK);
}

/// Answers GetEventClassID with E_FAIL while still filling the
/// out-parameter, as a server may when it reports a partial result.
struct PartialResultEventClass;

#[async_trait]
impl ServerHandle for PartialResultEventClass {
    async fn dispatch(&self, op_num: u16, r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>> {
        assert_eq!(op_num, OPNUM_GET_EVENT_CLASS_ID);
        let mut op = GetEventClassIdOperation::default();
        op.unmarshal_ndr_request(r)?;
        op.event_class_id = Some(BStr("{d3b5e1a7-40f2-4c62-9a1e-52c43f8ab7e0}".to_string()));
        op.return_code = hresult::E_FAIL;
        Ok(Some(Box::new(op)))
    }
}

#[tokio::test]
async fn fault_still_exposes_populated_out_params() {
    let conn = LoopbackConn::new(Arc::new(PartialResultEventClass));
    let client = EventClassClient::new(conn).await.with_ipid(Uuid::generate());

    let err = client
        .get_event_class_id(&GetEventClassIdRequest::default(), CallOptions::new())
        .await
        .unwrap_err();
    match err {
        CallError::Fault {
            hresult: status,
            response,
            ..
        } => {
            assert_eq!(status, hresult::E_FAIL);
            assert_eq!(status, -2147467259);
            assert_eq!(
                response.event_class_id,
                Some(BStr("{d3b5e1a7-40f2-4c62-9a1e-52c43f8ab7e0}".to_string()))
            );
        }
        other => panic!("expected fault, got {other:?}"),
    }
}

#[tokio::test]
async fn unimplemented_server_faults_with_e_notimpl() {
    let conn = LoopbackConn::new(Arc::new(EventClass2ServerHandle(
        UnimplementedEventClass2Server,
    )));
    let client = EventClass2Client::new(conn).await.with_ipid(Uuid::generate());

    let err = client
        .get_publisher_id(&GetPublisherIdRequest::default(), CallOptions::new())
        .await
        .unwrap_err();
    match err {
        CallError::Fault {
            op_name,
            hresult: status,
            response,
        } => {
            assert_eq!(op_name, "/IEventClass2/v0/PublisherID");
            assert_eq!(status, hresult::E_NOTIMPL);
            assert_eq!(response.publisher_id, None);
        }
        other => panic!("expected fault, got {other:?}"),
    }
}
