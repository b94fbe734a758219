//! Opnum routing through the interface chain: IEventClass2 delegates to
//! IEventClass, which delegates to IDispatch, which reserves the
//! IUnknown range.

use std::sync::Arc;

use bytes::Bytes;
use comev::ieventclass::OPNUM_RESERVED_17;
use comev::ieventclass2::{
    self, EventClass2Client, EventClass2ServerHandle, SetFireInParallelOperation,
    SetFireInParallelRequest,
};
use dcom::{hresult, CallOptions, DcomError, Operation, OrpcThis, ServerHandle, Uuid};
use integration_tests::{InMemoryEventClass, LoopbackConn};
use ndr::{NdrReader, NdrWriter};
use oaut::idispatch::GetTypeInfoCountRequest;

#[tokio::test]
async fn base_interface_calls_route_through_the_chain() {
    let conn = LoopbackConn::new(Arc::new(EventClass2ServerHandle(InMemoryEventClass::default())));
    let client = EventClass2Client::new(conn).await.with_ipid(Uuid::generate());

    // An IDispatch opnum served by the handle rooted at IEventClass2
    let resp = client
        .event_class()
        .dispatch()
        .get_type_info_count(&GetTypeInfoCountRequest::default(), CallOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.type_info_count, 0);
    assert_eq!(resp.return_code, hresult::S_OK);
}

#[tokio::test]
async fn reserved_opnums_yield_no_response() {
    let handle = EventClass2ServerHandle(InMemoryEventClass::default());
    for op_num in [0, 1, 2, OPNUM_RESERVED_17, comev::ieventclass::OPNUM_RESERVED_18] {
        let mut r = NdrReader::new(Bytes::new());
        let resp = handle.dispatch(op_num, &mut r).await.unwrap();
        assert!(resp.is_none(), "opnum {op_num} should not produce a response");
    }
}

#[tokio::test]
async fn unknown_opnum_is_rejected() {
    let handle = EventClass2ServerHandle(InMemoryEventClass::default());
    let mut r = NdrReader::new(Bytes::new());
    let err = handle.dispatch(ieventclass2::NUM_OPS, &mut r).await.unwrap_err();
    assert!(matches!(err, DcomError::UnknownOpnum(n) if n == ieventclass2::NUM_OPS));
}

#[tokio::test]
async fn any_nonzero_wire_bool_reaches_the_handler_as_true() {
    let server = InMemoryEventClass::default();

    let mut op = SetFireInParallelOperation {
        this: OrpcThis::for_call(),
        fire_in_parallel: true,
        ..Default::default()
    };
    let mut w = NdrWriter::new();
    op.marshal_ndr_request(&mut w).unwrap();
    let mut raw = w.into_bytes().to_vec();
    let flag = raw.len() - 4;
    raw[flag] = 42;

    let mut r = NdrReader::new(Bytes::from(raw));
    let mut resp_op = ieventclass2::server_handle(
        &server,
        ieventclass2::OPNUM_SET_FIRE_IN_PARALLEL,
        &mut r,
    )
    .await
    .unwrap()
    .expect("set call produces a response");

    assert!(server.state.lock().unwrap().fire_in_parallel);

    let mut w = NdrWriter::new();
    resp_op.marshal_ndr_response(&mut w).unwrap();
    let mut r = NdrReader::new(w.into_bytes());
    let mut client_op = SetFireInParallelOperation::default();
    client_op.unmarshal_ndr_response(&mut r).unwrap();
    assert_eq!(client_op.return_code, hresult::S_OK);
}

#[tokio::test]
async fn set_then_get_through_separate_proxies_shares_server_state() {
    let handle = Arc::new(EventClass2ServerHandle(InMemoryEventClass::default()));
    let ipid = Uuid::generate();

    let writer = EventClass2Client::new(LoopbackConn::new(handle.clone()))
        .await
        .with_ipid(ipid);
    writer
        .set_fire_in_parallel(
            &SetFireInParallelRequest {
                this: OrpcThis::for_call(),
                fire_in_parallel: true,
            },
            CallOptions::new(),
        )
        .await
        .unwrap();

    let reader = EventClass2Client::new(LoopbackConn::new(handle))
        .await
        .with_ipid(ipid);
    let resp = reader
        .get_fire_in_parallel(&Default::default(), CallOptions::new())
        .await
        .unwrap();
    assert!(resp.fire_in_parallel);
}
