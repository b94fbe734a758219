//! IDispatch server trait and dispatch

use async_trait::async_trait;
use dcom::iunknown::{self, UnknownServer};
use dcom::{fail_status, DcomError, Operation, Result, ServerHandle};
use ndr::NdrReader;
use tracing::debug;

use super::operations::*;
use super::OPNUM_BASE;

/// Handler interface for IDispatch methods
#[async_trait]
pub trait DispatchServer: UnknownServer {
    async fn get_type_info_count(
        &self,
        req: &GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse>;

    async fn get_type_info(&self, req: &GetTypeInfoRequest) -> Result<GetTypeInfoResponse>;

    async fn get_ids_of_names(&self, req: &GetIDsOfNamesRequest) -> Result<GetIDsOfNamesResponse>;

    async fn invoke(&self, req: &InvokeRequest) -> Result<InvokeResponse>;
}

/// Dispatch one IDispatch-chain opnum. Opnums below this interface's
/// range delegate to the IUnknown root.
pub async fn server_handle<S>(
    server: &S,
    op_num: u16,
    r: &mut NdrReader,
) -> Result<Option<Box<dyn Operation>>>
where
    S: DispatchServer + ?Sized,
{
    if op_num < OPNUM_BASE {
        return iunknown::server_handle(op_num, r);
    }
    match op_num {
        OPNUM_GET_TYPE_INFO_COUNT => {
            let mut op = GetTypeInfoCountOperation::default();
            op.unmarshal_ndr_request(r)?;
            debug!(op_name = op.op_name(), "dispatching");
            let req = GetTypeInfoCountRequest::from_op(&op);
            match server.get_type_info_count(&req).await {
                Ok(resp) => resp.to_op(&mut op),
                Err(e) => op.return_code = fail_status(e)?,
            }
            Ok(Some(Box::new(op)))
        }
        OPNUM_GET_TYPE_INFO => {
            let mut op = GetTypeInfoOperation::default();
            op.unmarshal_ndr_request(r)?;
            debug!(op_name = op.op_name(), "dispatching");
            let req = GetTypeInfoRequest::from_op(&op);
            match server.get_type_info(&req).await {
                Ok(resp) => resp.to_op(&mut op),
                Err(e) => op.return_code = fail_status(e)?,
            }
            Ok(Some(Box::new(op)))
        }
        OPNUM_GET_IDS_OF_NAMES => {
            let mut op = GetIDsOfNamesOperation::default();
            op.unmarshal_ndr_request(r)?;
            debug!(op_name = op.op_name(), "dispatching");
            let req = GetIDsOfNamesRequest::from_op(&op);
            match server.get_ids_of_names(&req).await {
                Ok(resp) => resp.to_op(&mut op),
                Err(e) => op.return_code = fail_status(e)?,
            }
            Ok(Some(Box::new(op)))
        }
        OPNUM_INVOKE => {
            let mut op = InvokeOperation::default();
            op.unmarshal_ndr_request(r)?;
            debug!(op_name = op.op_name(), "dispatching");
            let req = InvokeRequest::from_op(&op);
            match server.invoke(&req).await {
                Ok(resp) => resp.to_op(&mut op),
                Err(e) => op.return_code = fail_status(e)?,
            }
            Ok(Some(Box::new(op)))
        }
        other => Err(DcomError::UnknownOpnum(other)),
    }
}

/// [`ServerHandle`] adapter for transports that hold the server by value
pub struct DispatchServerHandle<S>(pub S);

#[async_trait]
impl<S: DispatchServer> ServerHandle for DispatchServerHandle<S> {
    async fn dispatch(&self, op_num: u16, r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>> {
        server_handle(&self.0, op_num, r).await
    }
}

/// Answers every IDispatch method with E_NOTIMPL
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedDispatchServer;

impl UnknownServer for UnimplementedDispatchServer {}

#[async_trait]
impl DispatchServer for UnimplementedDispatchServer {
    async fn get_type_info_count(
        &self,
        _req: &GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_type_info(&self, _req: &GetTypeInfoRequest) -> Result<GetTypeInfoResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn get_ids_of_names(
        &self,
        _req: &GetIDsOfNamesRequest,
    ) -> Result<GetIDsOfNamesResponse> {
        Err(DcomError::NotImplemented)
    }

    async fn invoke(&self, _req: &InvokeRequest) -> Result<InvokeResponse> {
        Err(DcomError::NotImplemented)
    }
}
