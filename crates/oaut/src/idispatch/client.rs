//! IDispatch client proxy

use std::sync::Arc;

use dcom::{bind_or_primary, hresult, CallError, CallOptions, CallResult, Conn, Ipid, Operation};

use super::operations::*;
use super::SYNTAX;

/// Proxy for a remote IDispatch interface.
///
/// Binds its own sub-connection for the IDispatch syntax; when the
/// transport cannot derive one the proxy degrades to the primary
/// connection. Calls need an object identity: either set one on the proxy
/// with [`with_ipid`](Self::with_ipid) or pass it per call.
pub struct DispatchClient {
    conn: Arc<dyn Conn>,
    ipid: Option<Ipid>,
}

impl DispatchClient {
    pub async fn new(conn: Arc<dyn Conn>) -> Self {
        let conn = bind_or_primary(conn, &SYNTAX).await;
        Self { conn, ipid: None }
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    pub async fn get_type_info_count(
        &self,
        req: &GetTypeInfoCountRequest,
        opts: CallOptions,
    ) -> CallResult<GetTypeInfoCountResponse> {
        let opts = opts.resolve_ipid(self.ipid)?;
        let mut op = req.to_op();
        self.conn.invoke(&mut op, &opts).await?;
        let resp = GetTypeInfoCountResponse::from_op(&op);
        if op.return_code != hresult::S_OK {
            return Err(CallError::Fault {
                op_name: op.op_name(),
                hresult: op.return_code,
                response: resp,
            });
        }
        Ok(resp)
    }

    pub async fn get_type_info(
        &self,
        req: &GetTypeInfoRequest,
        opts: CallOptions,
    ) -> CallResult<GetTypeInfoResponse> {
        let opts = opts.resolve_ipid(self.ipid)?;
        let mut op = req.to_op();
        self.conn.invoke(&mut op, &opts).await?;
        let resp = GetTypeInfoResponse::from_op(&op);
        if op.return_code != hresult::S_OK {
            return Err(CallError::Fault {
                op_name: op.op_name(),
                hresult: op.return_code,
                response: resp,
            });
        }
        Ok(resp)
    }

    pub async fn get_ids_of_names(
        &self,
        req: &GetIDsOfNamesRequest,
        opts: CallOptions,
    ) -> CallResult<GetIDsOfNamesResponse> {
        let opts = opts.resolve_ipid(self.ipid)?;
        let mut op = req.to_op();
        self.conn.invoke(&mut op, &opts).await?;
        let resp = GetIDsOfNamesResponse::from_op(&op);
        if op.return_code != hresult::S_OK {
            return Err(CallError::Fault {
                op_name: op.op_name(),
                hresult: op.return_code,
                response: resp,
            });
        }
        Ok(resp)
    }

    pub async fn invoke(
        &self,
        req: &InvokeRequest,
        opts: CallOptions,
    ) -> CallResult<InvokeResponse> {
        let opts = opts.resolve_ipid(self.ipid)?;
        let mut op = req.to_op();
        self.conn.invoke(&mut op, &opts).await?;
        let resp = InvokeResponse::from_op(&op);
        if op.return_code != hresult::S_OK {
            return Err(CallError::Fault {
                op_name: op.op_name(),
                hresult: op.return_code,
                response: resp,
            });
        }
        Ok(resp)
    }
}
