//! Connection and dispatch seams
//!
//! [`Conn`] is the boundary to the transport: it carries a marshaled
//! request to an object exporter and brings the response back into the
//! same [`Operation`]. Everything below it (binding, framing, security) is
//! out of scope here; tests supply an in-memory loopback.

use std::sync::Arc;

use async_trait::async_trait;
use ndr::NdrReader;
use tracing::warn;

use crate::error::Result;
use crate::identifiers::{Ipid, SyntaxId};
use crate::operation::Operation;

/// Per-call options
#[derive(Clone, Copy, Debug, Default)]
pub struct CallOptions {
    ipid: Option<Ipid>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the call to a specific interface pointer
    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    /// Fill in the proxy's identity when the caller supplied none.
    /// Fails with [`DcomError::MissingIpid`](crate::DcomError::MissingIpid)
    /// when neither side has one.
    pub fn resolve_ipid(mut self, proxy_ipid: Option<Ipid>) -> Result<Self> {
        if self.ipid.is_none() {
            self.ipid = Some(proxy_ipid.ok_or(crate::DcomError::MissingIpid)?);
        }
        Ok(self)
    }
}

/// A connection capable of carrying ORPC calls
#[async_trait]
pub trait Conn: Send + Sync {
    /// Execute one operation: marshal its request, deliver it, and
    /// unmarshal the response back into `op`.
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()>;

    /// Derive a connection bound to another abstract syntax
    async fn sub_conn(&self, syntax: &SyntaxId) -> Result<Arc<dyn Conn>>;
}

/// Bind `syntax` on a derived connection, falling back to the primary
/// connection when the transport cannot provide one. The degradation is
/// logged, not surfaced; the primary connection can still carry the calls.
pub async fn bind_or_primary(conn: Arc<dyn Conn>, syntax: &SyntaxId) -> Arc<dyn Conn> {
    match conn.sub_conn(syntax).await {
        Ok(sub) => sub,
        Err(e) => {
            warn!(%syntax, error = %e, "sub-connection unavailable, using primary connection");
            conn
        }
    }
}

/// Server-side dispatch entry point for one interface chain.
///
/// Decodes the request for `op_num`, runs the handler, and returns the
/// response-filled envelope. Reserved opnums that never appear on the wire
/// yield `Ok(None)` without touching the reader.
#[async_trait]
pub trait ServerHandle: Send + Sync {
    async fn dispatch(&self, op_num: u16, r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>>;
}
