//! IUnknown, the root of every interface chain
//!
//! QueryInterface, AddRef and Release occupy opnums 0-2 in every method
//! table but are never remoted; DCOM replaces them with IRemUnknown
//! traffic. The dispatch entry here exists so derived interfaces have a
//! base to delegate below-range opnums to.

use ndr::NdrReader;
use tracing::debug;

use crate::error::{DcomError, Result};
use crate::identifiers::{Iid, SyntaxId, Uuid};
use crate::operation::Operation;

pub const IID_IUNKNOWN: Iid =
    Uuid::from_fields(0x0000_0000, 0x0000, 0x0000, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]);

pub const SYNTAX: SyntaxId = SyntaxId::new(IID_IUNKNOWN, 0, 0);

/// Opnums 0-2: QueryInterface, AddRef, Release
pub const NUM_OPS: u16 = 3;

/// Root marker for server implementations
pub trait UnknownServer: Send + Sync {}

/// Dispatch for the reserved root range. Always `Ok(None)`: nothing to
/// decode, nothing to invoke.
pub fn server_handle(op_num: u16, _r: &mut NdrReader) -> Result<Option<Box<dyn Operation>>> {
    if op_num < NUM_OPS {
        debug!(op_num, "reserved IUnknown opnum, not used on wire");
        return Ok(None);
    }
    Err(DcomError::UnknownOpnum(op_num))
}
