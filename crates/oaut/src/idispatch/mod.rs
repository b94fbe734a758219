//! IDispatch binding ([MS-OAUT] 3.1.4), opnums 3-6 above IUnknown

mod client;
mod operations;
mod server;

use dcom::{Iid, SyntaxId, Uuid};

pub const IID_IDISPATCH: Iid =
    Uuid::from_fields(0x0002_0400, 0x0000, 0x0000, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]);

pub const SYNTAX: SyntaxId = SyntaxId::new(IID_IDISPATCH, 0, 0);

/// First opnum owned by this interface
pub const OPNUM_BASE: u16 = dcom::iunknown::NUM_OPS;

/// One past the last opnum owned by this interface
pub const NUM_OPS: u16 = 7;

pub use client::DispatchClient;
pub use operations::{
    GetIDsOfNamesOperation, GetIDsOfNamesRequest, GetIDsOfNamesResponse, GetTypeInfoCountOperation,
    GetTypeInfoCountRequest, GetTypeInfoCountResponse, GetTypeInfoOperation, GetTypeInfoRequest,
    GetTypeInfoResponse, InvokeOperation, InvokeRequest, InvokeResponse, OPNUM_GET_IDS_OF_NAMES,
    OPNUM_GET_TYPE_INFO, OPNUM_GET_TYPE_INFO_COUNT, OPNUM_INVOKE,
};
pub use server::{server_handle, DispatchServer, DispatchServerHandle, UnimplementedDispatchServer};
