//! IEventClass binding ([MS-COMEV] 3.1.4.2), opnums 7-20 above IDispatch

mod client;
mod operations;
mod server;

use dcom::{Iid, SyntaxId, Uuid};

pub const IID_IEVENT_CLASS: Iid =
    Uuid::from_fields(0xfb2b_72a0, 0x7a68, 0x11d1, [0x88, 0xf9, 0x00, 0x80, 0xc7, 0xd7, 0x71, 0xbf]);

pub const SYNTAX: SyntaxId = SyntaxId::new(IID_IEVENT_CLASS, 0, 0);

/// First opnum owned by this interface
pub const OPNUM_BASE: u16 = oaut::idispatch::NUM_OPS;

/// One past the last opnum owned by this interface
pub const NUM_OPS: u16 = 21;

pub use client::EventClassClient;
pub use operations::*;
pub use server::{server_handle, EventClassServer, EventClassServerHandle, UnimplementedEventClassServer};
