//! IEventClass2 binding ([MS-COMEV] 3.1.4.3), opnums 21-28 above IEventClass

mod client;
mod operations;
mod server;

use dcom::{Iid, SyntaxId, Uuid};

pub const IID_IEVENT_CLASS2: Iid =
    Uuid::from_fields(0xfb2b_72a1, 0x7a68, 0x11d1, [0x88, 0xf9, 0x00, 0x80, 0xc7, 0xd7, 0x71, 0xbf]);

pub const SYNTAX: SyntaxId = SyntaxId::new(IID_IEVENT_CLASS2, 0, 0);

/// First opnum owned by this interface
pub const OPNUM_BASE: u16 = crate::ieventclass::NUM_OPS;

/// One past the last opnum owned by this interface
pub const NUM_OPS: u16 = 29;

pub use client::EventClass2Client;
pub use operations::*;
pub use server::{
    server_handle, EventClass2Server, EventClass2ServerHandle, UnimplementedEventClass2Server,
};
