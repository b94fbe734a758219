//! ORPC runtime: the call-envelope layer of DCOM
//!
//! Builds on the [`ndr`] codec to express remote COM calls: every request
//! opens with an [`OrpcThis`] and every response with an [`OrpcThat`];
//! methods are [`Operation`] envelopes addressed by opnum; calls travel
//! over a [`Conn`] and land in a [`ServerHandle`] that walks the interface
//! inheritance chain by opnum range.
//!
//! Activation, OXID resolution and transport security are out of scope;
//! [`Conn`] is the boundary.

mod conn;
mod error;
mod identifiers;
pub mod iunknown;
mod objref;
mod operation;
mod orpc;

pub use conn::{bind_or_primary, CallOptions, Conn, ServerHandle};
pub use error::{fail_status, hresult, map_hresult, CallError, CallResult, DcomError, Result};
pub use identifiers::{Clsid, Iid, Ipid, SyntaxId, Uuid};
pub use objref::{InterfacePointer, StdObjRef, OBJREF_SIGNATURE, OBJREF_STANDARD};
pub use operation::Operation;
pub use orpc::{ComVersion, OrpcExtent, OrpcExtentArray, OrpcThat, OrpcThis, COM_VERSION_5_7};
