//! OLE automation wire types ([MS-OAUT]) and the IDispatch binding
//!
//! [`BStr`] and [`Variant`] are the currency of automation interfaces;
//! [`DispParams`] and [`ExcepInfo`] support `IDispatch::Invoke`. The
//! [`idispatch`] module carries the full interface binding: envelopes,
//! client proxy, server trait and opnum dispatch.

mod bstr;
mod dispparams;
pub mod idispatch;
mod variant;

pub use bstr::BStr;
pub use dispparams::{DispIdArray, DispParams, ExcepInfo, VariantSlots};
pub use variant::{var_type, Variant};
