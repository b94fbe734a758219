//! COM+ event system interface bindings ([MS-COMEV])
//!
//! Client proxies and server dispatch for the IEventClass and
//! IEventClass2 interfaces, layered on the IDispatch binding from the
//! `oaut` crate. Each interface owns a contiguous opnum range and
//! delegates lower opnums to its base interface.

mod property;

pub mod ieventclass;
pub mod ieventclass2;
