//! The ORPC operation envelope

use std::fmt::Debug;

use ndr::{NdrReader, NdrWriter};

use crate::error::Result;

/// One remotable method: its identity plus both directions of its stub
/// data.
///
/// Request wire order is ORPCTHIS followed by the `{in}` parameters in
/// declaration order; response wire order is ORPCTHAT, the `{out}`
/// parameters, then the `Return` status. The `prepare_*_payload` hooks run
/// before field encoding and may fail the marshal; the default is a no-op.
pub trait Operation: Send + Debug {
    /// Position in the interface's method table
    fn op_num(&self) -> u16;

    /// Qualified name, `/Interface/vMajor.Minor/Method`
    fn op_name(&self) -> &'static str;

    fn prepare_request_payload(&mut self) -> Result<()> {
        Ok(())
    }

    fn prepare_response_payload(&mut self) -> Result<()> {
        Ok(())
    }

    fn marshal_ndr_request(&mut self, w: &mut NdrWriter) -> Result<()>;

    fn unmarshal_ndr_request(&mut self, r: &mut NdrReader) -> Result<()>;

    fn marshal_ndr_response(&mut self, w: &mut NdrWriter) -> Result<()>;

    fn unmarshal_ndr_response(&mut self, r: &mut NdrReader) -> Result<()>;
}
