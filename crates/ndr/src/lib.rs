//! NDR (Network Data Representation) encoding and decoding
//!
//! The transfer syntax used by DCE RPC stub data: little-endian scalars
//! with natural alignment, conformant/varying arrays and strings, and
//! pointers split into an inline referent ID plus a deferred body region.
//!
//! Encoding goes through [`NdrWriter`], decoding through [`NdrReader`].
//! Pointer-heavy structures follow a two-phase decode: read the inline
//! representation (collecting [`Deferred`] handles), drain the deferral
//! queue with [`NdrReader::read_deferred`], then claim the handles.

mod error;
mod marshal;
mod reader;
mod strings;
mod writer;

pub use error::{NdrError, Result, MAX_NDR_ALLOCATION_SIZE};
pub use marshal::{NdrMarshal, NdrUnmarshal};
pub use reader::{Deferred, NdrPointee, NdrReader};
pub use strings::WString;
pub use writer::NdrWriter;
