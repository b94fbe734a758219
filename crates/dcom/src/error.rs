//! ORPC error types and HRESULT catalogue

use std::fmt;

use ndr::NdrError;
use thiserror::Error;

/// Well-known HRESULT values ([MS-ERREF])
pub mod hresult {
    pub const S_OK: i32 = 0;
    pub const S_FALSE: i32 = 1;
    pub const E_NOTIMPL: i32 = 0x8000_4001u32 as i32;
    pub const E_NOINTERFACE: i32 = 0x8000_4002u32 as i32;
    pub const E_POINTER: i32 = 0x8000_4003u32 as i32;
    pub const E_ABORT: i32 = 0x8000_4004u32 as i32;
    pub const E_FAIL: i32 = 0x8000_4005u32 as i32;
    pub const E_UNEXPECTED: i32 = 0x8000_FFFFu32 as i32;
    pub const E_ACCESSDENIED: i32 = 0x8007_0005u32 as i32;
    pub const E_OUTOFMEMORY: i32 = 0x8007_000Eu32 as i32;
    pub const E_INVALIDARG: i32 = 0x8007_0057u32 as i32;
    pub const DISP_E_MEMBERNOTFOUND: i32 = 0x8002_0003u32 as i32;
    pub const DISP_E_UNKNOWNNAME: i32 = 0x8002_0006u32 as i32;
    pub const DISP_E_BADINDEX: i32 = 0x8002_000Bu32 as i32;
}

/// Errors produced by the ORPC runtime
#[derive(Debug, Error)]
pub enum DcomError {
    /// Encoding or decoding failure in the stub data
    #[error(transparent)]
    Ndr(#[from] NdrError),

    /// A call completed with a failing HRESULT
    #[error("call returned HRESULT {0:#010x}")]
    Hresult(i32),

    /// No object identity available: neither the proxy nor the per-call
    /// options carry an IPID
    #[error("ipid is missing")]
    MissingIpid,

    /// Dispatch received an opnum outside the interface's range
    #[error("unknown opnum {0}")]
    UnknownOpnum(u16),

    /// The handler does not implement this method
    #[error("not implemented")]
    NotImplemented,

    /// Transport-level failure reported by the connection
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed data outside the NDR layer
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DcomError {
    /// The HRESULT a server dispatcher folds into the response `Return`
    /// field, if this error maps to one. Errors without a mapping abort
    /// the dispatch instead.
    pub fn hresult_code(&self) -> Option<i32> {
        match self {
            DcomError::Hresult(code) => Some(*code),
            DcomError::NotImplemented => Some(hresult::E_NOTIMPL),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DcomError>;

/// Map a `Return` status to a result: zero is success, anything else is
/// the corresponding [`DcomError::Hresult`].
pub fn map_hresult(code: i32) -> Result<()> {
    if code == hresult::S_OK {
        Ok(())
    } else {
        Err(DcomError::Hresult(code))
    }
}

/// Dispatcher-side counterpart of [`map_hresult`]: turn a handler error
/// into the status to fold into the response `Return`, or propagate it
/// when it carries no HRESULT (decode and transport failures abort the
/// dispatch instead of producing a response).
pub fn fail_status(e: DcomError) -> Result<i32> {
    match e.hresult_code() {
        Some(code) => Ok(code),
        None => Err(e),
    }
}

/// Error from a proxied call.
///
/// A failing `Return` status still carries the fully decoded response so
/// callers can inspect out-parameters the server populated alongside the
/// failure.
#[derive(Debug, Error)]
pub enum CallError<R: fmt::Debug> {
    #[error("{op_name} returned HRESULT {hresult:#010x}")]
    Fault {
        op_name: &'static str,
        hresult: i32,
        response: R,
    },
    #[error(transparent)]
    Other(#[from] DcomError),
}

impl<R: fmt::Debug> CallError<R> {
    /// The failing HRESULT, regardless of variant, when one exists
    pub fn hresult(&self) -> Option<i32> {
        match self {
            CallError::Fault { hresult, .. } => Some(*hresult),
            CallError::Other(e) => e.hresult_code(),
        }
    }

    /// The decoded response of a failed-but-completed call
    pub fn into_response(self) -> Option<R> {
        match self {
            CallError::Fault { response, .. } => Some(response),
            CallError::Other(_) => None,
        }
    }
}

impl<R: fmt::Debug> From<NdrError> for CallError<R> {
    fn from(e: NdrError) -> Self {
        CallError::Other(DcomError::Ndr(e))
    }
}

pub type CallResult<R> = std::result::Result<R, CallError<R>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_ok() {
        assert!(map_hresult(hresult::S_OK).is_ok());
    }

    #[test]
    fn nonzero_maps_to_hresult_error() {
        let err = map_hresult(hresult::E_FAIL).unwrap_err();
        assert_eq!(err.hresult_code(), Some(hresult::E_FAIL));
        assert_eq!(err.to_string(), "call returned HRESULT 0x80004005");
    }

    #[test]
    fn decode_errors_do_not_fold_into_a_status() {
        let err = DcomError::Ndr(NdrError::IntegerOverflow);
        assert_eq!(err.hresult_code(), None);
    }
}
