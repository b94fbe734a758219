//! Conformant-varying wide strings
//!
//! The `[string] wchar_t*` wire form: maximum count, offset, actual count
//! (all in UTF-16 code units, including the null terminator), then the
//! UTF-16LE code units themselves.

use crate::error::{NdrError, Result};
use crate::marshal::{NdrMarshal, NdrUnmarshal};
use crate::reader::NdrReader;
use crate::writer::NdrWriter;

/// A null-terminated UTF-16 string in conformant-varying form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WString(pub String);

impl WString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for WString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for WString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl NdrMarshal for WString {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().chain(std::iter::once(0)).collect();
        let count = u32::try_from(units.len()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write_u32(count); // maximum count
        w.write_u32(0); // offset
        w.write_u32(count); // actual count
        for unit in units {
            w.write_u16(unit);
        }
        Ok(())
    }
}

impl NdrUnmarshal for WString {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let max = r.read_size(2)? as u64;
        let offset = r.read_u32()? as u64;
        let actual = r.read_size(2)?;
        if offset != 0 || actual as u64 > max {
            return Err(NdrError::ConformanceMismatch {
                declared: max,
                actual: offset + actual as u64,
            });
        }
        let mut units = Vec::with_capacity(actual);
        for _ in 0..actual {
            units.push(r.read_u16()?);
        }
        // drop the terminator if present
        if units.last() == Some(&0) {
            units.pop();
        }
        let s = String::from_utf16(&units).map_err(|_| NdrError::InvalidString)?;
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut w = NdrWriter::new();
        WString::new("EventSystem.EventClass")
            .marshal_ndr(&mut w)
            .unwrap();
        let mut r = NdrReader::new(w.into_bytes());
        let s = WString::unmarshal_ndr(&mut r).unwrap();
        assert_eq!(s.as_str(), "EventSystem.EventClass");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn empty_string_still_carries_terminator() {
        let mut w = NdrWriter::new();
        WString::default().marshal_ndr(&mut w).unwrap();
        let buf = w.into_bytes();
        // max=1, offset=0, actual=1, one null unit
        assert_eq!(buf.len(), 14);
        assert_eq!(&buf[0..4], &[1, 0, 0, 0]);
        let mut r = NdrReader::new(buf);
        assert_eq!(WString::unmarshal_ndr(&mut r).unwrap().as_str(), "");
    }

    #[test]
    fn actual_beyond_max_rejected() {
        let mut w = NdrWriter::new();
        w.write_u32(1);
        w.write_u32(0);
        w.write_u32(5);
        for _ in 0..5 {
            w.write_u16(b'a' as u16);
        }
        let mut r = NdrReader::new(w.into_bytes());
        let err = WString::unmarshal_ndr(&mut r).unwrap_err();
        assert!(matches!(err, NdrError::ConformanceMismatch { .. }));
    }
}
