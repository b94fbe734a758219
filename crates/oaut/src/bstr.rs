//! BSTR: length-prefixed UTF-16 strings ([MS-OAUT] 2.2.23)
//!
//! On the wire a BSTR is a `FLAGGED_WORD_BLOB` behind a unique pointer:
//! the character count as array conformance, the byte count, the character
//! count again, then the UTF-16LE code units with no terminator.

use ndr::{NdrError, NdrMarshal, NdrReader, NdrUnmarshal, NdrWriter, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BStr(pub String);

impl BStr {
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

impl From<&str> for BStr {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for BStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl NdrMarshal for BStr {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        let chars = u32::try_from(units.len()).map_err(|_| NdrError::IntegerOverflow)?;
        let bytes = chars.checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
        w.write_u32(chars); // conformance
        w.write_u32(bytes); // cBytes
        w.write_u32(chars); // clSize
        for unit in units {
            w.write_u16(unit);
        }
        Ok(())
    }
}

impl NdrUnmarshal for BStr {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let conformance = r.read_size(2)?;
        let byte_count = r.read_u32()? as u64;
        let char_count = r.read_size(2)?;
        if char_count != conformance || byte_count != char_count as u64 * 2 {
            return Err(NdrError::ConformanceMismatch {
                declared: conformance as u64,
                actual: char_count as u64,
            });
        }
        let mut units = Vec::with_capacity(char_count);
        for _ in 0..char_count {
            units.push(r.read_u16()?);
        }
        let s = String::from_utf16(&units).map_err(|_| NdrError::InvalidString)?;
        Ok(Self(s))
    }
}
