//! Identifier types: UUIDs and interface syntax identifiers

use std::fmt;

use ndr::{NdrMarshal, NdrReader, NdrUnmarshal, NdrWriter, Result};

/// A UUID in its RPC wire layout ([C706] appendix A)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq_hi_and_reserved: u8,
    pub clock_seq_low: u8,
    pub node: [u8; 6],
}

/// Interface identifier
pub type Iid = Uuid;
/// Interface pointer identifier (a specific interface on a specific object)
pub type Ipid = Uuid;
/// Class identifier
pub type Clsid = Uuid;

impl Uuid {
    pub const NIL: Uuid = Uuid::from_fields(0, 0, 0, [0; 8]);

    /// Build from the textual grouping `aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee`
    /// where `d4` covers the last two groups.
    pub const fn from_fields(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Self {
        Self {
            time_low: d1,
            time_mid: d2,
            time_hi_and_version: d3,
            clock_seq_hi_and_reserved: d4[0],
            clock_seq_low: d4[1],
            node: [d4[2], d4[3], d4[4], d4[5], d4[6], d4[7]],
        }
    }

    /// Parse the canonical hyphenated form
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix('{').unwrap_or(s);
        let s = s.strip_suffix('}').unwrap_or(s);
        let mut parts = s.split('-');
        let d1 = u32::from_str_radix(parts.next()?, 16).ok()?;
        let d2 = u16::from_str_radix(parts.next()?, 16).ok()?;
        let d3 = u16::from_str_radix(parts.next()?, 16).ok()?;
        let g4 = parts.next()?;
        let g5 = parts.next()?;
        if parts.next().is_some() || g4.len() != 4 || g5.len() != 12 {
            return None;
        }
        let g4 = u16::from_str_radix(g4, 16).ok()?;
        let mut node = [0u8; 6];
        for (i, chunk) in node.iter_mut().enumerate() {
            *chunk = u8::from_str_radix(&g5[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self {
            time_low: d1,
            time_mid: d2,
            time_hi_and_version: d3,
            clock_seq_hi_and_reserved: (g4 >> 8) as u8,
            clock_seq_low: g4 as u8,
            node,
        })
    }

    /// Generate a random (version 4) UUID, used for causality IDs
    pub fn generate() -> Self {
        let v4 = uuid::Uuid::new_v4();
        let (d1, d2, d3, d4) = v4.as_fields();
        Self::from_fields(d1, d2, d3, *d4)
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.time_low,
            self.time_mid,
            self.time_hi_and_version,
            self.clock_seq_hi_and_reserved,
            self.clock_seq_low,
            self.node[0],
            self.node[1],
            self.node[2],
            self.node[3],
            self.node[4],
            self.node[5],
        )
    }
}

impl NdrMarshal for Uuid {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u32(self.time_low);
        w.write_u16(self.time_mid);
        w.write_u16(self.time_hi_and_version);
        w.write_u8(self.clock_seq_hi_and_reserved);
        w.write_u8(self.clock_seq_low);
        w.write_bytes(&self.node);
        Ok(())
    }
}

impl NdrUnmarshal for Uuid {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let time_low = r.read_u32()?;
        let time_mid = r.read_u16()?;
        let time_hi_and_version = r.read_u16()?;
        let clock_seq_hi_and_reserved = r.read_u8()?;
        let clock_seq_low = r.read_u8()?;
        let mut node = [0u8; 6];
        node.copy_from_slice(&r.read_bytes(6)?);
        Ok(Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved,
            clock_seq_low,
            node,
        })
    }
}

/// An interface UUID paired with its version: the abstract syntax a
/// connection is bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SyntaxId {
    pub uuid: Uuid,
    pub version_major: u16,
    pub version_minor: u16,
}

impl SyntaxId {
    pub const fn new(uuid: Uuid, version_major: u16, version_minor: u16) -> Self {
        Self {
            uuid,
            version_major,
            version_minor,
        }
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v{}.{}", self.uuid, self.version_major, self.version_minor)
    }
}

impl NdrMarshal for SyntaxId {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        self.uuid.marshal_ndr(w)?;
        w.write_u16(self.version_major);
        w.write_u16(self.version_minor);
        Ok(())
    }
}

impl NdrUnmarshal for SyntaxId {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        Ok(Self {
            uuid: Uuid::unmarshal_ndr(r)?,
            version_major: r.read_u16()?,
            version_minor: r.read_u16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let s = "fb2b72a0-7a68-11d1-88f9-0080c7d771bf";
        let uuid = Uuid::parse(s).unwrap();
        assert_eq!(uuid.to_string(), s);
        assert_eq!(uuid.time_low, 0xfb2b72a0);
        assert_eq!(uuid.node, [0x00, 0x80, 0xc7, 0xd7, 0x71, 0xbf]);
    }

    #[test]
    fn parse_accepts_braced_form() {
        let uuid = Uuid::parse("{00000000-0000-0000-c000-000000000046}").unwrap();
        assert_eq!(uuid.clock_seq_hi_and_reserved, 0xc0);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Uuid::parse("not-a-uuid").is_none());
        assert!(Uuid::parse("fb2b72a0-7a68-11d1-88f9").is_none());
    }

    #[test]
    fn wire_form_is_sixteen_bytes() {
        let uuid = Uuid::parse("fb2b72a0-7a68-11d1-88f9-0080c7d771bf").unwrap();
        let mut w = NdrWriter::new();
        uuid.marshal_ndr(&mut w).unwrap();
        let buf = w.into_bytes();
        assert_eq!(buf.len(), 16);
        assert_eq!(&buf[0..4], &[0xa0, 0x72, 0x2b, 0xfb]);
        let mut r = NdrReader::new(buf);
        assert_eq!(Uuid::unmarshal_ndr(&mut r).unwrap(), uuid);
    }

    #[test]
    fn generated_uuids_differ() {
        assert_ne!(Uuid::generate(), Uuid::generate());
    }
}
