//! ORPC call headers ([MS-DCOM] 2.2.13)
//!
//! Every ORPC request starts with an `ORPCTHIS` and every response with an
//! `ORPCTHAT`. Both may carry an optional extension array behind a unique
//! pointer, so both decode in two phases: [`NdrPointee::read_repr`] for the
//! inline part, then claiming the extension handle after the reader's
//! deferral queue drains.

use ndr::{Deferred, NdrError, NdrMarshal, NdrPointee, NdrReader, NdrUnmarshal, NdrWriter, Result};

use crate::identifiers::Uuid;

/// COM protocol version pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComVersion {
    pub major: u16,
    pub minor: u16,
}

/// DCOM 5.7, the version this runtime speaks
pub const COM_VERSION_5_7: ComVersion = ComVersion { major: 5, minor: 7 };

impl Default for ComVersion {
    fn default() -> Self {
        COM_VERSION_5_7
    }
}

impl NdrMarshal for ComVersion {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u16(self.major);
        w.write_u16(self.minor);
        Ok(())
    }
}

impl NdrUnmarshal for ComVersion {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        Ok(Self {
            major: r.read_u16()?,
            minor: r.read_u16()?,
        })
    }
}

/// A single ORPC extension: an identifying UUID plus opaque payload.
/// Payload bytes are padded to a multiple of 8 on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtent {
    pub id: Uuid,
    pub data: Vec<u8>,
}

fn round8(n: usize) -> usize {
    (n + 7) & !7
}

impl NdrMarshal for OrpcExtent {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        let rounded = round8(self.data.len());
        let size = u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?;
        // conformant struct: the array conformance is hoisted to the front
        w.write_u32(rounded as u32);
        self.id.marshal_ndr(w)?;
        w.write_u32(size);
        w.write_bytes(&self.data);
        for _ in self.data.len()..rounded {
            w.write_u8(0);
        }
        Ok(())
    }
}

impl NdrUnmarshal for OrpcExtent {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let conformance = r.read_size(1)?;
        let id = Uuid::unmarshal_ndr(r)?;
        let size = r.read_u32()? as usize;
        if round8(size) != conformance {
            return Err(NdrError::ConformanceMismatch {
                declared: conformance as u64,
                actual: size as u64,
            });
        }
        let mut data = r.read_bytes(conformance)?;
        data.truncate(size);
        Ok(Self { id, data })
    }
}

/// Extension array carried by [`OrpcThis`] and [`OrpcThat`].
///
/// Wire form: declared size, reserved dword, then a unique pointer to a
/// conformant array of unique extent pointers. The element count on the
/// wire is rounded up to even with a trailing null entry; decode drops
/// absent entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtentArray {
    pub extents: Vec<OrpcExtent>,
}

/// Decode intermediary for the inner extent-pointer array
pub struct ExtentSlots(Vec<OrpcExtent>);

impl NdrPointee for ExtentSlots {
    type Repr = Vec<Deferred<OrpcExtent>>;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let count = r.read_size(4)?;
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            handles.push(r.read_pointer::<OrpcExtent>()?);
        }
        Ok(handles)
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        let mut extents = Vec::with_capacity(repr.len());
        for handle in repr {
            if let Some(extent) = handle.take(r)? {
                extents.push(extent);
            }
        }
        Ok(Self(extents))
    }
}

impl OrpcExtentArray {
    fn marshal_body(&self, w: &mut NdrWriter) -> Result<()> {
        let count = self.extents.len();
        let padded = count + (count % 2);
        w.write_u32(padded as u32);
        w.write_u32(0); // reserved
        let extents = self.extents.clone();
        w.write_pointer_with(move |w| {
            w.write_u32(padded as u32);
            for extent in &extents {
                w.write_pointer(Some(extent))?;
            }
            if padded > count {
                w.write_u32(0);
            }
            Ok(())
        })
    }
}

impl NdrMarshal for OrpcExtentArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        self.marshal_body(w)
    }
}

impl NdrPointee for OrpcExtentArray {
    type Repr = Option<Deferred<ExtentSlots>>;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let _size = r.read_u32()?;
        let _reserved = r.read_u32()?;
        let handle = r.read_pointer::<ExtentSlots>()?;
        Ok(handle.is_present().then_some(handle))
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        let extents = match repr {
            Some(handle) => handle.take(r)?.map(|s| s.0).unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(Self { extents })
    }
}

/// First parameter of every ORPC request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrpcThis {
    pub version: ComVersion,
    pub flags: u32,
    pub reserved1: u32,
    /// Causality ID linking chained calls
    pub cid: Uuid,
    pub extensions: Option<OrpcExtentArray>,
}

impl Default for OrpcThis {
    fn default() -> Self {
        Self {
            version: ComVersion::default(),
            flags: 0,
            reserved1: 0,
            cid: Uuid::NIL,
            extensions: None,
        }
    }
}

impl OrpcThis {
    /// Header for a new top-level call: current version, fresh causality ID
    pub fn for_call() -> Self {
        Self {
            cid: Uuid::generate(),
            ..Self::default()
        }
    }
}

impl NdrMarshal for OrpcThis {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        self.version.marshal_ndr(w)?;
        w.write_u32(self.flags);
        w.write_u32(self.reserved1);
        self.cid.marshal_ndr(w)?;
        w.write_pointer(self.extensions.as_ref())
    }
}

impl NdrPointee for OrpcThis {
    type Repr = (ComVersion, u32, u32, Uuid, Deferred<OrpcExtentArray>);

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let version = ComVersion::unmarshal_ndr(r)?;
        let flags = r.read_u32()?;
        let reserved1 = r.read_u32()?;
        let cid = Uuid::unmarshal_ndr(r)?;
        let extensions = r.read_pointer::<OrpcExtentArray>()?;
        Ok((version, flags, reserved1, cid, extensions))
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        let (version, flags, reserved1, cid, extensions) = repr;
        Ok(Self {
            version,
            flags,
            reserved1,
            cid,
            extensions: extensions.take(r)?,
        })
    }
}

/// First parameter of every ORPC response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcThat {
    pub flags: u32,
    pub extensions: Option<OrpcExtentArray>,
}

impl NdrMarshal for OrpcThat {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u32(self.flags);
        w.write_pointer(self.extensions.as_ref())
    }
}

impl NdrPointee for OrpcThat {
    type Repr = (u32, Deferred<OrpcExtentArray>);

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let flags = r.read_u32()?;
        let extensions = r.read_pointer::<OrpcExtentArray>()?;
        Ok((flags, extensions))
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        let (flags, extensions) = repr;
        Ok(Self {
            flags,
            extensions: extensions.take(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_this(this: &OrpcThis) -> OrpcThis {
        let mut w = NdrWriter::new();
        this.marshal_ndr(&mut w).unwrap();
        w.write_deferred().unwrap();
        let mut r = NdrReader::new(w.into_bytes());
        let repr = OrpcThis::read_repr(&mut r).unwrap();
        r.read_deferred().unwrap();
        let decoded = OrpcThis::take_repr(repr, &mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        decoded
    }

    #[test]
    fn this_round_trip_without_extensions() {
        let this = OrpcThis::for_call();
        let decoded = round_trip_this(&this);
        assert_eq!(decoded, this);
        assert_eq!(decoded.version, COM_VERSION_5_7);
    }

    #[test]
    fn this_round_trip_with_extensions() {
        let this = OrpcThis {
            extensions: Some(OrpcExtentArray {
                extents: vec![OrpcExtent {
                    id: Uuid::parse("f1f19680-4d2a-11ce-a66a-0020af6e72f4").unwrap(),
                    data: vec![1, 2, 3],
                }],
            }),
            ..OrpcThis::for_call()
        };
        let decoded = round_trip_this(&this);
        assert_eq!(decoded, this);
    }

    #[test]
    fn extent_payload_pads_to_eight() {
        let extent = OrpcExtent {
            id: Uuid::NIL,
            data: vec![0xAB; 3],
        };
        let mut w = NdrWriter::new();
        extent.marshal_ndr(&mut w).unwrap();
        let buf = w.into_bytes();
        // conformance + uuid + size + 8 padded payload bytes
        assert_eq!(buf.len(), 4 + 16 + 4 + 8);
        let mut r = NdrReader::new(buf);
        assert_eq!(OrpcExtent::unmarshal_ndr(&mut r).unwrap(), extent);
    }

    #[test]
    fn that_default_is_flags_and_null_pointer() {
        let mut w = NdrWriter::new();
        OrpcThat::default().marshal_ndr(&mut w).unwrap();
        w.write_deferred().unwrap();
        assert_eq!(&w.into_bytes()[..], &[0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
