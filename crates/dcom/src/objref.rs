//! Marshaled interface references ([MS-DCOM] 2.2.18)
//!
//! An interface pointer travels as an opaque byte blob (`MInterfacePointer`)
//! whose contents are an OBJREF. Only the standard form is parsed here,
//! far enough to recover the IID and IPID so a received reference can be
//! re-invoked.

use bytes::Bytes;
use ndr::{NdrError, NdrMarshal, NdrReader, NdrUnmarshal, NdrWriter, Result};

use crate::identifiers::{Iid, Ipid, Uuid};

/// `MEOW`, the OBJREF signature
pub const OBJREF_SIGNATURE: u32 = 0x574F_454D;

/// OBJREF_STANDARD flag
pub const OBJREF_STANDARD: u32 = 0x0000_0001;

/// The standard object reference body (STDOBJREF)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdObjRef {
    pub flags: u32,
    pub public_refs: u32,
    pub oxid: u64,
    pub oid: u64,
    pub ipid: Ipid,
}

impl NdrMarshal for StdObjRef {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u32(self.flags);
        w.write_u32(self.public_refs);
        w.write_u64(self.oxid);
        w.write_u64(self.oid);
        self.ipid.marshal_ndr(w)
    }
}

impl NdrUnmarshal for StdObjRef {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        Ok(Self {
            flags: r.read_u32()?,
            public_refs: r.read_u32()?,
            oxid: r.read_u64()?,
            oid: r.read_u64()?,
            ipid: Uuid::unmarshal_ndr(r)?,
        })
    }
}

/// An interface reference as it appears in stub data: a length-prefixed
/// conformant byte array holding an OBJREF.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfacePointer {
    pub data: Vec<u8>,
}

impl InterfacePointer {
    pub fn from_objref_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Build a standard-form reference to `iid`/`std` with an empty
    /// resolver address array.
    pub fn from_std(iid: Iid, std: StdObjRef) -> Self {
        let mut w = NdrWriter::new();
        w.write_u32(OBJREF_SIGNATURE);
        w.write_u32(OBJREF_STANDARD);
        // infallible writes into a fresh buffer
        let _ = iid.marshal_ndr(&mut w);
        let _ = std.marshal_ndr(&mut w);
        // DUALSTRINGARRAY: wNumEntries = 0, wSecurityOffset = 0
        w.write_u16(0);
        w.write_u16(0);
        Self {
            data: w.into_bytes().to_vec(),
        }
    }

    fn parse(&self) -> Option<(Iid, StdObjRef)> {
        let mut r = NdrReader::new(Bytes::from(self.data.clone()));
        if r.read_u32().ok()? != OBJREF_SIGNATURE {
            return None;
        }
        if r.read_u32().ok()? != OBJREF_STANDARD {
            return None;
        }
        let iid = Uuid::unmarshal_ndr(&mut r).ok()?;
        let std = StdObjRef::unmarshal_ndr(&mut r).ok()?;
        Some((iid, std))
    }

    /// The interface identifier, for standard-form references
    pub fn iid(&self) -> Option<Iid> {
        self.parse().map(|(iid, _)| iid)
    }

    /// The interface pointer identifier, for standard-form references
    pub fn ipid(&self) -> Option<Ipid> {
        self.parse().map(|(_, std)| std.ipid)
    }
}

impl NdrMarshal for InterfacePointer {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        let len = u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write_u32(len); // conformance
        w.write_u32(len); // cntData
        w.write_bytes(&self.data);
        Ok(())
    }
}

impl NdrUnmarshal for InterfacePointer {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let conformance = r.read_size(1)?;
        let count = r.read_u32()? as usize;
        if count != conformance {
            return Err(NdrError::ConformanceMismatch {
                declared: conformance as u64,
                actual: count as u64,
            });
        }
        Ok(Self {
            data: r.read_bytes(count)?,
        })
    }
}
