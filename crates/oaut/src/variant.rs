//! VARIANT: the automation tagged union ([MS-OAUT] 2.2.29)
//!
//! The wire form (`wireVARIANT`) always sits behind a unique pointer:
//! a quadword size, a reserved dword, the type tag and three reserved
//! words, then the union with the tag repeated as its discriminant.
//! String and interface arms nest further unique pointers, so decoding is
//! two-phase via [`NdrPointee`].

use dcom::InterfacePointer;
use ndr::{
    Deferred, NdrError, NdrMarshal, NdrPointee, NdrReader, NdrWriter, Result,
};

use crate::bstr::BStr;

/// VARENUM type tags carried in `vt`
pub mod var_type {
    pub const VT_EMPTY: u16 = 0x0000;
    pub const VT_NULL: u16 = 0x0001;
    pub const VT_I2: u16 = 0x0002;
    pub const VT_I4: u16 = 0x0003;
    pub const VT_R4: u16 = 0x0004;
    pub const VT_R8: u16 = 0x0005;
    pub const VT_BSTR: u16 = 0x0008;
    pub const VT_DISPATCH: u16 = 0x0009;
    pub const VT_ERROR: u16 = 0x000A;
    pub const VT_BOOL: u16 = 0x000B;
    pub const VT_UNKNOWN: u16 = 0x000D;
    pub const VT_UI1: u16 = 0x0011;
}

use var_type::*;

/// An automation value.
///
/// Covers the scalar, string and interface tags; a tag outside this set
/// fails the decode with an invalid-discriminant error rather than
/// defaulting.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I2(i16),
    I4(i32),
    R4(f32),
    R8(f64),
    /// VARIANT_BOOL: 0xFFFF for true, 0x0000 for false
    Bool(bool),
    Error(i32),
    UI1(u8),
    BStr(Option<BStr>),
    Unknown(Option<InterfacePointer>),
    Dispatch(Option<InterfacePointer>),
}

impl Variant {
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => VT_EMPTY,
            Variant::Null => VT_NULL,
            Variant::I2(_) => VT_I2,
            Variant::I4(_) => VT_I4,
            Variant::R4(_) => VT_R4,
            Variant::R8(_) => VT_R8,
            Variant::Bool(_) => VT_BOOL,
            Variant::Error(_) => VT_ERROR,
            Variant::UI1(_) => VT_UI1,
            Variant::BStr(_) => VT_BSTR,
            Variant::Unknown(_) => VT_UNKNOWN,
            Variant::Dispatch(_) => VT_DISPATCH,
        }
    }

    /// `clSize`: the referent size in quadwords, inline part only
    fn body_quads(&self) -> u32 {
        let arm = match self {
            Variant::Empty | Variant::Null => 0,
            Variant::UI1(_) => 1,
            Variant::I2(_) | Variant::Bool(_) => 2,
            Variant::I4(_)
            | Variant::R4(_)
            | Variant::Error(_)
            | Variant::BStr(_)
            | Variant::Unknown(_)
            | Variant::Dispatch(_) => 4,
            Variant::R8(_) => 8,
        };
        // vt through discriminant is 20 bytes past the size dword
        ((20 + arm) as u32 + 7) / 8
    }
}

impl NdrMarshal for Variant {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u32(self.body_quads());
        w.write_u32(0); // rpcReserved
        w.write_u16(self.vt());
        w.write_u16(0);
        w.write_u16(0);
        w.write_u16(0);
        w.write_u32(u32::from(self.vt())); // union discriminant
        match self {
            Variant::Empty | Variant::Null => Ok(()),
            Variant::I2(v) => {
                w.write_i16(*v);
                Ok(())
            }
            Variant::I4(v) | Variant::Error(v) => {
                w.write_i32(*v);
                Ok(())
            }
            Variant::R4(v) => {
                w.write_f32(*v);
                Ok(())
            }
            Variant::R8(v) => {
                w.write_f64(*v);
                Ok(())
            }
            Variant::Bool(v) => {
                w.write_i16(if *v { -1 } else { 0 });
                Ok(())
            }
            Variant::UI1(v) => {
                w.write_u8(*v);
                Ok(())
            }
            Variant::BStr(v) => w.write_pointer(v.as_ref()),
            Variant::Unknown(v) | Variant::Dispatch(v) => w.write_pointer(v.as_ref()),
        }
    }
}

enum ArmRepr {
    Empty,
    Null,
    I2(i16),
    I4(i32),
    R4(f32),
    R8(f64),
    Bool(bool),
    Error(i32),
    UI1(u8),
    BStr(Deferred<BStr>),
    Unknown(Deferred<InterfacePointer>),
    Dispatch(Deferred<InterfacePointer>),
}

/// Decode intermediary: inline VARIANT fields plus handles for the
/// pointer-valued arms
pub struct VariantRepr {
    arm: ArmRepr,
}

impl NdrPointee for Variant {
    type Repr = VariantRepr;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let _size = r.read_u32()?;
        let _reserved = r.read_u32()?;
        let vt = r.read_u16()?;
        let _w1 = r.read_u16()?;
        let _w2 = r.read_u16()?;
        let _w3 = r.read_u16()?;
        let disc = r.read_u32()?;
        if disc != u32::from(vt) {
            return Err(NdrError::InvalidDiscriminant {
                type_name: "VARIANT",
                value: u64::from(disc),
            });
        }
        let arm = match vt {
            VT_EMPTY => ArmRepr::Empty,
            VT_NULL => ArmRepr::Null,
            VT_I2 => ArmRepr::I2(r.read_i16()?),
            VT_I4 => ArmRepr::I4(r.read_i32()?),
            VT_R4 => ArmRepr::R4(r.read_f32()?),
            VT_R8 => ArmRepr::R8(r.read_f64()?),
            VT_BOOL => ArmRepr::Bool(r.read_i16()? != 0),
            VT_ERROR => ArmRepr::Error(r.read_i32()?),
            VT_UI1 => ArmRepr::UI1(r.read_u8()?),
            VT_BSTR => ArmRepr::BStr(r.read_pointer()?),
            VT_UNKNOWN => ArmRepr::Unknown(r.read_pointer()?),
            VT_DISPATCH => ArmRepr::Dispatch(r.read_pointer()?),
            other => {
                return Err(NdrError::InvalidDiscriminant {
                    type_name: "VARIANT",
                    value: u64::from(other),
                })
            }
        };
        Ok(VariantRepr { arm })
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        Ok(match repr.arm {
            ArmRepr::Empty => Variant::Empty,
            ArmRepr::Null => Variant::Null,
            ArmRepr::I2(v) => Variant::I2(v),
            ArmRepr::I4(v) => Variant::I4(v),
            ArmRepr::R4(v) => Variant::R4(v),
            ArmRepr::R8(v) => Variant::R8(v),
            ArmRepr::Bool(v) => Variant::Bool(v),
            ArmRepr::Error(v) => Variant::Error(v),
            ArmRepr::UI1(v) => Variant::UI1(v),
            ArmRepr::BStr(h) => Variant::BStr(h.take(r)?),
            ArmRepr::Unknown(h) => Variant::Unknown(h.take(r)?),
            ArmRepr::Dispatch(h) => Variant::Dispatch(h.take(r)?),
        })
    }
}
