//! Marshal traits and primitive impls

use crate::error::Result;
use crate::reader::NdrReader;
use crate::writer::NdrWriter;

/// A type with an NDR wire representation
pub trait NdrMarshal {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()>;
}

/// A type decodable from its NDR wire representation
pub trait NdrUnmarshal: Sized {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self>;
}

macro_rules! primitive_impl {
    ($ty:ty, $write:ident, $read:ident) => {
        impl NdrMarshal for $ty {
            fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
                w.$write(*self);
                Ok(())
            }
        }

        impl NdrUnmarshal for $ty {
            fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
                r.$read()
            }
        }
    };
}

primitive_impl!(u8, write_u8, read_u8);
primitive_impl!(i8, write_i8, read_i8);
primitive_impl!(u16, write_u16, read_u16);
primitive_impl!(i16, write_i16, read_i16);
primitive_impl!(u32, write_u32, read_u32);
primitive_impl!(i32, write_i32, read_i32);
primitive_impl!(u64, write_u64, read_u64);
primitive_impl!(i64, write_i64, read_i64);
primitive_impl!(f32, write_f32, read_f32);
primitive_impl!(f64, write_f64, read_f64);
primitive_impl!(bool, write_bool, read_bool);
