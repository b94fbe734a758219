//! NDR decoder
//!
//! Mirror of [`NdrWriter`](crate::writer::NdrWriter): little-endian scalars
//! with natural alignment, and pointer bodies decoded from the deferred
//! region. Reading a pointer yields a typed [`Deferred`] handle; the body
//! itself is consumed when [`NdrReader::read_deferred`] drains the queue,
//! and the decoded value is claimed from the handle afterwards.

use std::any::Any;
use std::collections::VecDeque;
use std::marker::PhantomData;

use bytes::Bytes;

use crate::error::{NdrError, Result, MAX_NDR_ALLOCATION_SIZE};
use crate::marshal::NdrUnmarshal;

type PendingBody = Box<dyn FnOnce(&mut NdrReader) -> Result<Box<dyn Any + Send>> + Send>;

struct Pending {
    slot: usize,
    body: PendingBody,
}

/// Position-tracked NDR decoder
pub struct NdrReader {
    buf: Bytes,
    pos: usize,
    pending: VecDeque<Pending>,
    resolved: Vec<Option<Box<dyn Any + Send>>>,
    draining: bool,
}

/// Handle to a pointer body read by [`NdrReader::read_pointer`].
///
/// Holds either "null on the wire" or a slot filled in when the reader
/// drains its deferral queue. [`take`](Deferred::take) claims the decoded
/// value; claiming before the drain fails with
/// [`NdrError::DeferredNotResolved`].
pub struct Deferred<T: NdrPointee> {
    slot: Option<usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: NdrPointee> Deferred<T> {
    /// Handle for a null pointer
    pub fn null() -> Self {
        Self {
            slot: None,
            _marker: PhantomData,
        }
    }

    /// True if the wire carried a nonzero referent ID
    pub fn is_present(&self) -> bool {
        self.slot.is_some()
    }

    /// Claim the decoded body, consuming the handle.
    ///
    /// Must run after [`NdrReader::read_deferred`] on the same reader.
    pub fn take(self, r: &mut NdrReader) -> Result<Option<T>> {
        match self.slot {
            None => Ok(None),
            Some(slot) => {
                let boxed = r
                    .resolved
                    .get_mut(slot)
                    .and_then(Option::take)
                    .ok_or(NdrError::DeferredNotResolved)?;
                let repr = *boxed
                    .downcast::<T::Repr>()
                    .map_err(|_| NdrError::DeferredNotResolved)?;
                T::take_repr(repr, r).map(Some)
            }
        }
    }
}

/// A type decodable as a pointer referent.
///
/// Most types read their entire body inline and get this for free via the
/// blanket impl over [`NdrUnmarshal`]. Types whose bodies contain further
/// pointers implement it directly: `read_repr` decodes the inline part and
/// collects [`Deferred`] handles for the nested pointers, `take_repr`
/// claims them once the queue has drained.
pub trait NdrPointee: Sized {
    type Repr: Send + 'static;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr>;

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self>;
}

impl<T: NdrUnmarshal + Send + 'static> NdrPointee for T {
    type Repr = T;

    fn read_repr(r: &mut NdrReader) -> Result<T> {
        T::unmarshal_ndr(r)
    }

    fn take_repr(repr: T, _r: &mut NdrReader) -> Result<T> {
        Ok(repr)
    }
}

impl NdrReader {
    pub fn new(buf: Bytes) -> Self {
        Self {
            buf,
            pos: 0,
            pending: VecDeque::new(),
            resolved: Vec::new(),
            draining: false,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(NdrError::BufferUnderflow {
                needed,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    /// Skip pad bytes until the position is a multiple of `boundary`
    pub fn align(&mut self, boundary: usize) -> Result<()> {
        debug_assert!(boundary.is_power_of_two());
        let rem = self.pos % boundary;
        if rem != 0 {
            let pad = boundary - rem;
            self.ensure(pad)?;
            self.pos += pad;
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.align(N)?;
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array::<8>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Any nonzero 4-byte integer decodes as true
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u32()? != 0)
    }

    /// Raw bytes, no alignment. Rejects sizes above the allocation limit.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if len > MAX_NDR_ALLOCATION_SIZE {
            return Err(NdrError::AllocationLimitExceeded(len));
        }
        self.ensure(len)?;
        let out = self.buf[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(out)
    }

    /// Read a conformance or variance count, bounds-checked against the
    /// allocation limit for elements of `elem_size` bytes.
    pub fn read_size(&mut self, elem_size: usize) -> Result<usize> {
        let count = self.read_u32()? as usize;
        let bytes = count
            .checked_mul(elem_size)
            .ok_or(NdrError::IntegerOverflow)?;
        if bytes > MAX_NDR_ALLOCATION_SIZE {
            return Err(NdrError::AllocationLimitExceeded(bytes));
        }
        Ok(count)
    }

    /// Decode a unique pointer: consume the referent ID and queue the body.
    pub fn read_pointer<T: NdrPointee>(&mut self) -> Result<Deferred<T>> {
        let referent = self.read_u32()?;
        if referent == 0 {
            return Ok(Deferred::null());
        }
        let slot = self.resolved.len();
        self.resolved.push(None);
        self.pending.push_back(Pending {
            slot,
            body: Box::new(move |r| T::read_repr(r).map(|v| Box::new(v) as Box<dyn Any + Send>)),
        });
        Ok(Deferred {
            slot: Some(slot),
            _marker: PhantomData,
        })
    }

    /// Drain queued pointer bodies in FIFO order.
    ///
    /// Bodies queued while draining (nested pointers) run in the same
    /// pass. Calls made from within a body are no-ops, mirroring the
    /// writer's flush discipline.
    pub fn read_deferred(&mut self) -> Result<()> {
        if self.draining {
            return Ok(());
        }
        self.draining = true;
        while let Some(p) = self.pending.pop_front() {
            match (p.body)(self) {
                Ok(v) => self.resolved[p.slot] = Some(v),
                Err(e) => {
                    self.draining = false;
                    return Err(e);
                }
            }
        }
        self.draining = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::NdrWriter;

    #[test]
    fn scalar_round_trip() {
        let mut w = NdrWriter::new();
        w.write_u8(7);
        w.write_i16(-2);
        w.write_u32(0xDEAD_BEEF);
        w.write_f64(1.5);
        let mut r = NdrReader::new(w.into_bytes());
        assert_eq!(r.read_u8().unwrap(), 7);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_f64().unwrap(), 1.5);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn truncated_scalar_underflows() {
        let mut r = NdrReader::new(Bytes::from_static(&[1, 2]));
        let err = r.read_u32().unwrap_err();
        assert!(matches!(err, NdrError::BufferUnderflow { needed: 4, have: 2 }));
    }

    #[test]
    fn nonzero_bool_decodes_true() {
        let mut r = NdrReader::new(Bytes::from_static(&[42, 0, 0, 0]));
        assert!(r.read_bool().unwrap());
    }

    #[test]
    fn pointer_round_trip_preserves_order() {
        let mut w = NdrWriter::new();
        w.write_pointer(Some(&10u32)).unwrap();
        w.write_pointer::<u32>(None).unwrap();
        w.write_pointer(Some(&30u32)).unwrap();
        w.write_deferred().unwrap();

        let mut r = NdrReader::new(w.into_bytes());
        let a = r.read_pointer::<u32>().unwrap();
        let b = r.read_pointer::<u32>().unwrap();
        let c = r.read_pointer::<u32>().unwrap();
        r.read_deferred().unwrap();
        assert_eq!(a.take(&mut r).unwrap(), Some(10));
        assert_eq!(b.take(&mut r).unwrap(), None);
        assert_eq!(c.take(&mut r).unwrap(), Some(30));
    }

    #[test]
    fn claim_before_drain_fails() {
        let mut w = NdrWriter::new();
        w.write_pointer(Some(&1u32)).unwrap();
        w.write_deferred().unwrap();

        let mut r = NdrReader::new(w.into_bytes());
        let h = r.read_pointer::<u32>().unwrap();
        let err = h.take(&mut r).unwrap_err();
        assert!(matches!(err, NdrError::DeferredNotResolved));
    }

    #[test]
    fn oversized_conformance_rejected() {
        let mut w = NdrWriter::new();
        w.write_u32(u32::MAX);
        let mut r = NdrReader::new(w.into_bytes());
        let err = r.read_size(4).unwrap_err();
        assert!(matches!(err, NdrError::AllocationLimitExceeded(_)));
    }
}
