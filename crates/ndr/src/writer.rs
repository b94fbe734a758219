//! NDR encoder
//!
//! Little-endian NDR 2.0 encoding with natural alignment and deferred
//! pointer bodies. Pointers are encoded as a nonzero referent ID at the
//! point of reference; the pointed-to data is queued and emitted by
//! [`NdrWriter::write_deferred`] in first-in-first-out order, after the
//! embedding structure's inline representation.

use std::collections::VecDeque;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::marshal::NdrMarshal;

/// First referent ID handed out by a writer.
///
/// Any nonzero value is a valid "pointer present" marker; this base mirrors
/// what Windows NDR engines emit and keeps captures recognizable.
const REFERENT_ID_BASE: u32 = 0x0002_0000;

type DeferredWrite = Box<dyn FnOnce(&mut NdrWriter) -> Result<()> + Send>;

/// Position-tracked NDR encoder
pub struct NdrWriter {
    buf: BytesMut,
    deferred: VecDeque<DeferredWrite>,
    next_referent: u32,
    draining: bool,
}

impl NdrWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            deferred: VecDeque::new(),
            next_referent: REFERENT_ID_BASE,
            draining: false,
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Pad with zero bytes until the position is a multiple of `boundary`
    pub fn align(&mut self, boundary: usize) {
        debug_assert!(boundary.is_power_of_two());
        let rem = self.buf.len() % boundary;
        if rem != 0 {
            for _ in 0..(boundary - rem) {
                self.buf.put_u8(0);
            }
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.align(2);
        self.buf.put_u16_le(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.align(2);
        self.buf.put_i16_le(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.align(4);
        self.buf.put_u32_le(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.align(4);
        self.buf.put_i32_le(v);
    }

    pub fn write_u64(&mut self, v: u64) {
        self.align(8);
        self.buf.put_u64_le(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.align(8);
        self.buf.put_i64_le(v);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.align(4);
        self.buf.put_f32_le(v);
    }

    pub fn write_f64(&mut self, v: f64) {
        self.align(8);
        self.buf.put_f64_le(v);
    }

    /// Booleans travel as 4-byte integers, 1 for true and 0 for false
    pub fn write_bool(&mut self, v: bool) {
        self.write_u32(u32::from(v));
    }

    /// Raw bytes, no alignment
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    fn next_referent_id(&mut self) -> u32 {
        let id = self.next_referent;
        self.next_referent = self.next_referent.wrapping_add(4);
        id
    }

    /// Encode a unique pointer to `value`.
    ///
    /// Writes the referent ID (or zero for `None`) inline and defers the
    /// body until [`write_deferred`](Self::write_deferred).
    pub fn write_pointer<T>(&mut self, value: Option<&T>) -> Result<()>
    where
        T: NdrMarshal + Clone + Send + 'static,
    {
        match value {
            None => {
                self.write_u32(0);
                Ok(())
            }
            Some(v) => {
                let v = v.clone();
                self.write_pointer_with(move |w| v.marshal_ndr(w))
            }
        }
    }

    /// Encode a present pointer whose body is produced by `body`.
    ///
    /// Used where the pointed-to data is not a single `NdrMarshal` value,
    /// for example a conformant array of pointers.
    pub fn write_pointer_with<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut NdrWriter) -> Result<()> + Send + 'static,
    {
        let id = self.next_referent_id();
        self.write_u32(id);
        self.deferred.push_back(Box::new(body));
        Ok(())
    }

    /// Flush queued pointer bodies in FIFO order.
    ///
    /// Bodies may themselves queue further pointers; those run in the same
    /// flush. Calls made while a flush is already running are no-ops, so
    /// structure encoders can call this unconditionally without reordering
    /// an enclosing encoder's queue.
    pub fn write_deferred(&mut self) -> Result<()> {
        if self.draining {
            return Ok(());
        }
        self.draining = true;
        while let Some(body) = self.deferred.pop_front() {
            if let Err(e) = body(self) {
                self.draining = false;
                return Err(e);
            }
        }
        self.draining = false;
        Ok(())
    }

    /// Finish encoding and take the buffer
    pub fn into_bytes(self) -> Bytes {
        debug_assert!(self.deferred.is_empty(), "unflushed deferred pointer bodies");
        self.buf.freeze()
    }
}

impl Default for NdrWriter {
    fn default() -> Self {
        Self::new()
    }
}
