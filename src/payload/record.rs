//! Timestamp counter records
//!
//! [`TscView`] borrows one record straight out of the payload and decodes
//! fields on access; [`TscStats`] is the owned, decoded form used by the
//! renderer and by [`super::ModuleBuilder`].

use bytes::{Buf, BufMut};

use super::TSC_RECORD_SIZE;

/// Total/min/average/max aggregate of one measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub total: i64,
    pub min: i64,
    pub avg: f64,
    pub max: i64,
}

impl Aggregate {
    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_i64_le(self.total);
        buf.put_i64_le(self.min);
        buf.put_f64_le(self.avg);
        buf.put_i64_le(self.max);
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        Aggregate {
            total: buf.get_i64_le(),
            min: buf.get_i64_le(),
            avg: buf.get_f64_le(),
            max: buf.get_i64_le(),
        }
    }
}

/// Decoded contents of one timestamp counter record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TscStats {
    pub start_count: i64,
    pub end_count: i64,
    pub nanos: Aggregate,
    pub cycles: Aggregate,
}

impl TscStats {
    /// Append the record to `buf` in payload layout.
    pub fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_i64_le(self.start_count);
        buf.put_i64_le(self.end_count);
        self.nanos.put(buf);
        self.cycles.put(buf);
    }

    /// Encode into the on-payload record layout.
    pub fn encode(&self) -> [u8; TSC_RECORD_SIZE] {
        let mut out = [0u8; TSC_RECORD_SIZE];
        self.put(&mut &mut out[..]);
        out
    }

    /// Read one record from the front of `buf`.
    ///
    /// Panics if fewer than [`TSC_RECORD_SIZE`] bytes remain.
    fn get<B: Buf>(buf: &mut B) -> Self {
        TscStats {
            start_count: buf.get_i64_le(),
            end_count: buf.get_i64_le(),
            nanos: Aggregate::get(buf),
            cycles: Aggregate::get(buf),
        }
    }
}

/// Read-only view of one record inside a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TscView<'a> {
    bytes: &'a [u8; TSC_RECORD_SIZE],
}

impl<'a> TscView<'a> {
    pub fn new(bytes: &'a [u8; TSC_RECORD_SIZE]) -> Self {
        TscView { bytes }
    }

    /// The raw record bytes.
    pub fn as_bytes(&self) -> &'a [u8; TSC_RECORD_SIZE] {
        self.bytes
    }

    pub fn start_count(&self) -> i64 {
        self.stats().start_count
    }

    pub fn end_count(&self) -> i64 {
        self.stats().end_count
    }

    pub fn nanos(&self) -> Aggregate {
        self.stats().nanos
    }

    pub fn cycles(&self) -> Aggregate {
        self.stats().cycles
    }

    /// Decode every field.
    pub fn stats(&self) -> TscStats {
        TscStats::get(&mut &self.bytes[..])
    }
}
