//! Monotonic read cursor over a payload

use bytes::Buf;

use super::errors::PayloadError;

/// Read-only cursor over a byte slice.
///
/// The offset only moves forward, and only by the width of a region that was
/// actually present, so the cursor never skips, overlaps or rewinds.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    rest: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Cursor {
            rest: bytes,
            offset: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }

    pub fn is_exhausted(&self) -> bool {
        !self.rest.has_remaining()
    }

    fn ensure(&self, what: &'static str, len: usize) -> Result<(), PayloadError> {
        if len > self.rest.remaining() {
            return Err(PayloadError::Truncated {
                what,
                needed: len,
                available: self.rest.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, what: &'static str, len: usize) -> Result<&'a [u8], PayloadError> {
        self.ensure(what, len)?;
        let region = &self.rest[..len];
        self.rest.advance(len);
        self.offset += len;
        Ok(region)
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, PayloadError> {
        self.ensure(what, 4)?;
        self.offset += 4;
        Ok(self.rest.get_u32_le())
    }

    /// Advance by `len` bytes without borrowing them.
    pub fn skip(&mut self, what: &'static str, len: usize) -> Result<(), PayloadError> {
        self.take(what, len).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_advances() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(cursor.take("a", 2).unwrap(), &[1, 2]);
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.remaining(), &[3, 4, 5]);
        cursor.skip("b", 3).unwrap();
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_take_past_end_does_not_move() {
        let bytes = [0u8; 3];
        let mut cursor = Cursor::new(&bytes);
        cursor.skip("a", 1).unwrap();
        let err = cursor.take("record", 4).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Truncated {
                what: "record",
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_read_u32_little_endian() {
        let bytes = [0x78, 0x56, 0x34, 0x12];
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(cursor.read_u32("len").unwrap(), 0x1234_5678);
        assert_eq!(cursor.offset(), 4);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_read_u32_short_header() {
        let bytes = [1u8, 0, 0, 0, 2, 0];
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(cursor.read_u32("header").unwrap(), 1);
        let err = cursor.read_u32("header").unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Truncated {
                what: "header",
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.remaining(), &[2, 0]);
    }
}
