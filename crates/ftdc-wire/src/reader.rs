use crate::error::WireError;
use crate::varint::decode_varint;

/// Bounds-checked sequential reader over an immutable byte region.
///
/// `ByteReader` wraps a borrowed slice and a cursor. Every read
/// validates that enough bytes remain before advancing; failed reads
/// leave the cursor untouched and report [`WireError::OutOfBounds`]
/// with the absolute offset. The underlying bytes are never copied —
/// slice-returning reads borrow from the input.
///
/// # Usage pattern
///
/// ```text
///   let mut r = ByteReader::new(payload);
///   let size = r.u32_le()?;
///   let doc = r.bytes(size as usize)?;
///   while !r.is_empty() {
///       let delta = r.varint()?;
///       // ...
///   }
/// ```
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position, in bytes from the start of the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn oob(&self, needed: usize) -> WireError {
        WireError::OutOfBounds {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    /// Borrow the next `n` bytes and advance past them.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than `n` bytes remain.
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(n).ok_or_else(|| self.oob(n))?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| self.oob(n))?;
        self.pos = end;
        Ok(slice)
    }

    /// Advance past `n` bytes without looking at them.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.bytes(n).map(|_| ())
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] at end of input.
    pub fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.bytes(1)?[0])
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn u32_le(&mut self) -> Result<u32, WireError> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian `i32`.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn i32_le(&mut self) -> Result<i32, WireError> {
        let b = self.bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than 8 bytes remain.
    pub fn i64_le(&mut self) -> Result<i64, WireError> {
        let b = self.bytes(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a little-endian IEEE-754 binary64.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if fewer than 8 bytes remain.
    pub fn f64_le(&mut self) -> Result<f64, WireError> {
        let b = self.bytes(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read bytes up to (not including) the next NUL, advancing past it.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if no NUL terminator exists in the
    /// remaining input.
    pub fn cstring(&mut self) -> Result<&'a [u8], WireError> {
        let rest = &self.buf[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                let s = &rest[..nul];
                self.pos += nul + 1;
                Ok(s)
            }
            None => Err(self.oob(rest.len() + 1)),
        }
    }

    /// Decode an unsigned LEB128 varint at the cursor.
    ///
    /// Shares the overlong-input rule of
    /// [`decode_varint`](crate::varint::decode_varint): ten continuation
    /// bytes decode to zero.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if the input ends mid-varint. The
    /// reported offset is absolute, not varint-relative.
    pub fn varint(&mut self) -> Result<u64, WireError> {
        let (value, consumed) = decode_varint(&self.buf[self.pos..]).map_err(|e| match e {
            WireError::OutOfBounds {
                offset,
                needed,
                available,
            } => WireError::OutOfBounds {
                offset: self.pos + offset,
                needed,
                available,
            },
        })?;
        self.pos += consumed;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_reads_advance_in_order() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());
        buf.extend_from_slice(&(-7_i32).to_le_bytes());
        buf.extend_from_slice(&(-9_000_000_000_i64).to_le_bytes());
        buf.extend_from_slice(&1.5_f64.to_le_bytes());

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.u32_le().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.i32_le().unwrap(), -7);
        assert_eq!(r.i64_le().unwrap(), -9_000_000_000);
        assert!((r.f64_le().unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(r.is_empty());
    }

    #[test]
    fn bytes_borrows_exact_slice() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.bytes(2).unwrap(), &[1, 2]);
        assert_eq!(r.position(), 2);
        assert_eq!(r.remaining(), 3);
    }

    #[test]
    fn short_read_reports_offset_and_counts() {
        let buf = [1u8, 2];
        let mut r = ByteReader::new(&buf);
        r.skip(1).unwrap();
        let err = r.u32_le().unwrap_err();
        assert_eq!(
            err,
            WireError::OutOfBounds {
                offset: 1,
                needed: 4,
                available: 1,
            }
        );
        // Failed reads leave the cursor in place
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn cstring_stops_at_nul_and_skips_it() {
        let buf = b"key\0rest";
        let mut r = ByteReader::new(buf);
        assert_eq!(r.cstring().unwrap(), b"key");
        assert_eq!(r.position(), 4);
        assert_eq!(r.bytes(4).unwrap(), b"rest");
    }

    #[test]
    fn cstring_without_terminator_is_out_of_bounds() {
        let buf = b"never-ending";
        let mut r = ByteReader::new(buf);
        assert!(matches!(
            r.cstring(),
            Err(WireError::OutOfBounds { offset: 0, .. })
        ));
    }

    #[test]
    fn empty_cstring_is_valid() {
        let buf = [0u8, 7];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.cstring().unwrap(), b"");
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn varint_reports_absolute_offset() {
        let buf = [0x01, 0x02, 0x80];
        let mut r = ByteReader::new(&buf);
        r.skip(2).unwrap();
        let err = r.varint().unwrap_err();
        assert!(matches!(err, WireError::OutOfBounds { offset: 3, .. }));
    }

    #[test]
    fn varint_advances_cursor_by_consumed_bytes() {
        let buf = [0xE5, 0x8E, 0x26, 0x07];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.varint().unwrap(), 624_485);
        assert_eq!(r.position(), 3);
        assert_eq!(r.varint().unwrap(), 7);
    }
}
