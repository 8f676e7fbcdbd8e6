use crate::error::WireError;

/// Maximum number of bytes a u64 varint can occupy.
/// ceil(64 / 7) = 10 bytes.
pub const MAX_VARINT_BYTES: usize = 10;

/// Encode a `u64` value as an unsigned LEB128 varint into the provided buffer.
///
/// Production decoding never calls this; it exists for fixture builders,
/// benches, and fuzz harnesses that need to synthesize delta streams.
///
/// # Returns
///
/// The number of bytes written (1–10).
///
/// # Panics
///
/// Panics if `buf` is shorter than the required encoding length.
/// A 10-byte buffer is always sufficient for any `u64`.
///
/// # Wire format examples
///
/// | Value  | Encoded bytes        | Length |
/// |--------|----------------------|--------|
/// | 0      | `[0x00]`             | 1      |
/// | 127    | `[0x7F]`             | 1      |
/// | 128    | `[0x80, 0x01]`       | 2      |
/// | 624485 | `[0xE5, 0x8E, 0x26]` | 3      |
pub fn encode_varint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut i = 0;
    loop {
        // Take the lowest 7 bits
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value > 0 {
            // More bytes to come: set the continuation bit
            byte |= 0x80;
        }

        buf[i] = byte;
        i += 1;

        if value == 0 {
            break;
        }
    }
    i
}

/// Decode an unsigned LEB128 varint from the provided byte slice.
///
/// At most [`MAX_VARINT_BYTES`] bytes are examined. Ten consecutive bytes
/// with the continuation bit set are a defined overflow case: the decode
/// succeeds, consumes exactly ten bytes, and yields zero. The on-disk
/// encoder never produces such a sequence, but corrupt delta streams can,
/// and pinning the result keeps the decoder loop bounded.
///
/// # Returns
///
/// `(decoded_value, bytes_consumed)` on success.
///
/// # Errors
///
/// [`WireError::OutOfBounds`] if the slice ends while the continuation
/// bit is still set (truncated input, as opposed to overlong input).
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().take(MAX_VARINT_BYTES).enumerate() {
        // Extract the 7 data bits and shift them into position
        let data = u64::from(byte & 0x7F);
        result |= data << shift;
        shift += 7;

        // If MSB is clear, this is the last byte
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if buf.len() >= MAX_VARINT_BYTES {
        // Overlong: ten continuation bytes with no terminator in reach.
        return Ok((0, MAX_VARINT_BYTES));
    }

    // Ran out of input bytes while MSB was still set
    Err(WireError::OutOfBounds {
        offset: buf.len(),
        needed: 1,
        available: 0,
    })
}
