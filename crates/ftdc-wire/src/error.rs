#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// A read required more bytes than the buffer holds.
    ///
    /// `offset` is the byte position (from the start of the input) where
    /// the read began, `needed` how many bytes the read wanted, and
    /// `available` how many were actually left. Every fixed-width read,
    /// cstring scan, and varint decode reports truncation through this
    /// variant.
    #[error("out of bounds read at offset {offset}: needed {needed} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
}
