use ftdc_wire::WireError;

/// Errors from decoding a BSON document.
///
/// These cover the structural validation layer above raw byte reads.
/// Truncation anywhere inside a document surfaces as the wrapped
/// [`WireError`], so a caller matching on `BsonError` sees exactly
/// three failure shapes:
///
/// ```text
///   BsonError
///   ├── InvalidSize        ← declared container size below the 5-byte minimum
///   ├── InvalidTerminator  ← container does not end in 0x00
///   └── Wire(WireError)    ← a read overran the available bytes
/// ```
///
/// Unknown element tags are deliberately not an error: the decoder
/// skips them and resynchronizes at the enclosing container's end.
#[derive(Debug, thiserror::Error)]
pub enum BsonError {
    /// A document or array declared a total size below the minimum.
    ///
    /// Every container occupies at least 5 bytes: a 4-byte size field
    /// plus the trailing terminator. Negative sizes land here too.
    #[error("invalid BSON size: {size}")]
    InvalidSize { size: i32 },

    /// A container's last declared byte was not the 0x00 terminator.
    #[error("invalid BSON terminator: expected 0x00, found {found:#04X}")]
    InvalidTerminator { found: u8 },

    /// A read inside the document ran out of bytes.
    #[error(transparent)]
    Wire(#[from] WireError),
}
