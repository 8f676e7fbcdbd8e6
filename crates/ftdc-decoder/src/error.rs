use ftdc_bson::BsonError;
use ftdc_wire::WireError;

/// Errors from decoding an FTDC archive.
///
/// Every variant that concerns a specific chunk carries the envelope's
/// byte offset from the start of the archive, so a diagnostic can point
/// at the failing chunk in a multi-hundred-megabyte file.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── Envelope               ← envelope document failed BSON validation
///   ├── MissingEnvelopeField   ← no `type`, or metrics chunk without `data`
///   ├── Decompression          ← zlib codec rejected the payload
///   ├── DecompressedSizeLimit  ← inflation output exceeded the safety cap
///   ├── Reference              ← reference document failed BSON validation
///   ├── MetricCountMismatch    ← cleaned leaf count ≠ declared numMetrics
///   ├── SampleSlotLimit        ← header declared more slots than the cap
///   ├── DeltaStream            ← delta bytes ran out before all slots filled
///   ├── Wire(WireError)        ← archive-level framing read overran
///   └── Io(std::io::Error)     ← from the streaming decoder's reads
/// ```
///
/// A chunk failure aborts the whole archive decode: there is no
/// per-chunk recovery, and both the sync and streaming decoders fuse
/// after the first error.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The chunk envelope document failed structural validation.
    #[error("invalid chunk envelope at offset {offset}: {source}")]
    Envelope { offset: usize, source: BsonError },

    /// The envelope decoded but lacked a required field.
    ///
    /// Metadata envelopes need a `type` Int32; metrics envelopes
    /// additionally need a `data` Binary element.
    #[error("chunk envelope at offset {offset} is missing field {field:?}")]
    MissingEnvelopeField { offset: usize, field: &'static str },

    /// The zlib codec could not inflate the chunk payload.
    ///
    /// Common causes: a truncated download, or a `data` field that is
    /// not actually deflate-compressed. The codec's own message is
    /// preserved as text.
    #[error("decompression failed for chunk at offset {offset}: {message}")]
    Decompression { offset: usize, message: String },

    /// Inflation output exceeded the per-chunk safety cap.
    ///
    /// Guards against decompression bombs. `actual` is how far
    /// inflation got before being stopped, so it reads as "at least
    /// this many bytes" rather than the true decompressed size.
    #[error("decompressed size {actual} exceeds limit {limit} for chunk at offset {offset}")]
    DecompressedSizeLimit {
        offset: usize,
        actual: usize,
        limit: usize,
    },

    /// The reference document inside the decompressed payload failed
    /// BSON validation, or the payload was too short to hold it.
    #[error("invalid reference document in chunk at offset {offset}: {source}")]
    Reference { offset: usize, source: BsonError },

    /// The cleaned reference document's numeric leaf count does not
    /// match the chunk's declared metric count.
    ///
    /// Signals a corrupt chunk or a schema the cleaning rules do not
    /// cover; emitting records against the wrong schema would silently
    /// pair values with the wrong metric names, so this is fatal.
    #[error("chunk at offset {offset} declares {expected} metrics, reference document has {found}")]
    MetricCountMismatch {
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// The header declared more numMetrics × numSamples slots than
    /// [`MAX_SAMPLE_SLOTS`](crate::delta::MAX_SAMPLE_SLOTS).
    ///
    /// Zero runs make slots free of input bytes, so the declared count
    /// is capped the same way inflation output is.
    #[error("declared sample slots {actual} exceed limit {limit} for chunk at offset {offset}")]
    SampleSlotLimit {
        offset: usize,
        actual: usize,
        limit: usize,
    },

    /// The delta stream ran out of bytes before every
    /// numMetrics × numSamples slot was filled.
    #[error("truncated delta stream in chunk at offset {offset}: {source}")]
    DeltaStream { offset: usize, source: WireError },

    /// An archive-level framing read overran the available bytes.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An I/O error from the underlying reader (streaming decoder).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
