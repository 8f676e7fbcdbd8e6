use std::sync::Arc;

use ftdc_bson::{BsonValue, DecodeMode, decode_document};
use ftdc_wire::ByteReader;

use crate::decompression::{self, InflateError, MAX_CHUNK_DECOMPRESSED_SIZE};
use crate::error::DecodeError;
use crate::samples::SampleBatch;
use crate::{delta, reference, samples};

/// A decoded chunk envelope, before its payload is touched.
///
/// One envelope per archive chunk:
///
/// ```text
///   { _id: DateTime, type: Int32, data: Binary(subtype 0, zlib) }
/// ```
///
/// `type` 0 marks a metadata-only chunk (startup info, host details),
/// anything else a metrics chunk. The envelope is decoded in FTDC mode,
/// which stops at the Binary element and hands back the raw deflate
/// stream without copying the header bytes around it.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The `_id` field as epoch milliseconds, when present.
    pub capture_id: Option<i64>,

    /// The `type` field; 0 means metadata-only.
    pub kind: i32,

    /// The compressed metrics payload. Empty for metadata chunks,
    /// which the FTDC writer emits without a metrics block.
    pub data: Vec<u8>,
}

impl Envelope {
    /// Decode one envelope document. `offset` is the envelope's byte
    /// position in the archive, used for error context only.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Envelope`] if the document fails BSON validation.
    /// - [`DecodeError::MissingEnvelopeField`] if `type` is absent, or
    ///   `data` is absent from a metrics envelope.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let doc = decode_document(bytes, DecodeMode::Ftdc)
            .map_err(|source| DecodeError::Envelope { offset, source })?;

        let capture_id = match doc.get("_id") {
            Some(&BsonValue::DateTime(ms) | &BsonValue::Int64(ms)) => Some(ms),
            _ => None,
        };

        let kind = match doc.get("type") {
            Some(&BsonValue::Int32(kind)) => kind,
            _ => {
                return Err(DecodeError::MissingEnvelopeField {
                    offset,
                    field: "type",
                });
            }
        };

        let data = match doc.get("data") {
            Some(BsonValue::Binary { data, .. }) => data.clone(),
            None if kind == 0 => Vec::new(),
            _ => {
                return Err(DecodeError::MissingEnvelopeField {
                    offset,
                    field: "data",
                });
            }
        };

        Ok(Self {
            capture_id,
            kind,
            data,
        })
    }

    /// True for a metadata-only chunk that carries no metric samples.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        self.kind == 0
    }
}

/// Run the full per-chunk pipeline over one envelope's bytes.
///
/// ```text
///   envelope → inflate → reference document → flatten + clean
///            → delta stream → integration → sample records
/// ```
///
/// Returns `Ok(None)` for chunks that legitimately emit nothing: a
/// metadata envelope, or a metrics chunk declaring zero samples.
pub(crate) fn decode_chunk(bytes: &[u8], offset: usize) -> Result<Option<SampleBatch>, DecodeError> {
    let envelope = Envelope::decode(bytes, offset)?;
    if envelope.is_metadata() {
        return Ok(None);
    }

    let block = decompression::inflate(&envelope.data, MAX_CHUNK_DECOMPRESSED_SIZE).map_err(
        |e| match e {
            InflateError::Failed(message) => DecodeError::Decompression { offset, message },
            InflateError::TooLarge { actual, limit } => DecodeError::DecompressedSizeLimit {
                offset,
                actual,
                limit,
            },
        },
    )?;

    // Decompressed layout:
    //   [reference document][u32 numMetrics][u32 numSamples][deltas]
    let mut r = ByteReader::new(&block);
    let ref_size = r
        .u32_le()
        .map_err(|e| DecodeError::Reference { offset, source: e.into() })?;

    // The size field is the reference document's own leading i32; hand
    // the decoder the document from its start, then step past it.
    let ref_bytes = block
        .get(..ref_size as usize)
        .ok_or_else(|| DecodeError::Reference {
            offset,
            source: ftdc_wire::WireError::OutOfBounds {
                offset: 0,
                needed: ref_size as usize,
                available: block.len(),
            }
            .into(),
        })?;
    let ref_doc = decode_document(ref_bytes, DecodeMode::Standard)
        .map_err(|source| DecodeError::Reference { offset, source })?;
    r.skip(ref_size as usize - 4)
        .map_err(|e| DecodeError::Reference { offset, source: e.into() })?;

    let num_metrics = r
        .u32_le()
        .map_err(|e| DecodeError::Reference { offset, source: e.into() })?
        as usize;
    let num_samples = r
        .u32_le()
        .map_err(|e| DecodeError::Reference { offset, source: e.into() })?
        as usize;

    // Slots cost no input bytes under zero-run encoding, so cap the
    // header-declared count before any slot buffer is grown.
    let slots = num_metrics.saturating_mul(num_samples);
    if slots > delta::MAX_SAMPLE_SLOTS {
        return Err(DecodeError::SampleSlotLimit {
            offset,
            actual: slots,
            limit: delta::MAX_SAMPLE_SLOTS,
        });
    }

    let metrics = reference::clean(reference::flatten(&ref_doc));
    if metrics.len() != num_metrics {
        return Err(DecodeError::MetricCountMismatch {
            offset,
            expected: num_metrics,
            found: metrics.len(),
        });
    }

    if num_samples == 0 {
        return Ok(None);
    }

    let deltas = delta::decode_deltas(&mut r, num_metrics, num_samples)
        .map_err(|source| DecodeError::DeltaStream { offset, source })?;

    let (keys, bases): (Vec<String>, Vec<i64>) = metrics.into_iter().unzip();
    let values = delta::integrate(&deltas, &bases, num_samples);
    let records = samples::reconstruct(Arc::from(keys), &values, num_samples);

    Ok(Some(SampleBatch {
        offset,
        capture_id: envelope.capture_id,
        records,
    }))
}
