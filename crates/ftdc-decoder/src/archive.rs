use ftdc_bson::MIN_DOCUMENT_LEN;
use ftdc_wire::WireError;

use crate::chunk;
use crate::error::DecodeError;
use crate::samples::SampleBatch;

/// Lazy pull decoder over a complete in-memory archive.
///
/// An archive is a plain concatenation of chunk envelopes; each
/// envelope's first four bytes are its own BSON size field, so the
/// walker peeks the length, slices exactly that many bytes, and runs
/// the per-chunk pipeline on the slice.
///
/// One [`SampleBatch`] is yielded per metrics chunk. Metadata chunks
/// and zero-sample chunks are skipped silently. Nothing past the
/// current envelope is read until the caller asks for the next batch,
/// so peak memory is one decompressed chunk regardless of archive
/// size, and a consumer may simply stop pulling to cancel.
///
/// The iterator fuses after the first error: a malformed chunk aborts
/// the decode, and later envelopes are unreachable anyway once the
/// walker loses byte alignment.
///
/// # Example
///
/// ```rust,no_run
/// # fn read_archive() -> Vec<u8> { Vec::new() }
/// let bytes = read_archive();
/// for batch in ftdc_decoder::decode_archive(&bytes) {
///     let batch = batch.unwrap();
///     for record in &batch.records {
///         // record.iter() yields (metric key, value) pairs
///     }
/// }
/// ```
pub struct ArchiveDecoder<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

/// Decode an FTDC archive as a lazy sequence of sample batches.
#[must_use]
pub fn decode_archive(buf: &[u8]) -> ArchiveDecoder<'_> {
    ArchiveDecoder {
        buf,
        offset: 0,
        failed: false,
    }
}

impl ArchiveDecoder<'_> {
    /// Byte offset the walker will read the next envelope from.
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    fn next_batch(&mut self) -> Option<Result<SampleBatch, DecodeError>> {
        loop {
            let remaining = self.buf.len() - self.offset;
            if remaining == 0 {
                return None;
            }

            // Peek the envelope's BSON size field without consuming it;
            // the envelope slice includes these four bytes.
            if remaining < 4 {
                return Some(Err(WireError::OutOfBounds {
                    offset: self.offset,
                    needed: 4,
                    available: remaining,
                }
                .into()));
            }
            let size = u32::from_le_bytes(
                self.buf[self.offset..self.offset + 4]
                    .try_into()
                    .expect("peeked 4 bytes"),
            ) as usize;

            if size < MIN_DOCUMENT_LEN {
                return Some(Err(DecodeError::Envelope {
                    offset: self.offset,
                    source: ftdc_bson::BsonError::InvalidSize {
                        size: i32::try_from(size).unwrap_or(i32::MAX),
                    },
                }));
            }
            if size > remaining {
                return Some(Err(WireError::OutOfBounds {
                    offset: self.offset,
                    needed: size,
                    available: remaining,
                }
                .into()));
            }

            let envelope = &self.buf[self.offset..self.offset + size];
            let result = chunk::decode_chunk(envelope, self.offset);
            self.offset += size;

            match result {
                Ok(Some(batch)) => return Some(Ok(batch)),
                Ok(None) => {} // metadata or zero-sample chunk
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl Iterator for ArchiveDecoder<'_> {
    type Item = Result<SampleBatch, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_batch();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}
