use tokio::io::{AsyncRead, AsyncReadExt};

use crate::chunk;
use crate::error::DecodeError;
use crate::samples::SampleBatch;

/// Asynchronous streaming decoder — yields sample batches one envelope
/// at a time without requiring the whole archive in memory.
///
/// This is the worker-boundary front end for large archives or network
/// sources: the sync [`ArchiveDecoder`](crate::ArchiveDecoder) needs
/// the full byte slice up front, while `StreamingDecoder` reads one
/// envelope per pull from any `AsyncRead`. Backpressure is natural —
/// nothing is read until the caller awaits the next batch.
///
/// Both decoders run the identical per-chunk pipeline and produce
/// identical batch sequences for identical bytes.
///
/// # Example
///
/// ```rust,no_run
/// use ftdc_decoder::StreamingDecoder;
/// use tokio::io::AsyncRead;
///
/// async fn decode_from_reader(reader: impl AsyncRead + Unpin) {
///     let mut stream = StreamingDecoder::new(reader);
///     while let Some(batch) = stream.next().await.transpose().unwrap() {
///         // Process each SampleBatch...
///     }
/// }
/// ```
pub struct StreamingDecoder<R> {
    reader: R,
    state: StreamState,
    /// Archive offset of the next envelope, mirrored into batch
    /// metadata and error context.
    offset: usize,
    /// Envelope read buffer, reused across chunks.
    buf: Vec<u8>,
}

/// The decoder reads envelopes until clean EOF or the first error,
/// then stays `Done` — every later `next()` returns `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    ReadEnvelopes,
    Done,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
    /// Create a streaming decoder positioned at the start of an archive.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: StreamState::ReadEnvelopes,
            offset: 0,
            buf: Vec::with_capacity(4096),
        }
    }

    /// Read envelopes until the next sample batch.
    ///
    /// Returns `Ok(Some(batch))` per metrics chunk, `None` once the
    /// source is exhausted at an envelope boundary, or an error.
    /// EOF inside an envelope (including inside its four length bytes)
    /// is an I/O error, not a clean end. After any error the stream is
    /// fused.
    pub async fn next(&mut self) -> Option<Result<SampleBatch, DecodeError>> {
        if self.state == StreamState::Done {
            return None;
        }
        loop {
            match self.read_chunk().await {
                Ok(Some(Some(batch))) => return Some(Ok(batch)),
                Ok(Some(None)) => {} // metadata or zero-sample chunk
                Ok(None) => {
                    self.state = StreamState::Done;
                    return None;
                }
                Err(e) => {
                    self.state = StreamState::Done;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Read one envelope and run the chunk pipeline on it.
    ///
    /// Outer `None` means clean EOF; inner `None` means the chunk
    /// emitted no batch.
    async fn read_chunk(&mut self) -> Result<Option<Option<SampleBatch>>, DecodeError> {
        // The envelope's size field doubles as the length prefix. A
        // clean end of stream can only happen before its first byte.
        let mut size_bytes = [0u8; 4];
        if !self.read_exact_or_eof(&mut size_bytes).await? {
            return Ok(None);
        }
        let size = u32::from_le_bytes(size_bytes) as usize;

        if size < ftdc_bson::MIN_DOCUMENT_LEN {
            return Err(DecodeError::Envelope {
                offset: self.offset,
                source: ftdc_bson::BsonError::InvalidSize {
                    size: i32::try_from(size).unwrap_or(i32::MAX),
                },
            });
        }

        self.buf.clear();
        self.buf.resize(size, 0);
        self.buf[..4].copy_from_slice(&size_bytes);
        self.reader.read_exact(&mut self.buf[4..]).await?;

        let result = chunk::decode_chunk(&self.buf, self.offset);
        self.offset += size;
        result.map(Some)
    }

    /// Fill `buf` exactly, distinguishing clean EOF before the first
    /// byte (`Ok(false)`) from truncation mid-fill (`Err`).
    async fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<bool, DecodeError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Ok(false);
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("archive truncated at offset {}", self.offset + filled),
                )
                .into());
            }
            filled += n;
        }
        Ok(true)
    }
}
