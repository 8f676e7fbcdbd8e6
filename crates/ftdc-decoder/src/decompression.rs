use std::io::Read;

use flate2::read::ZlibDecoder;

/// Per-chunk cap on inflation output.
///
/// FTDC chunks decompress to a few megabytes at most; anything
/// approaching this cap is a crafted payload, not diagnostic data.
/// Shared by the sync and streaming decode paths.
pub const MAX_CHUNK_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Failure modes of [`inflate`], mapped onto chunk-offset-bearing
/// [`DecodeError`](crate::error::DecodeError) variants by the caller.
#[derive(Debug, thiserror::Error)]
pub enum InflateError {
    /// The zlib stream could not be decoded.
    #[error("{0}")]
    Failed(String),

    /// Output exceeded `max_size`. Inflation stops at the cap, so
    /// `actual` is a lower bound on the true decompressed size.
    #[error("decompressed size {actual} exceeds limit {limit}")]
    TooLarge { actual: usize, limit: usize },
}

/// Inflate a zlib-compressed chunk payload.
///
/// The output is bounded by `max_size`: the decoder reads at most
/// `max_size + 1` bytes of output and fails rather than continuing, so
/// a decompression bomb costs at most the cap in memory.
///
/// # Errors
///
/// - [`InflateError::Failed`] if the input is not a valid zlib stream
///   (bad header, corrupt data, truncated stream).
/// - [`InflateError::TooLarge`] if the output exceeds `max_size`.
pub fn inflate(data: &[u8], max_size: usize) -> Result<Vec<u8>, InflateError> {
    let mut decoder = ZlibDecoder::new(data).take(max_size as u64 + 1);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| InflateError::Failed(e.to_string()))?;
    if out.len() > max_size {
        return Err(InflateError::TooLarge {
            actual: out.len(),
            limit: max_size,
        });
    }
    Ok(out)
}
