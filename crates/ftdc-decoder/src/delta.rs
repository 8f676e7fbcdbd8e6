use ftdc_wire::{ByteReader, WireError};

/// Upper bound on the metric slots (`numMetrics * numSamples`) a single
/// chunk may declare.
///
/// Zero runs supply slots without consuming input bytes, so the slot
/// count is bounded by the chunk header alone, not by the payload size.
/// 32 Mi slots keeps the delta and value buffers at 256 MiB each, in
/// line with [`MAX_CHUNK_DECOMPRESSED_SIZE`].
///
/// [`MAX_CHUNK_DECOMPRESSED_SIZE`]: crate::decompression::MAX_CHUNK_DECOMPRESSED_SIZE
pub const MAX_SAMPLE_SLOTS: usize = 32 * 1024 * 1024;

/// Decode the zero-run-compressed delta stream into one delta per slot.
///
/// The stream is metric-major: all `num_samples` deltas for metric 0,
/// then metric 1, and so on. A zero varint is followed by a run-length
/// varint saying how many further slots are zero without any more
/// bytes; runs may cross metric boundaries.
///
/// Decoding is demand-driven: exactly `num_metrics * num_samples` slots
/// are filled, then the stream stops being read. Surplus trailing bytes
/// are ignored, and a zero run extending past the final slot is
/// discarded. Running out of bytes mid-fill is an error. The caller
/// bounds the slot count; the chunk pipeline rejects headers declaring
/// more than [`MAX_SAMPLE_SLOTS`] before decoding starts.
///
/// Deltas are raw varint values; negative deltas arrive as
/// two's-complement `u64`s and are reinterpreted during
/// [`integrate`].
///
/// # Errors
///
/// [`WireError::OutOfBounds`] if the input ends before every slot has a
/// delta.
pub fn decode_deltas(
    r: &mut ByteReader<'_>,
    num_metrics: usize,
    num_samples: usize,
) -> Result<Vec<u64>, WireError> {
    let total = num_metrics.saturating_mul(num_samples);
    let mut deltas = Vec::with_capacity(total.min(1 << 20));
    let mut zero_run: u64 = 0;

    while deltas.len() < total {
        if zero_run > 0 {
            deltas.push(0);
            zero_run -= 1;
            continue;
        }
        let value = r.varint()?;
        deltas.push(value);
        if value == 0 {
            zero_run = r.varint()?;
        }
    }

    Ok(deltas)
}

/// Integrate per-slot deltas into absolute values.
///
/// For metric `i`, slot 0 is `base[i] + delta[0]` and each later slot
/// adds its delta to the previous slot's value. The accumulator resets
/// at every metric boundary. Arithmetic is wrapping: the encoder emits
/// negative deltas as two's-complement `u64`s, and wrapping addition is
/// the exact inverse of that encoding.
///
/// Output stays metric-major with `deltas.len()` entries.
///
/// # Panics
///
/// Panics if `deltas.len() != bases.len() * num_samples` — the caller
/// validates both counts before decoding the stream.
#[must_use]
pub fn integrate(deltas: &[u64], bases: &[i64], num_samples: usize) -> Vec<i64> {
    assert_eq!(deltas.len(), bases.len() * num_samples);

    let mut values = Vec::with_capacity(deltas.len());
    for (i, &base) in bases.iter().enumerate() {
        let mut acc = base;
        for &delta in &deltas[i * num_samples..(i + 1) * num_samples] {
            #[allow(clippy::cast_possible_wrap)]
            let delta = delta as i64;
            acc = acc.wrapping_add(delta);
            values.push(acc);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use ftdc_wire::encode_varint;

    use super::*;

    fn varints(values: &[u64]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = [0u8; 10];
        for &v in values {
            let n = encode_varint(v, &mut buf);
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn plain_deltas_fill_in_order() {
        let bytes = varints(&[5, 7, 9]);
        let mut r = ByteReader::new(&bytes);
        let deltas = decode_deltas(&mut r, 1, 3).unwrap();
        assert_eq!(deltas, [5, 7, 9]);
        assert!(r.is_empty());
    }

    #[test]
    fn zero_run_expands_without_consuming_bytes() {
        // varint(0) + runLength 3 covers four slots, then an explicit 5.
        let bytes = varints(&[0, 3, 5]);
        let mut r = ByteReader::new(&bytes);
        let deltas = decode_deltas(&mut r, 1, 5).unwrap();
        assert_eq!(deltas, [0, 0, 0, 0, 5]);
    }

    #[test]
    fn zero_run_crosses_metric_boundary() {
        // Metric 0: [1, 0, 0]; the run continues into metric 1: [0, 0, 2].
        let bytes = varints(&[1, 0, 3, 2]);
        let mut r = ByteReader::new(&bytes);
        let deltas = decode_deltas(&mut r, 2, 3).unwrap();
        assert_eq!(deltas, [1, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn zero_run_past_final_slot_is_discarded() {
        let bytes = varints(&[0, 1_000]);
        let mut r = ByteReader::new(&bytes);
        let deltas = decode_deltas(&mut r, 1, 2).unwrap();
        assert_eq!(deltas, [0, 0]);
    }

    #[test]
    fn surplus_trailing_bytes_are_left_unread() {
        let bytes = varints(&[4, 99, 98]);
        let mut r = ByteReader::new(&bytes);
        let deltas = decode_deltas(&mut r, 1, 1).unwrap();
        assert_eq!(deltas, [4]);
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn starved_stream_is_out_of_bounds() {
        let bytes = varints(&[1, 2]);
        let mut r = ByteReader::new(&bytes);
        let err = decode_deltas(&mut r, 2, 2).unwrap_err();
        assert!(matches!(err, WireError::OutOfBounds { .. }));
    }

    #[test]
    fn zero_slots_need_no_bytes() {
        let mut r = ByteReader::new(&[]);
        assert_eq!(decode_deltas(&mut r, 0, 5).unwrap(), []);
        assert_eq!(decode_deltas(&mut r, 3, 0).unwrap(), []);
    }

    #[test]
    fn integration_accumulates_per_metric() {
        let deltas = [1, 2, 3, 10, 0, 5];
        let values = integrate(&deltas, &[100, 200], 3);
        assert_eq!(values, [101, 103, 106, 210, 210, 215]);
    }

    #[test]
    fn integration_resets_at_metric_boundary() {
        // If the accumulator carried across, metric 1 would start at 16.
        let values = integrate(&[5, 10, 0, 0], &[0, 0], 2);
        assert_eq!(values, [5, 15, 0, 0]);
    }

    #[test]
    fn negative_deltas_wrap_correctly() {
        #[allow(clippy::cast_sign_loss)]
        let deltas = [(-3i64) as u64, (-2i64) as u64];
        let values = integrate(&deltas, &[10], 2);
        assert_eq!(values, [7, 5]);
    }
}
