use std::sync::Arc;

/// The decoded output of one metrics chunk: `numSamples` records plus
/// envelope metadata for diagnostics.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    /// Byte offset of the chunk's envelope from the start of the archive.
    pub offset: usize,

    /// The envelope's `_id` as epoch milliseconds, when present.
    pub capture_id: Option<i64>,

    /// Reconstructed records in original capture order.
    pub records: Vec<SampleRecord>,
}

impl SampleBatch {
    /// Number of metrics per record (0 for an empty batch).
    #[must_use]
    pub fn num_metrics(&self) -> usize {
        self.records.first().map_or(0, SampleRecord::len)
    }
}

/// One reconstructed sample: an ordered mapping of metric key to
/// absolute value.
///
/// Records in a batch share their key schema behind an `Arc` but each
/// owns its value storage, so a caller may keep any subset of records
/// and drop the rest.
#[derive(Debug, Clone)]
pub struct SampleRecord {
    keys: Arc<[String]>,
    values: Vec<i64>,
}

impl SampleRecord {
    /// Number of metrics in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `key`, if the schema contains it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i64> {
        let idx = self.keys.iter().position(|k| k == key)?;
        Some(self.values[idx])
    }

    /// Iterate `(key, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// The shared key schema, in column order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Map metric-major integrated values back onto per-sample records.
///
/// `values` holds `keys.len() * num_samples` entries; sample `s` of
/// metric `k` sits at `k * num_samples + s`. Each returned record owns
/// its own value vector.
///
/// # Panics
///
/// Panics if `values.len() != keys.len() * num_samples` — the delta
/// decoder guarantees the shape before this runs.
#[must_use]
pub fn reconstruct(keys: Arc<[String]>, values: &[i64], num_samples: usize) -> Vec<SampleRecord> {
    assert_eq!(values.len(), keys.len() * num_samples);

    (0..num_samples)
        .map(|s| SampleRecord {
            keys: Arc::clone(&keys),
            values: (0..keys.len())
                .map(|k| values[k * num_samples + s])
                .collect(),
        })
        .collect()
}
