/// Implementation of `ftdc stats`.
///
/// Walks the envelope layer for byte totals, then runs a full decode
/// for record totals and the capture time span, and prints a formatted
/// report (or one JSON object with `--json`).
///
/// # Example output
///
/// ```text
/// File:       metrics.2021-03-15T03-01-48Z-00000  (48211234 bytes)
/// Envelopes:  34 total (1 metadata, 33 metrics)
/// Chunks:     33 sample batches
/// Records:    9873 total, 321 metrics each
///
/// Bytes:
///   compressed     6034812
///   decompressed  50122480  (8.3x)
///
/// Capture span: 1615774918012 → 1615784818012 (9900000 ms)
/// ```
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ftdc_bson::MIN_DOCUMENT_LEN;
use ftdc_decoder::{Envelope, MAX_CHUNK_DECOMPRESSED_SIZE, decode_archive, decompression};
use serde::Serialize;

use crate::StatsArgs;

/// Aggregate report for one archive. Serialized directly for `--json`.
#[derive(Serialize)]
struct StatsReport {
    file: String,
    file_bytes: usize,
    envelopes: usize,
    metadata_envelopes: usize,
    metrics_envelopes: usize,
    batches: usize,
    records: usize,
    metrics: usize,
    compressed_bytes: usize,
    decompressed_bytes: usize,
    first_capture_id: Option<i64>,
    last_capture_id: Option<i64>,
}

/// Run the `ftdc stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any chunk fails to
/// decode or decompress.
pub fn run(args: &StatsArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let report = build_report(&args.file, &bytes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Aggregate one archive's statistics into a [`StatsReport`].
fn build_report(file: &Path, bytes: &[u8]) -> Result<StatsReport> {
    // ── Envelope walk: counts and byte totals ─────────────────────────────────

    let mut envelopes = 0usize;
    let mut metadata_envelopes = 0usize;
    let mut compressed_bytes = 0usize;
    let mut decompressed_bytes = 0usize;

    let mut offset = 0usize;
    while offset < bytes.len() {
        let remaining = &bytes[offset..];
        if remaining.len() < 4 {
            bail!("truncated length prefix at offset {offset}");
        }
        let size = u32::from_le_bytes(remaining[..4].try_into().expect("4 bytes")) as usize;
        if size < MIN_DOCUMENT_LEN || size > remaining.len() {
            bail!("envelope at offset {offset} declares {size} bytes, {} remain", remaining.len());
        }

        let envelope = Envelope::decode(&remaining[..size], offset)
            .with_context(|| format!("failed to decode {}", file.display()))?;

        envelopes += 1;
        if envelope.is_metadata() {
            metadata_envelopes += 1;
        } else {
            compressed_bytes += envelope.data.len();
            let block = decompression::inflate(&envelope.data, MAX_CHUNK_DECOMPRESSED_SIZE)
                .with_context(|| format!("failed to inflate chunk at offset {offset}"))?;
            decompressed_bytes += block.len();
        }
        offset += size;
    }

    // ── Full decode: records and capture span ─────────────────────────────────

    let mut batches = 0usize;
    let mut records = 0usize;
    let mut metrics = 0usize;
    let mut first_capture_id = None;
    let mut last_capture_id = None;

    for result in decode_archive(bytes) {
        let batch =
            result.with_context(|| format!("failed to decode {}", file.display()))?;
        batches += 1;
        records += batch.records.len();
        metrics = metrics.max(batch.num_metrics());
        if first_capture_id.is_none() {
            first_capture_id = batch.capture_id;
        }
        last_capture_id = batch.capture_id.or(last_capture_id);
    }

    Ok(StatsReport {
        file: file.display().to_string(),
        file_bytes: bytes.len(),
        envelopes,
        metadata_envelopes,
        metrics_envelopes: envelopes - metadata_envelopes,
        batches,
        records,
        metrics,
        compressed_bytes,
        decompressed_bytes,
        first_capture_id,
        last_capture_id,
    })
}

// ── Formatting ────────────────────────────────────────────────────────────────

#[allow(clippy::cast_precision_loss)]
fn print_report(r: &StatsReport) {
    println!("File:       {}  ({} bytes)", r.file, r.file_bytes);
    println!(
        "Envelopes:  {} total ({} metadata, {} metrics)",
        r.envelopes, r.metadata_envelopes, r.metrics_envelopes
    );
    println!(
        "Chunks:     {} sample batch{}",
        r.batches,
        if r.batches == 1 { "" } else { "es" }
    );
    println!("Records:    {} total, {} metrics each", r.records, r.metrics);

    println!();
    println!("Bytes:");
    let ratio = if r.compressed_bytes == 0 {
        String::new()
    } else {
        format!(
            "  ({:.1}x)",
            r.decompressed_bytes as f64 / r.compressed_bytes as f64
        )
    };
    println!("  compressed   {:>12}", r.compressed_bytes);
    println!("  decompressed {:>12}{ratio}", r.decompressed_bytes);

    if let (Some(first), Some(last)) = (r.first_capture_id, r.last_capture_id) {
        println!();
        println!("Capture span: {first} → {last} ({} ms)", last - first);
    }
}
