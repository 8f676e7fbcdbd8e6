/// Implementation of `ftdc inspect`.
///
/// Walks the archive's envelope layer and prints one table row per
/// chunk. Payloads are never decompressed, so this is cheap even when
/// `ftdc decode` on the same file would take a while.
///
/// # Output format
///
/// ```text
/// Archive: metrics.2021-03-15T03-01-48Z-00000  (48211234 bytes)
///
/// Idx      Offset    Length  Type  Capture id       Compressed
/// ────────────────────────────────────────────────────────────
///   0           0      6912  meta  1615774908012             0
///   1        6912    183201  data  1615774918012        182834
///   2      190113    184007  data  1615775218012        183640
/// ────────────────────────────────────────────────────────────
/// 3 envelopes (1 metadata, 2 metrics)
/// ```
use std::fs;

use anyhow::{Context, Result, bail};
use ftdc_bson::MIN_DOCUMENT_LEN;
use ftdc_decoder::Envelope;

use crate::InspectArgs;

/// Run the `ftdc inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any envelope fails
/// structural validation (the walk stops at the first bad envelope).
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    println!(
        "Archive: {}  ({} bytes)",
        args.file.display(),
        bytes.len()
    );
    println!();

    let sep = "─".repeat(60);
    println!(
        "{:>3}  {:>10}  {:>8}  {:<4}  {:<15}  {:>10}",
        "Idx", "Offset", "Length", "Type", "Capture id", "Compressed"
    );
    println!("{sep}");

    let mut offset = 0usize;
    let mut index = 0usize;
    let mut metadata_count = 0usize;

    while offset < bytes.len() {
        if let Some(limit) = args.limit
            && index >= limit
        {
            break;
        }

        let remaining = &bytes[offset..];
        if remaining.len() < 4 {
            bail!("truncated length prefix at offset {offset}");
        }
        let size = u32::from_le_bytes(remaining[..4].try_into().expect("4 bytes")) as usize;
        if size < MIN_DOCUMENT_LEN || size > remaining.len() {
            bail!("envelope at offset {offset} declares {size} bytes, {} remain", remaining.len());
        }

        let envelope = Envelope::decode(&remaining[..size], offset)
            .with_context(|| format!("failed to decode {}", args.file.display()))?;

        let type_label = if envelope.is_metadata() { "meta" } else { "data" };
        let id = envelope
            .capture_id
            .map_or_else(|| "-".to_owned(), |ms| ms.to_string());

        println!(
            "{index:>3}  {offset:>10}  {size:>8}  {type_label:<4}  {id:<15}  {:>10}",
            envelope.data.len()
        );

        if envelope.is_metadata() {
            metadata_count += 1;
        }
        offset += size;
        index += 1;
    }

    println!("{sep}");
    println!(
        "{index} envelope{} ({metadata_count} metadata, {} metrics)",
        if index == 1 { "" } else { "s" },
        index - metadata_count
    );

    Ok(())
}
