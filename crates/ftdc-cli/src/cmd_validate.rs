/// Implementation of `ftdc validate`.
///
/// Runs a complete decode of every chunk and reports either a series
/// of success checkmarks (`✓`) or a diagnostic failure line (`✗`).
/// The main dispatcher converts `Err` into exit code 1.
///
/// # Success output
///
/// ```text
/// ✓ Envelopes: 34 chunks walked (1 metadata, 33 metrics)
/// ✓ Chunks: 33 sample batches decoded
/// ✓ Records: 9873 records across 321 metrics
/// ✓ Integrity: all delta streams integrate without error
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: chunk at offset 190113 declares 321 metrics, reference document has 319
/// ```
use std::fs;

use anyhow::{Context, Result, anyhow};
use ftdc_decoder::decode_archive;

use crate::ValidateArgs;

/// Run the `ftdc validate` command.
///
/// Prints a validation report to stdout and returns `Ok(())` on
/// success. On any decode error, prints a `✗` diagnostic and returns
/// `Err`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if any chunk fails
/// to decode.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let mut batches = 0usize;
    let mut records = 0usize;
    let mut metrics = 0usize;

    let mut decoder = decode_archive(&bytes);
    for result in decoder.by_ref() {
        match result {
            Ok(batch) => {
                batches += 1;
                records += batch.records.len();
                metrics = metrics.max(batch.num_metrics());
            }
            Err(e) => {
                println!("✗ Error: {e}");
                return Err(anyhow!("validation failed"));
            }
        }
    }

    // The iterator ran to the end, so the walker consumed every byte.
    println!(
        "✓ Envelopes: archive walked to end of file ({} bytes)",
        decoder.position()
    );
    println!(
        "✓ Chunks: {batches} sample batch{} decoded",
        if batches == 1 { "" } else { "es" }
    );
    println!("✓ Records: {records} records across {metrics} metrics");
    println!("✓ Integrity: all delta streams integrate without error");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ftdc_tests::fixture;

    use super::*;
    use crate::ValidateArgs;

    fn temp_archive(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ftdc-cli-{}-{name}", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn well_formed_archive_validates() {
        let archive = fixture::archive(&[
            fixture::metadata_envelope(1_000),
            fixture::metrics_envelope(2_000, &[("a", 1), ("b", 2)], &[vec![1, 1], vec![0, 5]]),
        ]);
        let file = temp_archive("validate-ok.ftdc", &archive);

        assert!(run(&ValidateArgs { file: file.clone() }).is_ok());

        fs::remove_file(file).unwrap();
    }

    #[test]
    fn truncated_archive_fails_validation() {
        let mut archive =
            fixture::archive(&[fixture::metrics_envelope(2_000, &[("a", 1)], &[vec![1]])]);
        archive.truncate(archive.len() - 8);
        let file = temp_archive("validate-bad.ftdc", &archive);

        assert!(run(&ValidateArgs { file: file.clone() }).is_err());

        fs::remove_file(file).unwrap();
    }
}
