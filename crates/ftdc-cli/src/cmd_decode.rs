/// Implementation of `ftdc decode`.
///
/// Decodes the archive and writes sample records as JSON Lines: one
/// JSON object per record, keys in capture order (the same order the
/// reference document listed them). Output goes to stdout unless
/// `-o <file>` is given.
///
/// # Output shape
///
/// ```text
/// {"start":1615774908012,"serverStatus.opcounters.insert":512,...}
/// {"start":1615774909012,"serverStatus.opcounters.insert":518,...}
/// ```
///
/// With `--metadata`, each batch is preceded by a header object:
///
/// ```text
/// {"batch":{"offset":6912,"capture_id":1615774918012,"metrics":321,"records":300}}
/// ```
///
/// # Filtering
///
/// `--include a.b,c` keeps only metrics whose dot-joined key starts
/// with one of the listed prefixes; `--limit N` stops after N records
/// (batch decoding stops early too, so a limit on a huge archive is
/// cheap).
use std::fs;
use std::io::{self, BufWriter, Write as _};

use anyhow::{Context, Result};
use ftdc_decoder::{SampleRecord, decode_archive};
use serde_json::{Map, Value, json};

use crate::DecodeArgs;

/// Run the `ftdc decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any chunk fails to
/// decode, or output cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let prefixes: Vec<String> = args
        .include
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let mut out: BufWriter<Box<dyn io::Write>> = BufWriter::new(match &args.output {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("cannot write {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    });

    let mut emitted = 0usize;

    'outer: for result in decode_archive(&bytes) {
        let batch =
            result.with_context(|| format!("failed to decode {}", args.file.display()))?;

        // Check before the batch header too, or the limit could leave a
        // trailing header with no records under it.
        if let Some(limit) = args.limit
            && emitted >= limit
        {
            break 'outer;
        }

        if args.metadata {
            let header = json!({
                "batch": {
                    "offset": batch.offset,
                    "capture_id": batch.capture_id,
                    "metrics": batch.num_metrics(),
                    "records": batch.records.len(),
                }
            });
            writeln!(out, "{header}").context("cannot write output")?;
        }

        for record in &batch.records {
            if let Some(limit) = args.limit
                && emitted >= limit
            {
                break 'outer;
            }
            let line = record_json(record, &prefixes);
            writeln!(out, "{line}").context("cannot write output")?;
            emitted += 1;
        }
    }

    out.flush().context("cannot write output")?;
    Ok(())
}

/// Build one record's JSON object, applying the prefix filter.
///
/// Key order follows the record's schema order; `preserve_order` on
/// `serde_json` keeps the map from re-sorting it.
fn record_json(record: &SampleRecord, prefixes: &[String]) -> Value {
    let map: Map<String, Value> = record
        .iter()
        .filter(|(key, _)| {
            prefixes.is_empty() || prefixes.iter().any(|p| key.starts_with(p.as_str()))
        })
        .map(|(key, value)| (key.to_owned(), Value::from(value)))
        .collect();
    Value::Object(map)
}
