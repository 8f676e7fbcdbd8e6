//! Programmatic FTDC archive builder.
//!
//! Builds byte-exact archives from declarative descriptions:
//!
//! ```text
//!   archive = concat(envelopes)
//!   envelope = BSON { _id: Date, type: Int32, data: Binary }
//!   binary   = [u32 uncompressed size][zlib payload]
//!   payload  = [reference document][u32 numMetrics][u32 numSamples][deltas]
//! ```
//!
//! The delta encoder applies the same zero-run compression the decoder
//! undoes: a zero slot becomes `varint(0), varint(runLength)` covering
//! `1 + runLength` zero slots.

use std::io::Write as _;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use ftdc_wire::encode_varint;

/// A BSON value the fixture writer can encode.
///
/// Covers the types the decoder's cleaning rules distinguish, plus
/// containers and Binary for envelope construction.
#[derive(Debug, Clone)]
pub enum Val {
    F64(f64),
    Str(String),
    Doc(Vec<(String, Val)>),
    Arr(Vec<Val>),
    Binary { subtype: u8, data: Vec<u8> },
    Bool(bool),
    Date(i64),
    Null,
    I32(i32),
    Timestamp { seconds: u32, increment: u32 },
    I64(i64),
}

/// Encode an ordered list of entries as one BSON document.
#[must_use]
pub fn document(entries: &[(&str, Val)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (key, value) in entries {
        write_element(&mut body, key, value);
    }
    frame_document(&body)
}

fn frame_document(body: &[u8]) -> Vec<u8> {
    let total = i32::try_from(body.len() + 5).expect("fixture document fits in i32");
    let mut out = total.to_le_bytes().to_vec();
    out.extend_from_slice(body);
    out.push(0);
    out
}

fn write_element(out: &mut Vec<u8>, key: &str, value: &Val) {
    let tag: u8 = match value {
        Val::F64(_) => 0x01,
        Val::Str(_) => 0x02,
        Val::Doc(_) => 0x03,
        Val::Arr(_) => 0x04,
        Val::Binary { .. } => 0x05,
        Val::Bool(_) => 0x08,
        Val::Date(_) => 0x09,
        Val::Null => 0x0A,
        Val::I32(_) => 0x10,
        Val::Timestamp { .. } => 0x11,
        Val::I64(_) => 0x12,
    };
    out.push(tag);
    out.extend_from_slice(key.as_bytes());
    out.push(0);

    match value {
        Val::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Val::Str(s) => {
            let len = i32::try_from(s.len() + 1).expect("fixture string fits in i32");
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        Val::Doc(entries) => {
            let mut body = Vec::new();
            for (k, v) in entries {
                write_element(&mut body, k, v);
            }
            out.extend_from_slice(&frame_document(&body));
        }
        Val::Arr(items) => {
            let mut body = Vec::new();
            for (i, v) in items.iter().enumerate() {
                write_element(&mut body, &i.to_string(), v);
            }
            out.extend_from_slice(&frame_document(&body));
        }
        Val::Binary { subtype, data } => {
            let len = i32::try_from(data.len()).expect("fixture binary fits in i32");
            out.extend_from_slice(&len.to_le_bytes());
            out.push(*subtype);
            out.extend_from_slice(data);
        }
        Val::Bool(v) => out.push(u8::from(*v)),
        Val::Date(ms) => out.extend_from_slice(&ms.to_le_bytes()),
        Val::Null => {}
        Val::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Val::Timestamp { seconds, increment } => {
            // Wire order: increment first, then seconds.
            out.extend_from_slice(&increment.to_le_bytes());
            out.extend_from_slice(&seconds.to_le_bytes());
        }
        Val::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
    }
}

/// Zlib-compress a byte slice at the default level.
#[must_use]
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).expect("in-memory write");
    enc.finish().expect("in-memory finish")
}

/// Encode a metric-major delta stream with zero-run compression.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn encode_delta_stream(deltas: &[i64]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 10];
    let mut i = 0;
    while i < deltas.len() {
        let n = encode_varint(deltas[i] as u64, &mut buf);
        out.extend_from_slice(&buf[..n]);
        if deltas[i] == 0 {
            let run = deltas[i + 1..].iter().take_while(|&&d| d == 0).count();
            let n = encode_varint(run as u64, &mut buf);
            out.extend_from_slice(&buf[..n]);
            i += run;
        }
        i += 1;
    }
    out
}

/// Assemble the uncompressed chunk payload.
#[must_use]
pub fn metrics_payload(
    ref_doc: &[u8],
    num_metrics: u32,
    num_samples: u32,
    delta_bytes: &[u8],
) -> Vec<u8> {
    let mut out = ref_doc.to_vec();
    out.extend_from_slice(&num_metrics.to_le_bytes());
    out.extend_from_slice(&num_samples.to_le_bytes());
    out.extend_from_slice(delta_bytes);
    out
}

/// Wrap an uncompressed payload in a metrics envelope: compress it,
/// prefix the uncompressed size, and frame the envelope document.
#[must_use]
pub fn envelope_from_payload(id_ms: i64, payload: &[u8]) -> Vec<u8> {
    let mut binary =
        u32::try_from(payload.len()).expect("payload fits in u32").to_le_bytes().to_vec();
    binary.extend_from_slice(&deflate(payload));
    document(&[
        ("_id", Val::Date(id_ms)),
        ("type", Val::I32(1)),
        (
            "data",
            Val::Binary {
                subtype: 0,
                data: binary,
            },
        ),
    ])
}

/// Build a metrics envelope from a flat reference schema and per-metric
/// delta sequences.
///
/// `reference` supplies (key, base value) pairs encoded as Int64
/// leaves; `deltas[i]` holds metric `i`'s per-sample deltas, all the
/// same length.
///
/// # Panics
///
/// Panics if the delta sequences disagree on sample count.
#[must_use]
pub fn metrics_envelope(id_ms: i64, reference: &[(&str, i64)], deltas: &[Vec<i64>]) -> Vec<u8> {
    assert_eq!(reference.len(), deltas.len());
    let num_samples = deltas.first().map_or(0, Vec::len);
    assert!(deltas.iter().all(|d| d.len() == num_samples));

    let entries: Vec<(&str, Val)> = reference
        .iter()
        .map(|&(key, base)| (key, Val::I64(base)))
        .collect();
    let ref_doc = document(&entries);

    let flat: Vec<i64> = deltas.iter().flatten().copied().collect();
    let payload = metrics_payload(
        &ref_doc,
        u32::try_from(reference.len()).expect("metric count fits in u32"),
        u32::try_from(num_samples).expect("sample count fits in u32"),
        &encode_delta_stream(&flat),
    );
    envelope_from_payload(id_ms, &payload)
}

/// Build a metadata-only envelope (`type` 0, no metrics block).
#[must_use]
pub fn metadata_envelope(id_ms: i64) -> Vec<u8> {
    document(&[
        ("_id", Val::Date(id_ms)),
        ("type", Val::I32(0)),
        (
            "doc",
            Val::Doc(vec![
                ("hostInfo".to_owned(), Val::Str("db-0:27017".to_owned())),
                ("version".to_owned(), Val::Str("4.4.4".to_owned())),
            ]),
        ),
    ])
}

/// Concatenate envelopes into an archive.
#[must_use]
pub fn archive(envelopes: &[Vec<u8>]) -> Vec<u8> {
    envelopes.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_framing_is_sized_and_terminated() {
        let doc = document(&[("a", Val::I32(1))]);
        let declared = u32::from_le_bytes(doc[..4].try_into().unwrap()) as usize;
        assert_eq!(declared, doc.len());
        assert_eq!(doc.last(), Some(&0));
    }

    #[test]
    fn empty_document_is_five_bytes() {
        assert_eq!(document(&[]), [5, 0, 0, 0, 0]);
    }

    #[test]
    fn delta_stream_compresses_zero_runs() {
        // [0, 0, 0, 0, 5] → varint(0), varint(3), varint(5)
        let bytes = encode_delta_stream(&[0, 0, 0, 0, 5]);
        assert_eq!(bytes, [0x00, 0x03, 0x05]);
    }

    #[test]
    fn lone_zero_gets_zero_run_length() {
        let bytes = encode_delta_stream(&[1, 0, 2]);
        assert_eq!(bytes, [0x01, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn negative_deltas_encode_as_twos_complement() {
        let bytes = encode_delta_stream(&[-1]);
        // u64::MAX is the 10-byte varint ceiling.
        assert_eq!(bytes, hex::decode("ffffffffffffffffff01").unwrap());
    }
}
