use ftdc_wire::{ByteReader, WireError};

use crate::error::BsonError;
use crate::value::{BsonValue, Document};

/// BSON element tag bytes, as they appear on the wire.
///
/// The deprecated and unsupported tags are listed so the decoder can
/// consume their payloads; they never surface as values.
pub mod tag {
    pub const END: u8 = 0x00;
    pub const DOUBLE: u8 = 0x01;
    pub const STRING: u8 = 0x02;
    pub const DOCUMENT: u8 = 0x03;
    pub const ARRAY: u8 = 0x04;
    pub const BINARY: u8 = 0x05;
    pub const UNDEFINED: u8 = 0x06;
    pub const OBJECT_ID: u8 = 0x07;
    pub const BOOLEAN: u8 = 0x08;
    pub const DATE_TIME: u8 = 0x09;
    pub const NULL: u8 = 0x0A;
    pub const REGEX: u8 = 0x0B;
    pub const DB_POINTER: u8 = 0x0C;
    pub const CODE: u8 = 0x0D;
    pub const SYMBOL: u8 = 0x0E;
    pub const CODE_WITH_SCOPE: u8 = 0x0F;
    pub const INT32: u8 = 0x10;
    pub const TIMESTAMP: u8 = 0x11;
    pub const INT64: u8 = 0x12;
    pub const DECIMAL128: u8 = 0x13;
    pub const MIN_KEY: u8 = 0xFF;
    pub const MAX_KEY: u8 = 0x7F;
}

/// Smallest legal document: a 4-byte size field plus the terminator.
pub const MIN_DOCUMENT_LEN: usize = 5;

/// How [`decode_document`] treats the two FTDC-special element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Full decode of every supported element.
    Standard,
    /// Chunk-envelope mode. Binary elements stop the decode and return
    /// the document built so far with the compressed metrics payload
    /// substituted in; Timestamp elements split into `<key>_t` /
    /// `<key>_i` integer entries.
    Ftdc,
}

/// One container under construction.
///
/// `keyed` mirrors the container classification rule: documents parse
/// element names, arrays discard the encoded positional names. An empty
/// document nested directly in an array keeps the array's unkeyed
/// classification (its size is at the minimum, so no element ever
/// consults the flag on well-formed input).
struct Frame {
    node: Node,
    end: usize,
    keyed: bool,
    key: String,
}

enum Node {
    Doc(Document),
    Arr(Vec<BsonValue>),
}

impl Frame {
    fn insert(&mut self, key: String, value: BsonValue) {
        match &mut self.node {
            Node::Doc(doc) => doc.insert(key, value),
            Node::Arr(items) => items.push(value),
        }
    }
}

/// Fold a finished container back into its parent frame.
fn attach(mut parent: Frame, child: Frame) -> Frame {
    let value = match child.node {
        Node::Doc(doc) => BsonValue::Document(doc),
        Node::Arr(items) => BsonValue::Array(items),
    };
    parent.insert(child.key, value);
    parent
}

/// Collapse the whole frame stack and return the root document.
fn unwind(mut stack: Vec<Frame>, mut current: Frame) -> Document {
    while let Some(parent) = stack.pop() {
        current = attach(parent, current);
    }
    match current.node {
        Node::Doc(doc) => doc,
        // The root frame is always constructed as a document.
        Node::Arr(_) => Document::new(),
    }
}

/// Validate the container header whose size field sits at `start` and
/// return the container's end offset.
fn container_end(buf: &[u8], start: usize, size: i32) -> Result<usize, BsonError> {
    if size < 5 {
        return Err(BsonError::InvalidSize { size });
    }
    let size = usize::try_from(size).map_err(|_| BsonError::InvalidSize { size })?;
    let end = start.checked_add(size).ok_or(WireError::OutOfBounds {
        offset: start,
        needed: size,
        available: buf.len() - start,
    })?;
    if end > buf.len() {
        return Err(WireError::OutOfBounds {
            offset: start,
            needed: size,
            available: buf.len() - start,
        }
        .into());
    }
    match buf[end - 1] {
        0 => Ok(end),
        found => Err(BsonError::InvalidTerminator { found }),
    }
}

/// Decode one BSON document from the start of `buf`.
///
/// ```text
///   ┌───────────┬─────────────────────────────────────────┬──────┐
///   │ i32 size  │ elements: [tag][name NUL][payload] ...   │ 0x00 │
///   └───────────┴─────────────────────────────────────────┴──────┘
/// ```
///
/// Nesting is handled with an explicit stack of container frames
/// rather than recursion, so depth is bounded only by the input size.
/// Decoding ends when the cursor reaches the root document's declared
/// end, or early via the FTDC Binary short-circuit (see
/// [`DecodeMode::Ftdc`]).
///
/// Element names and string values are decoded lossily: invalid UTF-8
/// becomes U+FFFD. An unknown element tag consumes only its tag and
/// name; any payload bytes it carried keep being read as further
/// elements until the enclosing container's end, which can surface
/// spurious entries or fail a bounds check along the way. Bytes past
/// the root document's declared size are ignored.
///
/// # Errors
///
/// - [`BsonError::InvalidSize`] for a container size below 5 bytes.
/// - [`BsonError::InvalidTerminator`] when a container's last declared
///   byte is not 0x00.
/// - [`BsonError::Wire`] when any element payload or container size
///   overruns the available bytes.
#[allow(clippy::too_many_lines)]
pub fn decode_document(buf: &[u8], mode: DecodeMode) -> Result<Document, BsonError> {
    let mut r = ByteReader::new(buf);
    let size = r.i32_le()?;
    let root_end = container_end(buf, 0, size)?;

    let mut stack: Vec<Frame> = Vec::new();
    let mut current = Frame {
        node: Node::Doc(Document::new()),
        end: root_end,
        keyed: true,
        key: String::new(),
    };

    loop {
        // Pop every container whose declared extent we've passed.
        if r.position() >= current.end {
            match stack.pop() {
                Some(parent) => {
                    current = attach(parent, current);
                    continue;
                }
                None => break,
            }
        }

        let tag = r.u8()?;
        if tag == tag::END {
            continue;
        }

        let raw_key = r.cstring()?;
        let key = if current.keyed {
            String::from_utf8_lossy(raw_key).into_owned()
        } else {
            // Array positional names are discarded; values append in order.
            String::new()
        };

        let value = match tag {
            tag::DOUBLE => Some(BsonValue::Double(r.f64_le()?)),

            tag::STRING => {
                let len = r.i32_le()?;
                let raw = r.bytes(usize::try_from(len).unwrap_or(0))?;
                let text = match raw.split_last() {
                    Some((&0, head)) => String::from_utf8_lossy(head),
                    _ => String::from_utf8_lossy(raw),
                };
                Some(BsonValue::String(text.into_owned()))
            }

            tag::DOCUMENT | tag::ARRAY => {
                let start = r.position();
                let size = r.i32_le()?;
                let end = container_end(buf, start, size)?;
                let (node, keyed) = if tag == tag::DOCUMENT {
                    let keyed = end - start != MIN_DOCUMENT_LEN || current.keyed;
                    (Node::Doc(Document::new()), keyed)
                } else {
                    (Node::Arr(Vec::new()), false)
                };
                stack.push(std::mem::replace(
                    &mut current,
                    Frame {
                        node,
                        end,
                        keyed,
                        key,
                    },
                ));
                continue;
            }

            tag::BINARY if mode == DecodeMode::Ftdc => {
                // Chunk envelopes carry the compressed metrics block as
                // their one Binary element. Hand back the raw deflate
                // stream: everything past the 4-byte length, the subtype
                // byte, and the 4-byte uncompressed-size prefix.
                let start = r.position();
                let declared = r.i32_le()?;
                let size = usize::try_from(declared).unwrap_or(0);
                if size < 4 || start + 5 + size > buf.len() {
                    return Err(WireError::OutOfBounds {
                        offset: start,
                        needed: size + 5,
                        available: buf.len() - start,
                    }
                    .into());
                }
                let subtype = buf[start + 4];
                let data = buf[start + 9..start + 5 + size].to_vec();
                current.insert(key, BsonValue::Binary { subtype, data });
                return Ok(unwind(stack, current));
            }

            tag::BINARY => {
                let len = r.i32_le()?;
                let subtype = r.u8()?;
                let data = r.bytes(usize::try_from(len).unwrap_or(0))?.to_vec();
                Some(BsonValue::Binary { subtype, data })
            }

            tag::OBJECT_ID => {
                let raw = r.bytes(12)?;
                let mut oid = [0u8; 12];
                oid.copy_from_slice(raw);
                Some(BsonValue::ObjectId(oid))
            }

            tag::BOOLEAN => Some(BsonValue::Boolean(r.u8()? != 0)),

            tag::DATE_TIME => Some(BsonValue::DateTime(r.i64_le()?)),

            tag::NULL => Some(BsonValue::Null),

            tag::INT32 => Some(BsonValue::Int32(r.i32_le()?)),

            tag::TIMESTAMP => {
                // Wire order is increment first, then seconds.
                let increment = r.u32_le()?;
                let seconds = r.u32_le()?;
                if mode == DecodeMode::Ftdc {
                    // The chunk pipeline flattens timestamps into two
                    // integer columns rather than one composite value.
                    current.insert(format!("{key}_t"), BsonValue::Int64(i64::from(seconds)));
                    current.insert(format!("{key}_i"), BsonValue::Int64(i64::from(increment)));
                    continue;
                }
                Some(BsonValue::Timestamp { seconds, increment })
            }

            tag::INT64 => Some(BsonValue::Int64(r.i64_le()?)),

            // Deprecated or unsupported: consume the payload, keep nothing.
            tag::REGEX => {
                r.cstring()?;
                r.cstring()?;
                None
            }
            tag::DB_POINTER => {
                let len = r.i32_le()?;
                r.skip(usize::try_from(len).unwrap_or(0))?;
                r.skip(12)?;
                None
            }
            tag::CODE | tag::SYMBOL => {
                let len = r.i32_le()?;
                r.skip(usize::try_from(len).unwrap_or(0))?;
                None
            }
            tag::CODE_WITH_SCOPE => {
                // Total size includes the 4 bytes just read.
                let total = r.i32_le()?;
                r.skip(usize::try_from(total).unwrap_or(0).saturating_sub(4))?;
                None
            }
            tag::DECIMAL128 => {
                r.skip(16)?;
                None
            }
            tag::UNDEFINED | tag::MIN_KEY | tag::MAX_KEY => None,

            // Unknown tag: length unknowable, so consume nothing
            // further. Any payload bytes get read as elements until the
            // frame boundary stops the walk.
            _ => None,
        };

        if let Some(value) = value {
            current.insert(key, value);
        }
    }

    Ok(unwind(stack, current))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Byte-building helpers ─────────────────────────────────────────────

    fn doc_bytes(elements: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = elements.concat();
        let total = i32::try_from(body.len() + MIN_DOCUMENT_LEN).unwrap();
        let mut out = total.to_le_bytes().to_vec();
        out.extend_from_slice(&body);
        out.push(0);
        out
    }

    fn elem(tag: u8, key: &str, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        out.extend_from_slice(key.as_bytes());
        out.push(0);
        out.extend_from_slice(payload);
        out
    }

    fn string_payload(s: &str) -> Vec<u8> {
        let mut out = i32::try_from(s.len() + 1).unwrap().to_le_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out.push(0);
        out
    }

    fn decode(buf: &[u8]) -> Document {
        decode_document(buf, DecodeMode::Standard).unwrap()
    }

    // ── Basic decoding ────────────────────────────────────────────────────

    #[test]
    fn minimal_document_decodes_in_order() {
        let buf = doc_bytes(&[
            elem(tag::DOUBLE, "a", &1.5f64.to_le_bytes()),
            elem(tag::STRING, "b", &string_payload("s")),
            elem(tag::BOOLEAN, "c", &[1]),
        ]);

        let doc = decode(&buf);
        let entries: Vec<(&str, &BsonValue)> = doc.iter().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ("a", &BsonValue::Double(1.5)));
        assert_eq!(entries[1], ("b", &BsonValue::String("s".into())));
        assert_eq!(entries[2], ("c", &BsonValue::Boolean(true)));
    }

    #[test]
    fn empty_document() {
        let buf = doc_bytes(&[]);
        assert_eq!(buf, [5, 0, 0, 0, 0]);
        assert!(decode(&buf).is_empty());
    }

    #[test]
    fn scalar_types_decode() {
        let buf = doc_bytes(&[
            elem(tag::INT32, "i", &(-40i32).to_le_bytes()),
            elem(tag::INT64, "l", &9_007_199_254_740_993i64.to_le_bytes()),
            elem(tag::DATE_TIME, "d", &1_615_774_908_000i64.to_le_bytes()),
            elem(tag::NULL, "n", &[]),
            elem(tag::OBJECT_ID, "o", &[7u8; 12]),
        ]);

        let doc = decode(&buf);
        assert_eq!(doc.get("i"), Some(&BsonValue::Int32(-40)));
        // Above 2^53: a float path would round this
        assert_eq!(doc.get("l"), Some(&BsonValue::Int64(9_007_199_254_740_993)));
        assert_eq!(doc.get("d"), Some(&BsonValue::DateTime(1_615_774_908_000)));
        assert_eq!(doc.get("n"), Some(&BsonValue::Null));
        assert_eq!(doc.get("o"), Some(&BsonValue::ObjectId([7u8; 12])));
    }

    #[test]
    fn binary_standard_mode_keeps_subtype_and_data() {
        let mut payload = 3i32.to_le_bytes().to_vec();
        payload.push(0x80); // subtype
        payload.extend_from_slice(&[1, 2, 3]);
        let buf = doc_bytes(&[elem(tag::BINARY, "bin", &payload)]);

        let doc = decode(&buf);
        assert_eq!(
            doc.get("bin"),
            Some(&BsonValue::Binary {
                subtype: 0x80,
                data: vec![1, 2, 3],
            })
        );
    }

    // ── Structural validation ─────────────────────────────────────────────

    #[test]
    fn size_below_minimum_is_invalid() {
        let buf = [4u8, 0, 0, 0, 0];
        let err = decode_document(&buf, DecodeMode::Standard).unwrap_err();
        assert!(matches!(err, BsonError::InvalidSize { size: 4 }));
    }

    #[test]
    fn negative_size_is_invalid() {
        let buf = (-1i32).to_le_bytes();
        let err = decode_document(&buf, DecodeMode::Standard).unwrap_err();
        assert!(matches!(err, BsonError::InvalidSize { size: -1 }));
    }

    #[test]
    fn missing_terminator_is_invalid() {
        let mut buf = doc_bytes(&[elem(tag::INT32, "i", &1i32.to_le_bytes())]);
        let last = buf.len() - 1;
        buf[last] = 0x42;
        let err = decode_document(&buf, DecodeMode::Standard).unwrap_err();
        assert!(matches!(err, BsonError::InvalidTerminator { found: 0x42 }));
    }

    #[test]
    fn declared_size_past_buffer_is_out_of_bounds() {
        let buf = [64u8, 0, 0, 0, 0];
        let err = decode_document(&buf, DecodeMode::Standard).unwrap_err();
        assert!(matches!(err, BsonError::Wire(WireError::OutOfBounds { .. })));
    }

    #[test]
    fn truncated_element_payload_is_out_of_bounds() {
        // Declared size covers the document, but the double's payload
        // would run past it and past the buffer.
        let mut buf = doc_bytes(&[elem(tag::DOUBLE, "a", &1.5f64.to_le_bytes())]);
        buf.truncate(10);
        buf[0] = 10;
        let result = decode_document(&buf, DecodeMode::Standard);
        assert!(matches!(result, Err(BsonError::Wire(_))));
    }

    // ── Nesting ───────────────────────────────────────────────────────────

    #[test]
    fn nested_document_and_array() {
        let inner = doc_bytes(&[elem(tag::INT32, "x", &1i32.to_le_bytes())]);
        let arr = doc_bytes(&[
            elem(tag::INT32, "0", &10i32.to_le_bytes()),
            elem(tag::INT32, "1", &11i32.to_le_bytes()),
        ]);
        let buf = doc_bytes(&[
            elem(tag::DOCUMENT, "outer", &inner),
            elem(tag::ARRAY, "arr", &arr),
            elem(tag::INT32, "after", &5i32.to_le_bytes()),
        ]);

        let doc = decode(&buf);
        let Some(BsonValue::Document(outer)) = doc.get("outer") else {
            panic!("outer should be a document");
        };
        assert_eq!(outer.get("x"), Some(&BsonValue::Int32(1)));
        assert_eq!(
            doc.get("arr"),
            Some(&BsonValue::Array(vec![
                BsonValue::Int32(10),
                BsonValue::Int32(11),
            ]))
        );
        assert_eq!(doc.get("after"), Some(&BsonValue::Int32(5)));
    }

    #[test]
    fn array_positional_names_are_ignored() {
        // Deliberately wrong positional names; order must win.
        let arr = doc_bytes(&[
            elem(tag::INT32, "9", &10i32.to_le_bytes()),
            elem(tag::INT32, "banana", &11i32.to_le_bytes()),
        ]);
        let buf = doc_bytes(&[elem(tag::ARRAY, "arr", &arr)]);

        let doc = decode(&buf);
        assert_eq!(
            doc.get("arr"),
            Some(&BsonValue::Array(vec![
                BsonValue::Int32(10),
                BsonValue::Int32(11),
            ]))
        );
    }

    #[test]
    fn empty_document_inside_array() {
        let empty = doc_bytes(&[]);
        let arr = doc_bytes(&[elem(tag::DOCUMENT, "0", &empty)]);
        let buf = doc_bytes(&[elem(tag::ARRAY, "arr", &arr)]);

        let doc = decode(&buf);
        assert_eq!(
            doc.get("arr"),
            Some(&BsonValue::Array(vec![BsonValue::Document(Document::new())]))
        );
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // 2000 nested documents: would overflow a recursive decoder's stack.
        let mut inner = doc_bytes(&[]);
        for _ in 0..2000 {
            inner = doc_bytes(&[elem(tag::DOCUMENT, "d", &inner)]);
        }
        let doc = decode(&inner);
        assert_eq!(doc.len(), 1);
    }

    // ── Skipped and unknown elements ──────────────────────────────────────

    #[test]
    fn deprecated_types_are_skipped_and_siblings_survive() {
        let mut regex_payload = b"pat".to_vec();
        regex_payload.push(0);
        regex_payload.extend_from_slice(b"i");
        regex_payload.push(0);

        let mut dbpointer_payload = string_payload("ns");
        dbpointer_payload.extend_from_slice(&[9u8; 12]);

        let mut cws_payload = Vec::new();
        let cws_code = string_payload("x");
        let cws_scope = doc_bytes(&[]);
        let cws_total = i32::try_from(4 + cws_code.len() + cws_scope.len()).unwrap();
        cws_payload.extend_from_slice(&cws_total.to_le_bytes());
        cws_payload.extend_from_slice(&cws_code);
        cws_payload.extend_from_slice(&cws_scope);

        let buf = doc_bytes(&[
            elem(tag::INT32, "before", &1i32.to_le_bytes()),
            elem(tag::REGEX, "re", &regex_payload),
            elem(tag::DB_POINTER, "dbp", &dbpointer_payload),
            elem(tag::CODE, "code", &string_payload("f()")),
            elem(tag::SYMBOL, "sym", &string_payload("s")),
            elem(tag::CODE_WITH_SCOPE, "cws", &cws_payload),
            elem(tag::DECIMAL128, "dec", &[0u8; 16]),
            elem(tag::UNDEFINED, "undef", &[]),
            elem(tag::MIN_KEY, "min", &[]),
            elem(tag::MAX_KEY, "max", &[]),
            elem(tag::INT32, "after", &2i32.to_le_bytes()),
        ]);

        let doc = decode(&buf);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("before"), Some(&BsonValue::Int32(1)));
        assert_eq!(doc.get("after"), Some(&BsonValue::Int32(2)));
    }

    #[test]
    fn unknown_tag_without_payload_is_dropped() {
        let buf = doc_bytes(&[
            elem(tag::INT32, "a", &1i32.to_le_bytes()),
            elem(0xAB, "junk", &[]),
        ]);
        let doc = decode(&buf);
        assert_eq!(doc.get("a"), Some(&BsonValue::Int32(1)));
        assert!(doc.get("junk").is_none());
    }

    #[test]
    fn unknown_tag_payload_is_read_as_further_elements() {
        // The unknown element's length is unknowable, so its payload
        // bytes are interpreted as elements in their own right.
        let buf = doc_bytes(&[elem(
            0xAB,
            "junk",
            &elem(tag::INT32, "x", &7i32.to_le_bytes()),
        )]);
        let doc = decode(&buf);
        assert!(doc.get("junk").is_none());
        assert_eq!(doc.get("x"), Some(&BsonValue::Int32(7)));
    }

    #[test]
    fn trailing_bytes_after_root_are_ignored() {
        let mut buf = doc_bytes(&[elem(tag::INT32, "a", &1i32.to_le_bytes())]);
        buf.extend_from_slice(&[0xDE, 0xAD]);
        let doc = decode(&buf);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut payload = 3i32.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0xFF, 0xFE]);
        payload.push(0);
        let buf = doc_bytes(&[elem(tag::STRING, "s", &payload)]);

        let doc = decode(&buf);
        assert_eq!(
            doc.get("s"),
            Some(&BsonValue::String("\u{FFFD}\u{FFFD}".into()))
        );
    }

    // ── Timestamp handling ────────────────────────────────────────────────

    #[test]
    fn timestamp_standard_mode_is_composite() {
        let mut payload = 3u32.to_le_bytes().to_vec(); // increment
        payload.extend_from_slice(&1_615_774_908u32.to_le_bytes()); // seconds
        let buf = doc_bytes(&[elem(tag::TIMESTAMP, "ts", &payload)]);

        let doc = decode(&buf);
        assert_eq!(
            doc.get("ts"),
            Some(&BsonValue::Timestamp {
                seconds: 1_615_774_908,
                increment: 3,
            })
        );
    }

    #[test]
    fn timestamp_ftdc_mode_splits_into_t_and_i() {
        let mut payload = 3u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&1_615_774_908u32.to_le_bytes());
        let buf = doc_bytes(&[elem(tag::TIMESTAMP, "ts", &payload)]);

        let doc = decode_document(&buf, DecodeMode::Ftdc).unwrap();
        let entries: Vec<(&str, &BsonValue)> = doc.iter().collect();
        assert_eq!(
            entries,
            [
                ("ts_t", &BsonValue::Int64(1_615_774_908)),
                ("ts_i", &BsonValue::Int64(3)),
            ]
        );
    }

    // ── FTDC short-circuit ────────────────────────────────────────────────

    #[test]
    fn ftdc_binary_short_circuits_with_payload_slice() {
        // Binary payload: u32 uncompressed-size header, then the deflate
        // stream the chunk decoder actually wants.
        let deflate_stand_in = [0xAA_u8; 10];
        let mut bin = Vec::new();
        bin.extend_from_slice(&i32::try_from(4 + deflate_stand_in.len()).unwrap().to_le_bytes());
        bin.push(0); // subtype
        bin.extend_from_slice(&4096u32.to_le_bytes());
        bin.extend_from_slice(&deflate_stand_in);

        let buf = doc_bytes(&[
            elem(tag::INT32, "type", &1i32.to_le_bytes()),
            elem(tag::BINARY, "data", &bin),
            elem(tag::INT32, "ignored", &9i32.to_le_bytes()),
        ]);

        let doc = decode_document(&buf, DecodeMode::Ftdc).unwrap();
        assert_eq!(doc.get("type"), Some(&BsonValue::Int32(1)));
        assert_eq!(
            doc.get("data"),
            Some(&BsonValue::Binary {
                subtype: 0,
                data: deflate_stand_in.to_vec(),
            })
        );
        // Decoding stopped at the Binary element.
        assert!(doc.get("ignored").is_none());
    }

    #[test]
    fn ftdc_binary_shorter_than_header_is_out_of_bounds() {
        let mut bin = 2i32.to_le_bytes().to_vec();
        bin.push(0);
        bin.extend_from_slice(&[1, 2]);
        let buf = doc_bytes(&[elem(tag::BINARY, "data", &bin)]);

        let err = decode_document(&buf, DecodeMode::Ftdc).unwrap_err();
        assert!(matches!(err, BsonError::Wire(WireError::OutOfBounds { .. })));
    }
}
