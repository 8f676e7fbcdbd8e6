use ftdc_bson::{BsonValue, Document};

/// Flatten a reference document into dot-joined leaf paths.
///
/// Nested documents and arrays contribute path segments (array indices
/// become segments like any other key); only leaves appear in the
/// output. Timestamp leaves expand into two integer entries, `<path>_t`
/// (seconds) then `<path>_i` (ordinal), matching the two columns the
/// delta stream carries for them. Entry order follows document order,
/// which is what pairs each leaf with its column in the delta stream.
///
/// Traversal uses an explicit work stack, same as the BSON decoder, so
/// pathological nesting cannot overflow the call stack.
#[must_use]
pub fn flatten(doc: &Document) -> Vec<(String, BsonValue)> {
    enum Node<'a> {
        Doc(&'a Document, usize),
        Arr(&'a [BsonValue], usize),
    }

    let mut out = Vec::new();
    let mut stack = vec![(String::new(), Node::Doc(doc, 0))];

    while let Some((prefix, node)) = stack.pop() {
        let (key, value, next) = match node {
            Node::Doc(d, i) => {
                let Some((k, v)) = d.iter().nth(i) else {
                    continue;
                };
                (k.to_owned(), v, Node::Doc(d, i + 1))
            }
            Node::Arr(items, i) => {
                let Some(v) = items.get(i) else { continue };
                (i.to_string(), v, Node::Arr(items, i + 1))
            }
        };

        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };

        // Re-push the parent so its remaining entries follow the
        // subtree we are about to descend into.
        stack.push((prefix, next));

        match value {
            BsonValue::Document(inner) => stack.push((path, Node::Doc(inner, 0))),
            BsonValue::Array(items) => stack.push((path, Node::Arr(items, 0))),
            BsonValue::Timestamp { seconds, increment } => {
                out.push((format!("{path}_t"), BsonValue::Int64(i64::from(*seconds))));
                out.push((format!("{path}_i"), BsonValue::Int64(i64::from(*increment))));
            }
            leaf => out.push((path, leaf.clone())),
        }
    }

    out
}

/// Drop ineligible leaves and convert the rest to integer base values.
///
/// A leaf is numeric-eligible if it is a number, a boolean, a date
/// (converted to epoch milliseconds), or a string that looks like a
/// signed integer or decimal. Everything else is dropped entirely; the
/// surviving count is what the chunk's declared metric count is checked
/// against.
///
/// Fractional values truncate toward zero. Values outside the `i64`
/// range saturate at the nearest bound.
#[must_use]
pub fn clean(leaves: Vec<(String, BsonValue)>) -> Vec<(String, i64)> {
    leaves
        .into_iter()
        .filter_map(|(key, value)| base_value(&value).map(|v| (key, v)))
        .collect()
}

fn base_value(value: &BsonValue) -> Option<i64> {
    match value {
        BsonValue::Int32(v) => Some(i64::from(*v)),
        BsonValue::Int64(v) | BsonValue::DateTime(v) => Some(*v),
        // `as` saturates for out-of-range floats and maps NaN to 0.
        #[allow(clippy::cast_possible_truncation)]
        BsonValue::Double(v) => Some(*v as i64),
        BsonValue::Boolean(v) => Some(i64::from(*v)),
        BsonValue::String(s) => numeric_string_value(s),
        _ => None,
    }
}

/// Parse a string matching `-?\d+(\.\d+)?`, truncating any fractional
/// part. Returns `None` for anything else.
fn numeric_string_value(s: &str) -> Option<i64> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part
        && (frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let negative = s.starts_with('-');
    let magnitude = int_part.parse::<u64>().unwrap_or(u64::MAX);
    if negative {
        Some(i64::try_from(magnitude).map_or(i64::MIN, |m| -m))
    } else {
        Some(i64::try_from(magnitude).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entries: Vec<(&str, BsonValue)>) -> Document {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect()
    }

    #[test]
    fn flatten_nested_documents_with_dot_paths() {
        let inner = doc(vec![("inserted", BsonValue::Int64(10))]);
        let outer = doc(vec![
            ("start", BsonValue::DateTime(1_000)),
            ("metrics", BsonValue::Document(inner)),
        ]);

        let flat = flatten(&outer);
        assert_eq!(
            flat,
            vec![
                ("start".to_owned(), BsonValue::DateTime(1_000)),
                ("metrics.inserted".to_owned(), BsonValue::Int64(10)),
            ]
        );
    }

    #[test]
    fn flatten_array_indices_become_segments() {
        let root = doc(vec![(
            "shards",
            BsonValue::Array(vec![BsonValue::Int32(1), BsonValue::Int32(2)]),
        )]);

        let flat = flatten(&root);
        assert_eq!(
            flat,
            vec![
                ("shards.0".to_owned(), BsonValue::Int32(1)),
                ("shards.1".to_owned(), BsonValue::Int32(2)),
            ]
        );
    }

    #[test]
    fn flatten_preserves_ordering_across_subtrees() {
        let inner = doc(vec![("b", BsonValue::Int32(2)), ("c", BsonValue::Int32(3))]);
        let root = doc(vec![
            ("a", BsonValue::Int32(1)),
            ("sub", BsonValue::Document(inner)),
            ("d", BsonValue::Int32(4)),
        ]);

        let keys: Vec<String> = flatten(&root).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "sub.b", "sub.c", "d"]);
    }

    #[test]
    fn flatten_expands_timestamps() {
        let root = doc(vec![(
            "repl.lastApplied",
            BsonValue::Timestamp {
                seconds: 1_615_774_908,
                increment: 3,
            },
        )]);

        let flat = flatten(&root);
        assert_eq!(
            flat,
            vec![
                (
                    "repl.lastApplied_t".to_owned(),
                    BsonValue::Int64(1_615_774_908)
                ),
                ("repl.lastApplied_i".to_owned(), BsonValue::Int64(3)),
            ]
        );
    }

    #[test]
    fn clean_converts_eligible_types() {
        let leaves = vec![
            ("i32".to_owned(), BsonValue::Int32(-5)),
            ("i64".to_owned(), BsonValue::Int64(9_007_199_254_740_993)),
            ("dbl".to_owned(), BsonValue::Double(2.9)),
            ("neg_dbl".to_owned(), BsonValue::Double(-2.9)),
            ("bool".to_owned(), BsonValue::Boolean(true)),
            ("date".to_owned(), BsonValue::DateTime(1_615_774_908_000)),
            ("num_str".to_owned(), BsonValue::String("42".into())),
            ("dec_str".to_owned(), BsonValue::String("-3.7".into())),
        ];

        let cleaned = clean(leaves);
        let values: Vec<i64> = cleaned.iter().map(|(_, v)| *v).collect();
        assert_eq!(
            values,
            [-5, 9_007_199_254_740_993, 2, -2, 1, 1_615_774_908_000, 42, -3]
        );
    }

    #[test]
    fn clean_drops_ineligible_leaves() {
        let leaves = vec![
            ("keep".to_owned(), BsonValue::Int32(1)),
            ("host".to_owned(), BsonValue::String("db-0:27017".into())),
            ("null".to_owned(), BsonValue::Null),
            (
                "bin".to_owned(),
                BsonValue::Binary {
                    subtype: 0,
                    data: vec![1],
                },
            ),
            ("oid".to_owned(), BsonValue::ObjectId([0u8; 12])),
        ];

        let cleaned = clean(leaves);
        assert_eq!(cleaned, vec![("keep".to_owned(), 1)]);
    }

    #[test]
    fn numeric_string_pattern_is_strict() {
        assert_eq!(numeric_string_value("0"), Some(0));
        assert_eq!(numeric_string_value("-120"), Some(-120));
        assert_eq!(numeric_string_value("3.14"), Some(3));
        assert_eq!(numeric_string_value(""), None);
        assert_eq!(numeric_string_value("-"), None);
        assert_eq!(numeric_string_value("1."), None);
        assert_eq!(numeric_string_value(".5"), None);
        assert_eq!(numeric_string_value("1e3"), None);
        assert_eq!(numeric_string_value(" 1"), None);
        assert_eq!(numeric_string_value("1.2.3"), None);
    }

    #[test]
    fn out_of_range_numeric_string_saturates() {
        assert_eq!(
            numeric_string_value("99999999999999999999999"),
            Some(i64::MAX)
        );
        assert_eq!(
            numeric_string_value("-99999999999999999999999"),
            Some(i64::MIN)
        );
    }
}
