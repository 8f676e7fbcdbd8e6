/// A decoded BSON element value.
///
/// Only the types that appear in diagnostic archives are represented.
/// Deprecated and unsupported wire types (regex, code, symbol,
/// Decimal128, min/max keys) are consumed by the decoder but never
/// produce a value, so they have no variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum BsonValue {
    /// IEEE-754 binary64.
    Double(f64),
    /// UTF-8 string; invalid sequences were replaced during decode.
    String(String),
    /// Nested document.
    Document(Document),
    /// Nested array; positional keys are dropped at decode time.
    Array(Vec<BsonValue>),
    /// Raw binary payload with its subtype byte.
    Binary { subtype: u8, data: Vec<u8> },
    /// 12-byte object id, kept raw.
    ObjectId([u8; 12]),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Null,
    Int32(i32),
    /// Internal replication timestamp: seconds plus an ordinal that
    /// distinguishes events within the same second. Encoded on the wire
    /// as increment first, then seconds.
    Timestamp { seconds: u32, increment: u32 },
    /// Exact 64-bit integer; never routed through a float.
    Int64(i64),
}

/// An ordered BSON document.
///
/// Entries keep encoding order, which downstream flattening depends on:
/// metric columns are matched to reference keys by position, so a
/// reordering here would silently pair values with the wrong metrics.
/// Duplicate keys are kept as encountered; [`get`](Self::get) returns
/// the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, BsonValue)>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, preserving insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: BsonValue) {
        self.entries.push((key.into(), value));
    }

    /// First value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BsonValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BsonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, BsonValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, BsonValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, BsonValue);
    type IntoIter = std::vec::IntoIter<(String, BsonValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
