//! JSON export of article records
//!
//! Records serialize as a flat array:
//!
//! ```json
//! [
//!   {
//!     "pmid": 12345,
//!     "journal": "Cell",
//!     "abstract": "...",
//!     "pubDate": { "year": 2020, "month": 0, "day": 0 },
//!     "authors": [{ "lastName": "Smith", "foreName": "Jane", "affiliation": "" }]
//!   }
//! ]
//! ```
//!
//! The identifier field name is configurable; older consumers expect `_id`.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::result;

use crate::config::DEFAULT_IDENTIFIER_KEY;
use crate::error::{DecodeError, EncodeError};
use crate::pubmed::models::{ArticleRecord, ArticleRecordSet};

const RESERVED_KEYS: [&str; 4] = ["journal", "abstract", "pubDate", "authors"];

/// Converts an [`ArticleRecordSet`] to and from JSON bytes
///
/// # Example
///
/// ```
/// use pubmed_retrieve::{ArticleRecordSet, RecordSerializer};
///
/// let serializer = RecordSerializer::new().with_identifier_key("_id");
/// let bytes = serializer.encode(&ArticleRecordSet::default()).unwrap();
/// assert_eq!(bytes, b"[]");
/// ```
#[derive(Debug, Clone)]
pub struct RecordSerializer {
    identifier_key: String,
    pretty: bool,
}

impl RecordSerializer {
    pub fn new() -> Self {
        Self {
            identifier_key: DEFAULT_IDENTIFIER_KEY.to_string(),
            pretty: false,
        }
    }

    pub fn with_identifier_key<S: Into<String>>(mut self, key: S) -> Self {
        self.identifier_key = key.into();
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn identifier_key(&self) -> &str {
        &self.identifier_key
    }

    /// Serialize the record set
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if the identifier key is empty or collides with
    /// another record field.
    pub fn encode(&self, records: &ArticleRecordSet) -> result::Result<Vec<u8>, EncodeError> {
        self.check_key()?;

        let keyed = KeyedRecords {
            key: &self.identifier_key,
            records: &records.articles,
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&keyed)?
        } else {
            serde_json::to_vec(&keyed)?
        };
        Ok(bytes)
    }

    /// Parse bytes produced by [`encode`](Self::encode) with the same key
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` for malformed JSON or records missing the
    /// identifier field.
    pub fn decode(&self, bytes: &[u8]) -> result::Result<ArticleRecordSet, DecodeError> {
        let mut value: Value = serde_json::from_slice(bytes)?;

        if self.identifier_key != DEFAULT_IDENTIFIER_KEY {
            if let Value::Array(items) = &mut value {
                for item in items.iter_mut() {
                    if let Value::Object(fields) = item {
                        if let Some(id) = fields.remove(&self.identifier_key) {
                            fields.insert(DEFAULT_IDENTIFIER_KEY.to_string(), id);
                        }
                    }
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    fn check_key(&self) -> result::Result<(), EncodeError> {
        if self.identifier_key.is_empty() || RESERVED_KEYS.contains(&self.identifier_key.as_str())
        {
            return Err(EncodeError(serde_json::Error::custom(format!(
                "identifier key '{}' is empty or clashes with a record field",
                self.identifier_key
            ))));
        }
        Ok(())
    }
}

impl Default for RecordSerializer {
    fn default() -> Self {
        Self::new()
    }
}

struct KeyedRecords<'a> {
    key: &'a str,
    records: &'a [ArticleRecord],
}

impl Serialize for KeyedRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records {
            seq.serialize_element(&KeyedRecord {
                key: self.key,
                record,
            })?;
        }
        seq.end()
    }
}

struct KeyedRecord<'a> {
    key: &'a str,
    record: &'a ArticleRecord,
}

impl Serialize for KeyedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry(self.key, &self.record.pmid)?;
        map.serialize_entry("journal", &self.record.journal)?;
        map.serialize_entry("abstract", &self.record.r#abstract)?;
        map.serialize_entry("pubDate", &self.record.pub_date)?;
        map.serialize_entry("authors", &self.record.authors)?;
        map.end()
    }
}
