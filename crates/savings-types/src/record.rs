//! Row records for the device and savings tables.

#[cfg(feature = "serde")]
use core::fmt;

#[cfg(feature = "serde")]
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use time::OffsetDateTime;

use crate::datetime::parse_datetime;

/// Column holding the device identifier in the savings table.
pub const DEVICE_ID_COLUMN: &str = "device_id";

/// Column holding the measurement time in the savings table.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// One row of a tabular file: column name to string value.
///
/// Columns keep the order of the file header, and that order is preserved
/// when the record is serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Value of `column`, if the row has it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Set `column` to `value`.
    ///
    /// An existing column is overwritten in place; a new column is appended.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Number of columns present in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in header order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

#[cfg(feature = "serde")]
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((column, value)) = access.next_entry::<String, String>()? {
                    record.insert(column, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// A row of the device metadata table.
///
/// Device rows are passed through untouched; no column is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DeviceRecord(Record);

impl DeviceRecord {
    /// Wrap a loaded row.
    pub fn new(record: Record) -> Self {
        Self(record)
    }

    /// Value of `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column)
    }

    /// The underlying row.
    pub fn record(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for DeviceRecord {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

/// A timestamped energy-saving measurement for one device.
///
/// The `timestamp` column is parsed once when the record is built. Rows whose
/// timestamp is missing or unparseable keep `None` and can never fall inside a
/// date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingRecord {
    record: Record,
    timestamp: Option<OffsetDateTime>,
}

impl SavingRecord {
    /// Wrap a loaded row, parsing its `timestamp` column.
    pub fn new(record: Record) -> Self {
        let timestamp = record
            .get(TIMESTAMP_COLUMN)
            .and_then(|raw| parse_datetime(raw).ok());
        Self { record, timestamp }
    }

    /// The `device_id` column, compared verbatim by queries.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.record.get(DEVICE_ID_COLUMN)
    }

    /// Parsed measurement time.
    #[must_use]
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        self.timestamp
    }

    /// The `timestamp` column as it appeared in the file.
    #[must_use]
    pub fn raw_timestamp(&self) -> Option<&str> {
        self.record.get(TIMESTAMP_COLUMN)
    }

    /// Value of `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.record.get(column)
    }

    /// The underlying row.
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for SavingRecord {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

#[cfg(feature = "serde")]
impl Serialize for SavingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}
