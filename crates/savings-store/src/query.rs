//! Device and date-range filtering over the savings table.
//!
//! A record matches a [`SavingsQuery`] when both hold:
//!
//! 1. its `device_id` equals the query's device id exactly (case-sensitive,
//!    no trimming), and
//! 2. its parsed timestamp lies in `start..=end`; both bounds are inclusive.
//!
//! Records without a parseable timestamp never match. A query whose `start`
//! is after its `end` matches nothing. Matches keep dataset order.
//!
//! # Example
//!
//! ```
//! use savings_store::{SavingsQuery, query};
//! use savings_types::{Record, SavingRecord};
//! use time::macros::datetime;
//!
//! let records: Vec<SavingRecord> = [("D1", "2024-01-05"), ("D1", "2024-02-01"), ("D2", "2024-01-10")]
//!     .into_iter()
//!     .map(|(id, ts)| Record::from_iter([("device_id", id), ("timestamp", ts)]).into())
//!     .collect();
//!
//! let q = SavingsQuery::new("D1", datetime!(2024-01-01 0:00 UTC), datetime!(2024-01-31 0:00 UTC));
//! let result = query(&records, &q);
//! assert_eq!(result.count, 1);
//! assert_eq!(result.data[0].raw_timestamp(), Some("2024-01-05"));
//! ```

use savings_types::SavingRecord;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

/// Filter for the savings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsQuery {
    /// Device id, compared verbatim.
    pub device_id: String,
    /// Earliest matching timestamp (inclusive).
    pub start: OffsetDateTime,
    /// Latest matching timestamp (inclusive).
    pub end: OffsetDateTime,
}

impl SavingsQuery {
    /// Create a query for `device_id` over `start..=end`.
    pub fn new(device_id: impl Into<String>, start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            device_id: device_id.into(),
            start,
            end,
        }
    }

    /// Whether `record` satisfies both the device and the date condition.
    #[must_use]
    pub fn matches(&self, record: &SavingRecord) -> bool {
        record.device_id() == Some(self.device_id.as_str())
            && record
                .timestamp()
                .is_some_and(|ts| ts >= self.start && ts <= self.end)
    }
}

/// Matching records, borrowed from the dataset, and their count.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    /// Number of matches; always `data.len()`.
    pub count: usize,
    /// Matches in dataset order.
    pub data: Vec<&'a SavingRecord>,
}

/// Run `query` over `records`.
pub fn query<'a>(records: &'a [SavingRecord], query: &SavingsQuery) -> QueryResult<'a> {
    let data: Vec<&SavingRecord> = records.iter().filter(|r| query.matches(r)).collect();

    debug!(
        "Savings query for {} matched {} of {} record(s)",
        query.device_id,
        data.len(),
        records.len()
    );

    QueryResult {
        count: data.len(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savings_types::Record;
    use time::macros::datetime;

    fn saving(device_id: &str, timestamp: &str) -> SavingRecord {
        Record::from_iter([("device_id", device_id), ("timestamp", timestamp)]).into()
    }

    fn january(device_id: &str) -> SavingsQuery {
        SavingsQuery::new(
            device_id,
            datetime!(2024-01-01 0:00 UTC),
            datetime!(2024-01-31 0:00 UTC),
        )
    }

    #[test]
    fn test_query_filters_device_and_range() {
        let records = vec![
            saving("D1", "2024-01-05"),
            saving("D1", "2024-02-01"),
            saving("D2", "2024-01-10"),
        ];

        let result = query(&records, &january("D1"));
        assert_eq!(result.count, 1);
        assert_eq!(result.data, vec![&records[0]]);
    }

    #[test]
    fn test_query_bounds_are_inclusive() {
        let records = vec![
            saving("D1", "2024-01-01"),
            saving("D1", "2024-01-31"),
            saving("D1", "2023-12-31 23:59:59"),
        ];

        let result = query(&records, &january("D1"));
        assert_eq!(result.count, 2);
        assert_eq!(result.data, vec![&records[0], &records[1]]);
    }

    #[test]
    fn test_query_bare_end_date_is_midnight() {
        let records = vec![
            saving("D1", "2024-01-31 00:00:00"),
            saving("D1", "2024-01-31 08:00:00"),
        ];

        let result = query(&records, &january("D1"));
        assert_eq!(result.data, vec![&records[0]]);
    }

    #[test]
    fn test_query_matches_unpadded_timestamps() {
        let records = vec![saving("D1", "2024-1-5 10:00:00"), saving("D1", "2024-2-1")];
        let result = query(&records, &january("D1"));
        assert_eq!(result.data, vec![&records[0]]);
    }

    #[test]
    fn test_query_device_id_is_exact() {
        let records = vec![
            saving("d1", "2024-01-05"),
            saving("D1 ", "2024-01-05"),
            saving("D10", "2024-01-05"),
        ];

        let result = query(&records, &january("D1"));
        assert_eq!(result.count, 0);
        assert!(result.data.is_empty());
    }

    #[test]
    fn test_query_unknown_device_is_empty() {
        let records = vec![saving("D1", "2024-01-05")];
        let result = query(&records, &january("D9"));
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_query_skips_unparseable_timestamps() {
        let records = vec![saving("D1", "not a date"), saving("D1", "2024-01-05")];
        let result = query(&records, &january("D1"));
        assert_eq!(result.data, vec![&records[1]]);
    }

    #[test]
    fn test_query_missing_columns_never_match() {
        let records = vec![
            SavingRecord::new(Record::from_iter([("timestamp", "2024-01-05")])),
            SavingRecord::new(Record::from_iter([("device_id", "D1")])),
        ];
        assert_eq!(query(&records, &january("D1")).count, 0);
    }

    #[test]
    fn test_query_inverted_range_is_empty() {
        let records = vec![saving("D1", "2024-01-05")];
        let q = SavingsQuery::new(
            "D1",
            datetime!(2024-01-31 0:00 UTC),
            datetime!(2024-01-01 0:00 UTC),
        );
        assert_eq!(query(&records, &q).count, 0);
    }

    #[test]
    fn test_query_keeps_dataset_order() {
        let records = vec![
            saving("D1", "2024-01-20"),
            saving("D1", "2024-01-02"),
            saving("D1", "2024-01-10"),
        ];
        let result = query(&records, &january("D1"));
        let stamps: Vec<_> = result.data.iter().filter_map(|r| r.raw_timestamp()).collect();
        assert_eq!(stamps, ["2024-01-20", "2024-01-02", "2024-01-10"]);
    }

    #[test]
    fn test_query_result_serialization() {
        let records = vec![saving("D1", "2024-01-05")];
        let result = query(&records, &january("D1"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "count": 1,
                "data": [{"device_id": "D1", "timestamp": "2024-01-05"}],
            })
        );
    }
}
