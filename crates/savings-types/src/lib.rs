//! Record and timestamp types for device energy-saving datasets.
//!
//! This crate holds the data model shared by the loader, the query engine
//! and the HTTP layer:
//!
//! - [`Record`]: one tabular row, columns kept in header order
//! - [`DeviceRecord`]: a pass-through row from the device table
//! - [`SavingRecord`]: a row from the savings table with its `device_id` and
//!   parsed `timestamp` exposed
//! - [`parse_datetime`]: the date parser used for both stored timestamps and
//!   query bounds
//!
//! # Example
//!
//! ```
//! use savings_types::{Record, SavingRecord};
//!
//! let row = Record::from_iter([("device_id", "D1"), ("timestamp", "2024-01-05")]);
//! let saving = SavingRecord::new(row);
//! assert_eq!(saving.device_id(), Some("D1"));
//! assert!(saving.timestamp().is_some());
//! ```

pub mod datetime;
pub mod error;
pub mod record;

pub use datetime::parse_datetime;
pub use error::{ParseError, ParseResult};
pub use record::{DEVICE_ID_COLUMN, DeviceRecord, Record, SavingRecord, TIMESTAMP_COLUMN};
