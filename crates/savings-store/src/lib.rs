//! In-memory loading and querying of device energy-saving datasets.
//!
//! This crate reads the device metadata table and the savings time-series
//! table from CSV files, keeps them in memory for the life of the process,
//! and answers device/date-range queries over the savings table.
//!
//! # Features
//!
//! - Async CSV loading on the blocking pool, rows keyed by header column
//! - All-or-nothing dataset load (no partially loaded state is observable)
//! - Explicit `uninitialized -> loading -> ready` store lifecycle
//! - Inclusive date-range filtering that preserves dataset order
//!
//! # Example
//!
//! ```no_run
//! use savings_store::{DataSources, DatasetStore, SavingsQuery};
//! use savings_types::parse_datetime;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DatasetStore::new();
//! store.load(&DataSources::default()).await?;
//!
//! let dataset = store.dataset().expect("store is ready after load");
//! let query = SavingsQuery::new(
//!     "D1",
//!     parse_datetime("2024-01-01")?,
//!     parse_datetime("2024-01-31")?,
//! );
//! println!("{} matches", dataset.query_savings(&query).count);
//! # Ok(())
//! # }
//! ```

mod dataset;
mod error;
mod loader;
mod query;
mod store;

pub use dataset::{DEFAULT_DEVICES_PATH, DEFAULT_SAVINGS_PATH, DataSources, Dataset};
pub use error::{Error, LoadError, Result};
pub use loader::{load_table, read_records, read_table};
pub use query::{QueryResult, SavingsQuery, query};
pub use store::{DatasetStore, StorePhase};
