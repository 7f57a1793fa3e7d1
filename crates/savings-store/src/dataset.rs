//! The device and savings tables held in memory.

use std::path::{Path, PathBuf};

use savings_types::{DeviceRecord, SavingRecord};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::loader::load_table;
use crate::query::{self, QueryResult, SavingsQuery};

/// Default location of the device metadata table.
pub const DEFAULT_DEVICES_PATH: &str = "./data/devices.csv";

/// Default location of the savings table.
pub const DEFAULT_SAVINGS_PATH: &str = "./data/device-saving.csv";

/// Paths of the two source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    /// Device metadata file.
    pub devices: PathBuf,
    /// Savings time-series file.
    pub savings: PathBuf,
}

impl DataSources {
    /// Create sources from explicit paths.
    pub fn new(devices: impl AsRef<Path>, savings: impl AsRef<Path>) -> Self {
        Self {
            devices: devices.as_ref().to_path_buf(),
            savings: savings.as_ref().to_path_buf(),
        }
    }
}

impl Default for DataSources {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICES_PATH, DEFAULT_SAVINGS_PATH)
    }
}

/// Both tables, in file order.
///
/// A dataset is never modified once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    devices: Vec<DeviceRecord>,
    savings: Vec<SavingRecord>,
}

impl Dataset {
    /// Build a dataset from records already in memory.
    pub fn new(devices: Vec<DeviceRecord>, savings: Vec<SavingRecord>) -> Self {
        Self { devices, savings }
    }

    /// Load both tables from `sources`.
    ///
    /// The two files are read concurrently. If either fails the whole load
    /// fails and nothing is returned.
    pub async fn load(sources: &DataSources) -> Result<Self, LoadError> {
        let (devices, savings) =
            tokio::try_join!(load_table(&sources.devices), load_table(&sources.savings))?;

        let devices: Vec<DeviceRecord> = devices.into_iter().map(DeviceRecord::from).collect();
        let savings: Vec<SavingRecord> = savings.into_iter().map(SavingRecord::from).collect();

        let undated = savings.iter().filter(|s| s.timestamp().is_none()).count();
        if undated > 0 {
            warn!(
                "{} savings row(s) in {} have no parseable timestamp and will never match a date range",
                undated,
                sources.savings.display()
            );
        }

        info!(
            "Dataset loaded: {} device(s), {} savings record(s)",
            devices.len(),
            savings.len()
        );

        Ok(Self { devices, savings })
    }

    /// Device records in load order.
    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    /// Savings records in load order.
    pub fn savings(&self) -> &[SavingRecord] {
        &self.savings
    }

    /// Filter the savings table.
    pub fn query_savings(&self, q: &SavingsQuery) -> QueryResult<'_> {
        query::query(&self.savings, q)
    }
}
