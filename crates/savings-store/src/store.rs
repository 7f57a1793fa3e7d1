//! Write-once dataset holder with an explicit readiness lifecycle.
//!
//! A [`DatasetStore`] moves through three phases:
//!
//! ```text
//! Uninitialized --load()--> Loading --ok--> Ready
//!                              |
//!                              +--err--> Uninitialized
//! ```
//!
//! Once `Ready` the dataset is frozen; there is no reload. Readers never
//! take a lock: the phase is an atomic and the dataset sits in a
//! [`OnceLock`] that is written exactly once, before the phase flips to
//! `Ready`.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;
use tracing::{error, info};

use crate::dataset::{DataSources, Dataset};
use crate::error::{Error, Result};

/// Lifecycle phase of a [`DatasetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum StorePhase {
    /// Nothing loaded yet.
    Uninitialized = 0,
    /// A load is in progress.
    Loading = 1,
    /// The dataset is available.
    Ready = 2,
}

impl StorePhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => StorePhase::Loading,
            2 => StorePhase::Ready,
            _ => StorePhase::Uninitialized,
        }
    }

    /// Lowercase name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorePhase::Uninitialized => "uninitialized",
            StorePhase::Loading => "loading",
            StorePhase::Ready => "ready",
        }
    }
}

impl fmt::Display for StorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide holder for the loaded [`Dataset`].
#[derive(Debug)]
pub struct DatasetStore {
    phase: AtomicU8,
    dataset: OnceLock<Dataset>,
}

impl DatasetStore {
    /// Create an uninitialized store.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(StorePhase::Uninitialized as u8),
            dataset: OnceLock::new(),
        }
    }

    /// Create a store that is already ready with `dataset`.
    ///
    /// Useful for tests and for callers that build the dataset themselves.
    pub fn ready(dataset: Dataset) -> Self {
        Self {
            phase: AtomicU8::new(StorePhase::Ready as u8),
            dataset: OnceLock::from(dataset),
        }
    }

    /// Create a store stuck in the `Loading` phase.
    #[cfg(any(test, feature = "test-util"))]
    pub fn loading() -> Self {
        Self {
            phase: AtomicU8::new(StorePhase::Loading as u8),
            dataset: OnceLock::new(),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> StorePhase {
        StorePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Whether the dataset can be served.
    pub fn is_ready(&self) -> bool {
        self.phase() == StorePhase::Ready
    }

    /// The dataset, once ready.
    pub fn dataset(&self) -> Option<&Dataset> {
        if self.is_ready() {
            self.dataset.get()
        } else {
            None
        }
    }

    /// Load both tables and become ready.
    ///
    /// Only an uninitialized store can load. If loading fails the store
    /// returns to `Uninitialized` and holds no data.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyInitialized`] if the store is loading or ready
    /// - [`Error::Load`] if either table fails to load
    pub async fn load(&self, sources: &DataSources) -> Result<()> {
        self.phase
            .compare_exchange(
                StorePhase::Uninitialized as u8,
                StorePhase::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| Error::AlreadyInitialized(StorePhase::from_u8(current)))?;

        info!(
            "Loading dataset (devices: {}, savings: {})",
            sources.devices.display(),
            sources.savings.display()
        );

        match Dataset::load(sources).await {
            Ok(dataset) => {
                if self.dataset.set(dataset).is_err() {
                    return Err(Error::AlreadyInitialized(StorePhase::Ready));
                }
                self.phase.store(StorePhase::Ready as u8, Ordering::Release);
                info!("Dataset store ready");
                Ok(())
            }
            Err(e) => {
                self.phase
                    .store(StorePhase::Uninitialized as u8, Ordering::Release);
                error!("Dataset load failed: {}", e);
                Err(e.into())
            }
        }
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}
