//! Application state shared across handlers.
//!
//! The dataset is written once during startup and only read afterwards, so
//! handlers share it without any lock. Readiness is tracked by the
//! [`DatasetStore`] itself.

use std::sync::Arc;

use savings_store::DatasetStore;
use time::OffsetDateTime;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// The in-memory dataset and its lifecycle.
    pub store: DatasetStore,
    /// Configuration the service was started with.
    pub config: Config,
    /// When the state was created.
    pub started_at: OffsetDateTime,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: DatasetStore, config: Config) -> Arc<Self> {
        Arc::new(Self {
            store,
            config,
            started_at: OffsetDateTime::now_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savings_store::{Dataset, StorePhase};

    #[test]
    fn test_app_state_new() {
        let state = AppState::new(DatasetStore::new(), Config::default());
        assert_eq!(state.config.server.port, 3000);
        assert_eq!(state.store.phase(), StorePhase::Uninitialized);
        assert!(state.started_at <= OffsetDateTime::now_utc());
    }

    #[test]
    fn test_app_state_with_ready_store() {
        let state = AppState::new(DatasetStore::ready(Dataset::default()), Config::default());
        assert!(state.store.is_ready());
    }

    #[tokio::test]
    async fn test_app_state_load_through_shared_handle() {
        let dir = tempfile::tempdir().unwrap();
        let devices = dir.path().join("devices.csv");
        let savings = dir.path().join("savings.csv");
        std::fs::write(&devices, "device_id\nD1\n").unwrap();
        std::fs::write(&savings, "device_id,timestamp\n").unwrap();

        let mut config = Config::default();
        config.data.devices = devices;
        config.data.savings = savings;

        let state = AppState::new(DatasetStore::new(), config);
        let reader = Arc::clone(&state);

        state.store.load(&state.config.data.sources()).await.unwrap();
        assert!(reader.store.is_ready());
        assert_eq!(reader.store.dataset().unwrap().devices().len(), 1);
    }
}
