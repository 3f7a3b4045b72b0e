use crate::config::{AppConfig, StoreBackend};
use crate::errors::{LedgerError, LedgerResult};
use crate::models::Snapshot;
use crate::storage::{JsonFileStore, KeyValueStore, Store};
use std::sync::Arc;
use tokio::{sync::Mutex, task};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Serializes load/mutate/save cycles so writers never interleave.
    pub writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn Store> = match config.backend {
            StoreBackend::Json => Arc::new(JsonFileStore::new(&config.data_path)),
            StoreBackend::Memory => Arc::new(KeyValueStore::new()),
        };
        Self::new(store)
    }

    /// Loads on the blocking pool; store I/O never runs on a runtime worker.
    pub async fn load(&self) -> LedgerResult<Snapshot> {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.load())
            .await
            .map_err(|err| LedgerError::Io(format!("store load task failed: {err}")))?
    }

    pub async fn save(&self, snapshot: Snapshot) -> LedgerResult<()> {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.save(&snapshot))
            .await
            .map_err(|err| LedgerError::Io(format!("store save task failed: {err}")))?
    }
}
