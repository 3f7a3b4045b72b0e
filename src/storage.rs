use crate::errors::{LedgerError, LedgerResult};
use crate::models::{Snapshot, UserRecord};
use std::{
    collections::BTreeMap,
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{error, info};

/// Durable home of the [`Snapshot`]. `save` replaces the whole document atomically.
pub trait Store: Send + Sync {
    fn load(&self) -> LedgerResult<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> LedgerResult<Snapshot> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse data file {}: {err}", self.path.display());
                LedgerError::Io(format!("failed to parse {}: {err}", self.path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let snapshot = Snapshot::default();
                self.save(&snapshot)?;
                info!("initialized empty store at {}", self.path.display());
                Ok(snapshot)
            }
            Err(err) => {
                error!("failed to read data file {}: {err}", self.path.display());
                Err(err.into())
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let payload = serde_json::to_vec_pretty(snapshot)?;
        write_atomic_file(&self.path, &payload).inspect_err(|err| {
            error!("failed to persist {}: {err}", self.path.display());
        })
    }
}

/// One JSON value per user, the layout of a hosted key/value backend.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

const INITIALIZED_KEY: &str = "meta/initialized";
const USER_PREFIX: &str = "users/";

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn keys(&self) -> LedgerResult<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    fn entries(&self) -> LedgerResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| LedgerError::Io("key/value store lock poisoned".into()))
    }
}

impl Store for KeyValueStore {
    fn load(&self) -> LedgerResult<Snapshot> {
        let mut entries = self.entries()?;
        if !entries.contains_key(INITIALIZED_KEY) {
            entries.insert(INITIALIZED_KEY.to_string(), "true".to_string());
            info!("initialized empty key/value store");
        }

        let mut snapshot = Snapshot::default();
        for (key, value) in entries.iter() {
            if let Some(username) = key.strip_prefix(USER_PREFIX) {
                let record: UserRecord = serde_json::from_str(value)?;
                snapshot.users.insert(username.to_string(), record);
            }
        }
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let mut next = BTreeMap::new();
        next.insert(INITIALIZED_KEY.to_string(), "true".to_string());
        for (username, record) in &snapshot.users {
            next.insert(format!("{USER_PREFIX}{username}"), serde_json::to_string(record)?);
        }
        *self.entries()? = next;
        Ok(())
    }
}

/// Writes to a sibling temp file and renames it over `path`.
///
/// The temp file is removed on failure so the previous `path` stays the only artifact.
fn write_atomic_file(path: &Path, bytes: &[u8]) -> LedgerResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    let tmp = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|s| s.to_str()).unwrap_or("store"),
        std::process::id()
    ));

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    if let Ok(dir) = fs::File::open(&parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}
