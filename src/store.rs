use crate::errors::StoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Durable string-keyed storage.
///
/// Reads never fail; a missing key is `None`. Writes go straight through to the
/// backing medium.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Every key starting with `prefix`, in ascending order.
    fn list_keys(&self, prefix: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Vec<String> {
        prefix_keys(&self.entries, prefix)
    }
}

/// The whole key space kept as a single JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. An absent file is an empty store; an unreadable
    /// or corrupt one is logged and also treated as empty.
    pub async fn load(path: &Path) -> Self {
        let entries = match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse data file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read data file: {err}");
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Replaces the file atomically: the payload lands in a sibling temp file
    /// which is then renamed over the store.
    fn persist(&self) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, payload)?;
        if let Err(err) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!(path = %self.path.display(), keys = self.entries.len(), "store persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// Memory only changes once the file does; a failed write leaves the
    /// previous value in place.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_owned(), value);
        if let Err(err) = self.persist() {
            match previous {
                Some(previous) => self.entries.insert(key.to_owned(), previous),
                None => self.entries.remove(key),
            };
            error!(%key, "failed to persist store: {err}");
            return Err(err);
        }
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Vec<String> {
        prefix_keys(&self.entries, prefix)
    }
}

fn prefix_keys(entries: &BTreeMap<String, String>, prefix: &str) -> Vec<String> {
    entries
        .range(prefix.to_owned()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, _)| key.clone())
        .collect()
}
