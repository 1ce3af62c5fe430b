use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create store directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read store key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove store key '{key}': {source}")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Durable key-value store with one file per key under a data directory.
/// Values are plain strings; callers decide the encoding per key.
#[derive(Clone, Debug)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDir {
            path: dir.display().to_string(),
            source: e,
        })?;
        Ok(KvStore { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// A missing key reads as `None`; only an unreadable key is an error.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.key_path(key), value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            source: e,
        })
    }

    /// Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Remove {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KvStore;

    fn temp_store(name: &str) -> KvStore {
        let dir = std::env::temp_dir().join(format!("merisadak-store-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        KvStore::open(dir).unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let store = temp_store("missing");
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = temp_store("roundtrip");
        store.set("role", "user").unwrap();
        assert_eq!(store.get("role").unwrap().as_deref(), Some("user"));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = temp_store("remove");
        store.set("role", "user").unwrap();
        store.remove("role").unwrap();
        store.remove("role").unwrap();
        assert_eq!(store.get("role").unwrap(), None);
    }
}
