//! Local key-value state for the checklist and insight trackers.

use crate::storage::write_atomic;
use crate::{Result, StatusDeckError};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

/// String key-value storage injected into the trackers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&self, key: &str, value: String) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

/// JSON helpers over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    fn get_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn put_json<V: Serialize>(&self, key: &str, value: &V) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put(key, raw)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: DashMap<String, String>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|e| e.value().clone()))
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a single JSON object.
///
/// Every write rewrites the file through a temporary file and rename; the
/// in-memory copy only changes once the file is on disk. Writes block, so
/// async callers run them on the blocking pool.
pub struct FileKeyValueStore {
    dir: PathBuf,
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let values: BTreeMap<String, String> = match std::fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = values.len(), "FileKeyValueStore opened");
        Ok(Arc::new(Self {
            dir,
            path,
            values: Mutex::new(values),
        }))
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StatusDeckError::StorageError("key-value lock poisoned".to_string()))?;

        let mut next = values.clone();
        apply(&mut next);

        write_atomic(&self.dir, &self.path, &serde_json::to_vec_pretty(&next)?)?;

        *values = next;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StatusDeckError::StorageError("key-value lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        self.update(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    #[test]
    fn json_helpers_round_trip() {
        let store = InMemoryKeyValueStore::new();
        store.put_json("counter", &Counter { hits: 3 }).unwrap();
        let back: Option<Counter> = store.get_json("counter").unwrap();
        assert_eq!(back, Some(Counter { hits: 3 }));

        store.delete("counter").unwrap();
        assert!(store.get_json::<Counter>("counter").unwrap().is_none());
    }

    #[test]
    fn garbage_json_is_an_error() {
        let store = InMemoryKeyValueStore::new();
        store.put("counter", "{not json".to_string()).unwrap();
        assert!(store.get_json::<Counter>("counter").is_err());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("kv.json");

        let store = FileKeyValueStore::open(&path).unwrap();
        store.put("a", "1".to_string()).unwrap();
        store.put("b", "2".to_string()).unwrap();
        store.delete("a").unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap(), Some("2".to_string()));

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("kv.json")]);
    }

    #[test]
    fn failed_write_keeps_state_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.json");
        let store = FileKeyValueStore::open(&path).unwrap();
        store.put("a", "1".to_string()).unwrap();

        // A directory at the target path makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.put("a", "2".to_string()).is_err());
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
