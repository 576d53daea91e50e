//! # Key-Value Persistence
//!
//! A durable string-keyed store, the stand-in for a browser's local storage.
//!
//! - [`KeyValueStore`] is the boundary: get/set/remove whole string values.
//! - [`MemoryStore`] keeps values in a map (tests, ephemeral sessions).
//! - [`FileStore`] keeps one `<key>.json` file per key in a directory.
//! - [`Collection`] layers a JSON array of `T` on top of one key.
//!
//! Every operation is synchronous and whole-value: a collection is always
//! read completely, modified in memory and written back completely. With a
//! single writer per key that is enough; concurrent writers from other
//! processes simply overwrite each other.

use crate::error::FrameworkError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Durable string-keyed storage.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, FrameworkError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), FrameworkError>;
    fn remove_item(&self, key: &str) -> Result<(), FrameworkError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, FrameworkError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FrameworkError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), FrameworkError> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, FrameworkError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FrameworkError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), FrameworkError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates, if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FrameworkError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| FrameworkError::Storage {
            key: dir.display().to_string(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FrameworkError> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || key.contains('\0');
        if invalid {
            return Err(FrameworkError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, FrameworkError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FrameworkError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FrameworkError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value).map_err(|source| FrameworkError::Storage {
            key: key.to_string(),
            source,
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), FrameworkError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FrameworkError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// A JSON array of `T` stored under one key.
pub struct Collection<T, S> {
    store: S,
    key: String,
    _item: PhantomData<T>,
}

impl<T, S> Collection<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _item: PhantomData,
        }
    }

    /// Reads the whole collection. An absent key is an empty collection.
    pub fn load(&self) -> Result<Vec<T>, FrameworkError> {
        match self.store.get_item(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the whole collection.
    pub fn save(&self, items: &[T]) -> Result<(), FrameworkError> {
        let raw = serde_json::to_string(items)?;
        self.store.set_item(&self.key, &raw)?;
        debug!(key = %self.key, size = items.len(), "Saved collection");
        Ok(())
    }
}
