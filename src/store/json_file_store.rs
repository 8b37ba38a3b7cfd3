use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use spdlog::{debug, warn};

use crate::content::document::Document;
use crate::content::{Collection, RecordId};
use crate::store::collections::Collections;
use crate::store::{ContentStore, Query, StoreError, StoredDocument};

/// Keeps every document in a single JSON file shared by the server and the
/// admin tool. Every operation reads the file again, so writes made by
/// another process are visible on the next read.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

fn read_collections(path: &Path) -> io::Result<Collections> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(Collections::default()),
        Ok(content) => serde_json::from_str::<Collections>(&content).map_err(|e| {
            io::Error::new(ErrorKind::InvalidData, format!("Error parsing content store {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Collections::default()),
        Err(e) => Err(io::Error::new(e.kind(), format!("Error opening content store {}: {}", path.display(), e))),
    }
}

impl JsonFileStore {
    /// Checks that the file is readable before the store is handed out.
    pub fn open(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            warn!("Content store {} does not exist yet. Starting empty", path.display());
        }
        read_collections(path)?;

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Unavailable(format!("lock poisoned for {}", self.path.display())))
    }

    fn load(&self) -> Result<Collections, StoreError> {
        read_collections(&self.path).map_err(StoreError::unavailable)
    }

    fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(collections).map_err(StoreError::unavailable)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::unavailable)?;
            }
        }

        // Write next to the target, then rename, so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(StoreError::unavailable)?;
        fs::rename(&tmp_path, &self.path).map_err(StoreError::unavailable)?;
        debug!("Content store written to {}", self.path.display());
        Ok(())
    }

    fn read<T>(&self, op: impl FnOnce(&Collections) -> T) -> Result<T, StoreError> {
        let _guard = self.lock()?;
        Ok(op(&self.load()?))
    }

    /// Applies a mutation to the current file content and writes it back.
    /// Nothing is written when the mutation fails.
    fn mutate<T>(&self, op: impl FnOnce(&mut Collections) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let _guard = self.lock()?;
        let mut collections = self.load()?;
        let res = op(&mut collections)?;
        self.persist(&collections)?;
        Ok(res)
    }
}

#[async_trait]
impl ContentStore for JsonFileStore {
    async fn create(&self, collection: Collection, data: Document) -> Result<RecordId, StoreError> {
        self.mutate(|collections| Ok(collections.create(collection, data)))
    }

    async fn get(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>, StoreError> {
        self.read(|collections| collections.get(collection, id).cloned())
    }

    async fn update(&self, collection: Collection, id: &RecordId, changes: Document) -> Result<(), StoreError> {
        self.mutate(|collections| collections.update(collection, id, changes))
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<(), StoreError> {
        self.mutate(|collections| collections.delete(collection, id))
    }

    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        self.read(|collections| collections.query(query))
    }
}
