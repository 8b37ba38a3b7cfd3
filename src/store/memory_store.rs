use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::content::document::Document;
use crate::content::{Collection, RecordId};
use crate::store::collections::Collections;
use crate::store::{ContentStore, Query, StoreError, StoredDocument};

pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: Mutex::new(Collections::default()),
        }
    }

    /// Builds a store holding documents under known identifiers.
    pub fn from_documents(docs: Vec<(Collection, RecordId, Document)>) -> Self {
        let mut collections = Collections::default();
        for (collection, id, data) in docs {
            collections.insert(collection, id, data);
        }
        MemoryStore {
            collections: Mutex::new(collections),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create(&self, collection: Collection, data: Document) -> Result<RecordId, StoreError> {
        Ok(self.lock()?.create(collection, data))
    }

    async fn get(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>, StoreError> {
        Ok(self.lock()?.get(collection, id).cloned())
    }

    async fn update(&self, collection: Collection, id: &RecordId, changes: Document) -> Result<(), StoreError> {
        self.lock()?.update(collection, id, changes)
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<(), StoreError> {
        self.lock()?.delete(collection, id)
    }

    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        Ok(self.lock()?.query(query))
    }
}

#[cfg(test)]
mod tests {
    use crate::content::document::{CREATED_AT, PUBLISHED};
    use crate::store::Direction;
    use crate::test_data::{document, seeded_store, PROJECT_DOC};

    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        let id = store.create(Collection::Projects, document(PROJECT_DOC)).await.unwrap();
        let doc = store.get(Collection::Projects, &id).await.unwrap();
        assert_eq!(doc, Some(document(PROJECT_DOC)));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = seeded_store();
        let doc = store.get(Collection::Blog, &RecordId::from("missing-id")).await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_query_published_posts() {
        let store = seeded_store();
        let query = Query::collection(Collection::Blog)
            .where_eq(PUBLISHED, true)
            .order_by(CREATED_AT, Direction::Descending);
        let docs = store.query(&query).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.0.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
