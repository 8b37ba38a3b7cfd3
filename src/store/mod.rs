//! The document store the site reads from and the admin tool writes to.

use std::cmp::Ordering;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spdlog::info;
use thiserror::Error;

use crate::config::{StoreConfig, StoreKind};
use crate::content::document::{parse_timestamp, Document};
use crate::content::{Collection, RecordId};
use crate::store::json_file_store::JsonFileStore;
use crate::store::memory_store::MemoryStore;

pub mod collections;
pub mod json_file_store;
pub mod memory_store;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
    #[error("document {id} not found in {collection}")]
    NotFound { collection: Collection, id: RecordId },
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: RecordId,
    pub data: Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filter plus ordering on a timestamp field, the only query
/// shapes the site needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn collection(collection: Collection) -> Self {
        Query {
            collection,
            filter: None,
            order_by: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Applies filter and ordering to documents given in store order.
    /// Without an ordering the store order is kept.
    pub fn apply<'a>(&self, docs: impl Iterator<Item = &'a StoredDocument>) -> Vec<StoredDocument> {
        let mut selected: Vec<StoredDocument> = docs
            .filter(|doc| match self.filter {
                None => true,
                Some(ref filter) => doc.data.get(&filter.field) == Some(&filter.value),
            })
            .cloned()
            .collect();

        if let Some(ref order_by) = self.order_by {
            // Documents without a valid timestamp go last, whatever the direction
            selected.sort_by(|a, b| {
                let ta = a.data.get(&order_by.field).and_then(parse_timestamp);
                let tb = b.data.get(&order_by.field).and_then(parse_timestamp);
                match (ta, tb) {
                    (Some(ta), Some(tb)) => match order_by.direction {
                        Direction::Ascending => ta.cmp(&tb),
                        Direction::Descending => tb.cmp(&ta),
                    },
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        selected
    }
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores a new document and returns the identifier assigned to it.
    async fn create(&self, collection: Collection, data: Document) -> Result<RecordId, StoreError>;

    async fn get(&self, collection: Collection, id: &RecordId) -> Result<Option<Document>, StoreError>;

    /// Merges `changes` into an existing document.
    async fn update(&self, collection: Collection, id: &RecordId, changes: Document) -> Result<(), StoreError>;

    async fn delete(&self, collection: Collection, id: &RecordId) -> Result<(), StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError>;
}

pub fn open_store(config: &StoreConfig) -> io::Result<Arc<dyn ContentStore>> {
    match config.kind {
        StoreKind::Memory => {
            info!("Using in-memory content store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::JsonFile => {
            let location = config.location.as_ref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "store.location is required for the json_file store")
            })?;
            info!("Using content store file {}", location.display());
            Ok(Arc::new(JsonFileStore::open(location)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::content::document::{CREATED_AT, PUBLISHED};
    use crate::test_data::{document, DRAFT_POST_DOC, OLDER_POST_DOC, PUBLISHED_POST_DOC};

    use super::*;

    fn stored(id: &str, json: &str) -> StoredDocument {
        StoredDocument {
            id: RecordId::from(id),
            data: document(json),
        }
    }

    fn ids(docs: &[StoredDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.id.0.as_str()).collect()
    }

    #[test]
    fn test_filter_and_order_desc() {
        let docs = vec![
            stored("c", OLDER_POST_DOC),
            stored("a", PUBLISHED_POST_DOC),
            stored("b", DRAFT_POST_DOC),
        ];
        let query = Query::collection(Collection::Blog)
            .where_eq(PUBLISHED, true)
            .order_by(CREATED_AT, Direction::Descending);
        let res = query.apply(docs.iter());
        assert_eq!(ids(&res), ["a", "c"]);
    }

    #[test]
    fn test_no_order_keeps_store_order() {
        let docs = vec![
            stored("b", DRAFT_POST_DOC),
            stored("c", OLDER_POST_DOC),
            stored("a", PUBLISHED_POST_DOC),
        ];
        let res = Query::collection(Collection::Blog).apply(docs.iter());
        assert_eq!(ids(&res), ["b", "c", "a"]);
    }

    #[test]
    fn test_missing_timestamp_sorts_last() {
        let mut no_date = stored("x", PUBLISHED_POST_DOC);
        no_date.data.remove(CREATED_AT);
        let docs = vec![no_date, stored("c", OLDER_POST_DOC), stored("a", PUBLISHED_POST_DOC)];

        let desc = Query::collection(Collection::Blog)
            .order_by(CREATED_AT, Direction::Descending)
            .apply(docs.iter());
        assert_eq!(ids(&desc), ["a", "c", "x"]);

        let asc = Query::collection(Collection::Blog)
            .order_by(CREATED_AT, Direction::Ascending)
            .apply(docs.iter());
        assert_eq!(ids(&asc), ["c", "a", "x"]);
    }
}
