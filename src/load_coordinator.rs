use std::sync::Arc;

use spdlog::{debug, error, info};
use thiserror::Error;

use crate::content::document::{RecordError, CREATED_AT, PUBLISHED};
use crate::content::{Collection, ContentRecord, Post, Project, RecordId};
use crate::store::{ContentStore, Direction, Query, StoreError, StoredDocument};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: RecordId },
    #[error("malformed {collection} record {id}: {source}")]
    MalformedRecord {
        collection: Collection,
        id: RecordId,
        #[source]
        source: RecordError,
    },
}

impl From<StoreError> for LoadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => LoadError::StoreUnavailable(reason),
            StoreError::NotFound { collection, id } => LoadError::NotFound { collection, id },
        }
    }
}

/// Read side of the site: every query the public pages need.
#[derive(Clone)]
pub struct LoadCoordinator {
    store: Arc<dyn ContentStore>,
}

impl LoadCoordinator {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        LoadCoordinator { store }
    }

    /// Published posts, newest first.
    pub async fn fetch_public_posts(&self) -> Result<Vec<Post>, LoadError> {
        let query = Query::collection(Collection::Blog)
            .where_eq(PUBLISHED, true)
            .order_by(CREATED_AT, Direction::Descending);
        let docs = self.store.query(&query).await?;
        debug!("Fetched {} published posts", docs.len());
        docs.iter().map(decode_post).collect()
    }

    /// Every project, in the order the store keeps them.
    pub async fn fetch_public_projects(&self) -> Result<Vec<Project>, LoadError> {
        let docs = self.store.query(&Query::collection(Collection::Projects)).await?;
        debug!("Fetched {} projects", docs.len());
        docs.iter().map(decode_project).collect()
    }

    /// Unpublished posts can still be read by identifier.
    pub async fn load_one(&self, collection: Collection, id: &RecordId) -> Result<ContentRecord, LoadError> {
        let data = self.store.get(collection, id).await?
            .ok_or_else(|| LoadError::NotFound { collection, id: id.clone() })?;

        let doc = StoredDocument { id: id.clone(), data };
        match collection {
            Collection::Projects => decode_project(&doc).map(ContentRecord::Project),
            Collection::Blog => decode_post(&doc).map(ContentRecord::Post),
        }
    }

    pub async fn load_post(&self, id: &RecordId) -> Result<Post, LoadError> {
        match self.load_one(Collection::Blog, id).await? {
            ContentRecord::Post(post) => Ok(post),
            // load_one decodes blog documents as posts only
            ContentRecord::Project(_) => Err(LoadError::NotFound { collection: Collection::Blog, id: id.clone() }),
        }
    }
}

pub(crate) fn decode_post(doc: &StoredDocument) -> Result<Post, LoadError> {
    Post::from_document(doc.id.clone(), &doc.data).map_err(|source| LoadError::MalformedRecord {
        collection: Collection::Blog,
        id: doc.id.clone(),
        source,
    })
}

pub(crate) fn decode_project(doc: &StoredDocument) -> Result<Project, LoadError> {
    Project::from_document(doc.id.clone(), &doc.data).map_err(|source| LoadError::MalformedRecord {
        collection: Collection::Projects,
        id: doc.id.clone(),
        source,
    })
}

/// A rendered list that is replaced as a whole on every successful load and
/// left untouched when a load fails.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    name: &'static str,
    items: Vec<T>,
    error: Option<String>,
}

impl<T> Listing<T> {
    pub fn new(name: &'static str) -> Self {
        Listing {
            name,
            items: vec![],
            error: None,
        }
    }

    /// Applies a load result in the order results arrive: the last one
    /// applied wins.
    pub fn apply(&mut self, result: Result<Vec<T>, LoadError>) -> &[T] {
        match result {
            Ok(items) => {
                info!("Loaded {} {}", items.len(), self.name);
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                error!("Error loading {}: {}", self.name, e);
                self.error = Some(format!("Could not load {}.", self.name));
            }
        }
        &self.items
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
