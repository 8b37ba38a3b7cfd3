use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::document::Document;
use crate::content::{Collection, RecordId};
use crate::store::{Query, StoreError, StoredDocument};

/// Documents of both collections, kept in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub projects: Vec<StoredDocument>,
    #[serde(default)]
    pub blog: Vec<StoredDocument>,
}

impl Collections {
    fn docs(&self, collection: Collection) -> &Vec<StoredDocument> {
        match collection {
            Collection::Projects => &self.projects,
            Collection::Blog => &self.blog,
        }
    }

    fn docs_mut(&mut self, collection: Collection) -> &mut Vec<StoredDocument> {
        match collection {
            Collection::Projects => &mut self.projects,
            Collection::Blog => &mut self.blog,
        }
    }

    pub fn insert(&mut self, collection: Collection, id: RecordId, data: Document) {
        let docs = self.docs_mut(collection);
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.data = data,
            None => docs.push(StoredDocument { id, data }),
        }
    }

    pub fn create(&mut self, collection: Collection, data: Document) -> RecordId {
        // v4 identifiers are never handed out twice, so deleted ids are not reused either
        let id = RecordId(Uuid::new_v4().to_string());
        self.docs_mut(collection).push(StoredDocument { id: id.clone(), data });
        id
    }

    pub fn get(&self, collection: Collection, id: &RecordId) -> Option<&Document> {
        self.docs(collection)
            .iter()
            .find(|doc| &doc.id == id)
            .map(|doc| &doc.data)
    }

    pub fn update(&mut self, collection: Collection, id: &RecordId, changes: Document) -> Result<(), StoreError> {
        let doc = self.docs_mut(collection)
            .iter_mut()
            .find(|doc| &doc.id == id)
            .ok_or_else(|| StoreError::NotFound { collection, id: id.clone() })?;

        for (field, value) in changes {
            doc.data.insert(field, value);
        }
        Ok(())
    }

    pub fn delete(&mut self, collection: Collection, id: &RecordId) -> Result<(), StoreError> {
        let docs = self.docs_mut(collection);
        let before = docs.len();
        docs.retain(|doc| &doc.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound { collection, id: id.clone() });
        }
        Ok(())
    }

    pub fn query(&self, query: &Query) -> Vec<StoredDocument> {
        query.apply(self.docs(query.collection).iter())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::content::document::TITLE;
    use crate::test_data::{document, PROJECT_DOC};

    use super::*;

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut collections = Collections::default();
        let first = collections.create(Collection::Projects, document(PROJECT_DOC));
        let second = collections.create(Collection::Projects, document(PROJECT_DOC));
        assert_ne!(first, second);
        assert!(collections.get(Collection::Projects, &first).is_some());
        assert!(collections.get(Collection::Blog, &first).is_none());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut collections = Collections::default();
        let id = collections.create(Collection::Projects, document(PROJECT_DOC));

        let mut changes = Document::new();
        changes.insert(TITLE.into(), Value::from("Renamed"));
        collections.update(Collection::Projects, &id, changes).unwrap();

        let doc = collections.get(Collection::Projects, &id).unwrap();
        assert_eq!(doc.get(TITLE), Some(&Value::from("Renamed")));
        assert_eq!(doc.len(), document(PROJECT_DOC).len());
    }

    #[test]
    fn test_update_and_delete_unknown_id() {
        let mut collections = Collections::default();
        let id = RecordId::from("missing-id");
        let res = collections.update(Collection::Blog, &id, Document::new());
        assert!(matches!(res, Err(StoreError::NotFound { collection: Collection::Blog, .. })));
        let res = collections.delete(Collection::Blog, &id);
        assert!(matches!(res, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_delete() {
        let mut collections = Collections::default();
        let id = collections.create(Collection::Projects, document(PROJECT_DOC));
        collections.delete(Collection::Projects, &id).unwrap();
        assert!(collections.get(Collection::Projects, &id).is_none());
        assert!(collections.projects.is_empty());
    }
}
