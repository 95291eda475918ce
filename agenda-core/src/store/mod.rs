//! Collection-oriented document store.
//!
//! The entities only need single-field equality lookups and single-document
//! writes, so the store contract is deliberately small. Two implementations
//! exist: [`MemoryStore`] for tests and throwaway sessions, and [`FileStore`]
//! which keeps each collection as a JSON file on disk.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};

/// A schemaless record.
pub type Document = Map<String, Value>;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Single-field equality filter, e.g. `{name: "Work"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOneResult {
    pub inserted_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Minimal contract of a named-collection document store.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// First document matching `filter`, in insertion order.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Every document of the collection, in insertion order.
    async fn find(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Insert a document, assigning an `_id` when it has none.
    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<InsertOneResult>;

    /// Set the fields of `set` on the first document matching `filter`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult>;

    /// Remove the first document matching `filter`.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult>;

    /// Release the underlying connection. Later calls fail with [`StoreError::Closed`].
    async fn close(&self) -> StoreResult<()>;
}

pub type SharedStore = Arc<dyn CollectionStore>;

// =============================================================================
// Shared collection operations
// =============================================================================

/// Insert `doc` into `docs`, generating a UUID `_id` if absent.
pub(crate) fn insert_into(
    collection: &str,
    docs: &mut Vec<Document>,
    mut doc: Document,
) -> StoreResult<InsertOneResult> {
    let id = match doc.get(ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    };

    let filter = Filter::eq(ID_FIELD, doc[ID_FIELD].clone());
    if docs.iter().any(|d| filter.matches(d)) {
        return Err(StoreError::DuplicateId {
            collection: collection.to_string(),
            id,
        });
    }

    docs.push(doc);
    Ok(InsertOneResult { inserted_id: id })
}

/// Apply `set` to the first match. `_id` is immutable and ignored in `set`.
pub(crate) fn update_in(docs: &mut [Document], filter: &Filter, set: Document) -> UpdateResult {
    let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) else {
        return UpdateResult::default();
    };

    let mut modified = false;
    for (key, value) in set {
        if key == ID_FIELD {
            continue;
        }
        if doc.get(&key) != Some(&value) {
            doc.insert(key, value);
            modified = true;
        }
    }

    UpdateResult {
        matched_count: 1,
        modified_count: u64::from(modified),
    }
}

pub(crate) fn delete_in(docs: &mut Vec<Document>, filter: &Filter) -> DeleteResult {
    match docs.iter().position(|d| filter.matches(d)) {
        Some(index) => {
            docs.remove(index);
            DeleteResult { deleted_count: 1 }
        }
        None => DeleteResult::default(),
    }
}

/// Collection and database names become file names, so keep them to one path segment.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidCollection(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_assigns_id() {
        let mut docs = Vec::new();
        let result = insert_into("users", &mut docs, doc(json!({ "name": "Alice" }))).unwrap();

        assert!(!result.inserted_id.is_empty());
        assert_eq!(docs[0][ID_FIELD], json!(result.inserted_id));
    }

    #[test]
    fn test_insert_keeps_supplied_id_and_rejects_duplicates() {
        let mut docs = Vec::new();
        let result = insert_into("users", &mut docs, doc(json!({ "_id": "u1" }))).unwrap();
        assert_eq!(result.inserted_id, "u1");

        let err = insert_into("users", &mut docs, doc(json!({ "_id": "u1" }))).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { ref id, .. } if id == "u1"));
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_update_counts_only_real_changes() {
        let mut docs = vec![doc(json!({ "_id": "1", "name": "Work" }))];

        let same = update_in(&mut docs, &Filter::eq("name", "Work"), doc(json!({ "name": "Work" })));
        assert_eq!(same, UpdateResult { matched_count: 1, modified_count: 0 });

        let empty = update_in(&mut docs, &Filter::eq("name", "Work"), Document::new());
        assert_eq!(empty, UpdateResult { matched_count: 1, modified_count: 0 });

        let changed = update_in(&mut docs, &Filter::eq("name", "Work"), doc(json!({ "name": "Job" })));
        assert_eq!(changed, UpdateResult { matched_count: 1, modified_count: 1 });
        assert_eq!(docs[0]["name"], json!("Job"));
    }

    #[test]
    fn test_update_ignores_id() {
        let mut docs = vec![doc(json!({ "_id": "1", "name": "Work" }))];
        let result = update_in(&mut docs, &Filter::id("1"), doc(json!({ "_id": "2" })));

        assert_eq!(result.modified_count, 0);
        assert_eq!(docs[0][ID_FIELD], json!("1"));
    }

    #[test]
    fn test_update_and_delete_touch_first_match_only() {
        let mut docs = vec![
            doc(json!({ "_id": "1", "title": "Standup" })),
            doc(json!({ "_id": "2", "title": "Standup" })),
        ];

        update_in(&mut docs, &Filter::eq("title", "Standup"), doc(json!({ "time": "09:00" })));
        assert!(docs[0].contains_key("time"));
        assert!(!docs[1].contains_key("time"));

        let deleted = delete_in(&mut docs, &Filter::eq("title", "Standup"));
        assert_eq!(deleted.deleted_count, 1);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0][ID_FIELD], json!("2"));
    }

    #[test]
    fn test_delete_missing_is_zero() {
        let mut docs = vec![doc(json!({ "_id": "1" }))];
        assert_eq!(delete_in(&mut docs, &Filter::id("nope")).deleted_count, 0);
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("users").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
    }
}
