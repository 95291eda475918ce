//! Key-based queries shared by every entity kind.
//!
//! Each entity is a typed record stored in its own collection and looked up
//! by a human-facing key field (`name` or `title`). Keys are not unique in
//! the store, so every keyed operation acts on the first match only.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

use crate::error::{AgendaResult, StoreError};
use crate::store::{CollectionStore, DeleteResult, Document, Filter, InsertOneResult, UpdateResult};

/// A record type persisted in a named collection.
pub trait Entity: DeserializeOwned {
    /// Collection the records live in.
    const COLLECTION: &'static str;
    /// Field used by `find_by_key`, `update_by_key` and `delete_by_key`.
    const KEY_FIELD: &'static str;
}

pub struct Repository<'a, E> {
    store: &'a dyn CollectionStore,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    pub fn new(store: &'a dyn CollectionStore) -> Self {
        Repository {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn find_all(&self) -> AgendaResult<Vec<E>> {
        let docs = self.store.find(E::COLLECTION).await?;
        docs.into_iter().map(from_document).collect()
    }

    pub async fn find_by_key(&self, key: &str) -> AgendaResult<Option<E>> {
        self.find_one(&Filter::eq(E::KEY_FIELD, key)).await
    }

    pub async fn find_by_id(&self, id: &str) -> AgendaResult<Option<E>> {
        self.find_one(&Filter::id(id)).await
    }

    /// Apply `set` to the first record whose key matches. Zero counts mean nothing matched
    /// or nothing changed; neither is an error.
    pub async fn update_by_key(&self, key: &str, set: Document) -> AgendaResult<UpdateResult> {
        tracing::debug!(collection = E::COLLECTION, key, fields = set.len(), "update");
        let filter = Filter::eq(E::KEY_FIELD, key);
        Ok(self.store.update_one(E::COLLECTION, &filter, set).await?)
    }

    pub async fn delete_by_key(&self, key: &str) -> AgendaResult<DeleteResult> {
        tracing::debug!(collection = E::COLLECTION, key, "delete");
        let filter = Filter::eq(E::KEY_FIELD, key);
        Ok(self.store.delete_one(E::COLLECTION, &filter).await?)
    }

    pub(crate) async fn insert(&self, doc: Document) -> AgendaResult<InsertOneResult> {
        let result = self.store.insert_one(E::COLLECTION, doc).await?;
        tracing::debug!(collection = E::COLLECTION, id = %result.inserted_id, "insert");
        Ok(result)
    }

    async fn find_one(&self, filter: &Filter) -> AgendaResult<Option<E>> {
        self.store
            .find_one(E::COLLECTION, filter)
            .await?
            .map(from_document)
            .transpose()
    }
}

/// Map a stored document onto its typed record.
pub fn from_document<E: Entity>(doc: Document) -> AgendaResult<E> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| {
        StoreError::Corrupt {
            collection: E::COLLECTION.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Map a serializable value (record or patch) onto a store document.
pub fn to_document<T: Serialize>(value: &T) -> AgendaResult<Document> {
    match serde_json::to_value(value).map_err(StoreError::from)? {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgendaError;
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Note {
        #[serde(rename = "_id")]
        id: String,
        title: String,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";
        const KEY_FIELD: &'static str = "title";
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_keyed_operations() {
        let store = MemoryStore::new();
        let notes = Repository::<Note>::new(&store);
        notes.insert(doc(json!({ "title": "Groceries" }))).await.unwrap();

        let found = notes.find_by_key("Groceries").await.unwrap().unwrap();
        assert_eq!(found.title, "Groceries");
        let by_id = notes.find_by_id(&found.id).await.unwrap();
        assert_eq!(by_id, Some(found));

        let updated = notes
            .update_by_key("Groceries", doc(json!({ "title": "Shopping" })))
            .await
            .unwrap();
        assert_eq!(updated.modified_count, 1);
        assert!(notes.find_by_key("Groceries").await.unwrap().is_none());

        assert_eq!(notes.delete_by_key("Shopping").await.unwrap().deleted_count, 1);
        assert!(notes.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_is_corrupt() {
        let store = MemoryStore::new();
        store.insert_one("notes", doc(json!({ "title": 42 }))).await.unwrap();

        let err = Repository::<Note>::new(&store).find_all().await.unwrap_err();
        assert!(matches!(
            err,
            AgendaError::Store(StoreError::Corrupt { ref collection, .. }) if collection == "notes"
        ));
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        assert!(to_document(&"just a string").is_err());
        assert_eq!(to_document(&json!({ "a": 1 })).unwrap(), doc(json!({ "a": 1 })));
    }
}
