//! JSON-file document store.
//!
//! A database is a directory holding one `<collection>.json` array per
//! collection. The directory is locked exclusively while the store is open.

use async_trait::async_trait;
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{
    delete_in, insert_into, update_in, validate_name, CollectionStore, DeleteResult, Document,
    Filter, InsertOneResult, UpdateResult,
};
use crate::error::{StoreError, StoreResult};

const LOCK_FILE: &str = ".lock";

pub struct FileStore {
    root: PathBuf,
    /// Held lock file; `None` once closed. Also serializes read-modify-write cycles.
    lock: Mutex<Option<File>>,
}

impl FileStore {
    /// Open (creating if needed) `<data_dir>/<database>` and lock it.
    pub fn open(data_dir: &Path, database: &str) -> StoreResult<Self> {
        validate_name(database)?;
        let root = data_dir.join(database);
        std::fs::create_dir_all(&root)?;

        let lock_path = root.join(LOCK_FILE);
        let file = File::create(&lock_path)?;
        file.try_lock_exclusive()
            .map_err(|_| StoreError::Locked(root.clone()))?;

        tracing::debug!(path = %root.display(), "opened file store");

        Ok(FileStore {
            root,
            lock: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> StoreResult<PathBuf> {
        validate_name(collection)?;
        Ok(self.root.join(format!("{collection}.json")))
    }

    async fn load(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let path = self.collection_path(collection)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            collection: collection.to_string(),
            reason: e.to_string(),
        })
    }

    /// Write through a temp file so a crash never leaves a half-written collection.
    async fn persist(&self, collection: &str, docs: &[Document]) -> StoreResult<()> {
        let path = self.collection_path(collection)?;
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_vec_pretty(docs)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl CollectionStore for FileStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let guard = self.lock.lock().await;
        guard.as_ref().ok_or(StoreError::Closed)?;

        let docs = self.load(collection).await?;
        Ok(docs.into_iter().find(|d| filter.matches(d)))
    }

    async fn find(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let guard = self.lock.lock().await;
        guard.as_ref().ok_or(StoreError::Closed)?;

        self.load(collection).await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<InsertOneResult> {
        let guard = self.lock.lock().await;
        guard.as_ref().ok_or(StoreError::Closed)?;

        let mut docs = self.load(collection).await?;
        let result = insert_into(collection, &mut docs, doc)?;
        self.persist(collection, &docs).await?;
        Ok(result)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult> {
        let guard = self.lock.lock().await;
        guard.as_ref().ok_or(StoreError::Closed)?;

        let mut docs = self.load(collection).await?;
        let result = update_in(&mut docs, filter, set);
        if result.modified_count > 0 {
            self.persist(collection, &docs).await?;
        }
        Ok(result)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let guard = self.lock.lock().await;
        guard.as_ref().ok_or(StoreError::Closed)?;

        let mut docs = self.load(collection).await?;
        let result = delete_in(&mut docs, filter);
        if result.deleted_count > 0 {
            self.persist(collection, &docs).await?;
        }
        Ok(result)
    }

    async fn close(&self) -> StoreResult<()> {
        if let Some(file) = self.lock.lock().await.take() {
            FileExt::unlock(&file)?;
            tracing::debug!(path = %self.root.display(), "closed file store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempdir().unwrap();

        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        let inserted = store
            .insert_one("users", doc(json!({ "name": "Alice", "email": "a@b" })))
            .await
            .unwrap();
        store.close().await.unwrap();

        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        let found = store
            .find_one("users", &Filter::id(&inserted.inserted_id))
            .await
            .unwrap()
            .expect("user persisted");
        assert_eq!(found["name"], json!("Alice"));
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), "agendaDB").unwrap();

        assert!(store.find("events").await.unwrap().is_empty());
        assert!(!dir.path().join("agendaDB").join("events.json").exists());
    }

    #[tokio::test]
    async fn test_second_open_is_locked_until_close() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), "agendaDB").unwrap();

        let err = FileStore::open(dir.path(), "agendaDB").err().expect("locked");
        assert!(matches!(err, StoreError::Locked(_)));

        store.close().await.unwrap();
        assert!(FileStore::open(dir.path(), "agendaDB").is_ok());
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        store.close().await.unwrap();

        let err = store.find("users").await.unwrap_err();
        assert!(matches!(err, StoreError::Closed));
    }

    #[tokio::test]
    async fn test_corrupt_collection_reported() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        std::fs::write(store.path().join("users.json"), "{ not json").unwrap();

        let err = store.find("users").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref collection, .. } if collection == "users"));
    }

    #[tokio::test]
    async fn test_delete_and_update_persist() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        store.insert_one("calendars", doc(json!({ "name": "Work" }))).await.unwrap();
        store.insert_one("calendars", doc(json!({ "name": "Home" }))).await.unwrap();

        let updated = store
            .update_one("calendars", &Filter::eq("name", "Work"), doc(json!({ "name": "Job" })))
            .await
            .unwrap();
        assert_eq!(updated.modified_count, 1);

        let deleted = store.delete_one("calendars", &Filter::eq("name", "Home")).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);
        store.close().await.unwrap();

        let store = FileStore::open(dir.path(), "agendaDB").unwrap();
        let all = store.find("calendars").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["name"], json!("Job"));
    }
}
