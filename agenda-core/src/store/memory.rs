//! In-process store. Nothing survives the process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{
    delete_in, insert_into, update_in, validate_name, CollectionStore, DeleteResult, Document,
    Filter, InsertOneResult, UpdateResult,
};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Vec<Document>>,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let state = self.state.lock().await;
        state.collections.get(collection).map_or(0, Vec::len)
    }
}

impl State {
    fn open(&mut self) -> StoreResult<&mut Self> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(self)
    }

    fn collection(&mut self, name: &str) -> StoreResult<&mut Vec<Document>> {
        validate_name(name)?;
        Ok(self.open()?.collections.entry(name.to_string()).or_default())
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let mut state = self.state.lock().await;
        let docs = state.collection(collection)?;
        Ok(docs.iter().find(|d| filter.matches(d)).cloned())
    }

    async fn find(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut state = self.state.lock().await;
        Ok(state.collection(collection)?.clone())
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<InsertOneResult> {
        let mut state = self.state.lock().await;
        insert_into(collection, state.collection(collection)?, doc)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateResult> {
        let mut state = self.state.lock().await;
        Ok(update_in(state.collection(collection)?, filter, set))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut state = self.state.lock().await;
        Ok(delete_in(state.collection(collection)?, filter))
    }

    async fn close(&self) -> StoreResult<()> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}
