use crate::domain::ports::{document_id, touch, Collection, Document, FieldUpdate, RecordStore};
use crate::utils::error::{BoardError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

const UNLIMITED: usize = usize::MAX;

#[derive(Debug)]
struct Entry {
    seq: u64,
    document: Document,
}

/// Process-local document store.
///
/// Every write takes the collection's write lock, so single-document updates are
/// atomic with respect to each other. Clones share the same data.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    collections: Arc<HashMap<Collection, RwLock<HashMap<String, Entry>>>>,
    next_seq: Arc<AtomicU64>,
    writes: Arc<AtomicUsize>,
    write_budget: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let collections: HashMap<Collection, RwLock<HashMap<String, Entry>>> = Collection::all()
            .into_iter()
            .map(|collection| (collection, RwLock::new(HashMap::new())))
            .collect();
        Self {
            collections: Arc::new(collections),
            next_seq: Arc::new(AtomicU64::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            write_budget: Arc::new(AtomicUsize::new(UNLIMITED)),
        }
    }

    /// Writes applied so far: inserts, deletes (hit or miss) and updates of existing records.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Lets `allowed` more writes succeed, then fails every write with a store error
    /// until [`InMemoryStore::heal`] is called.
    pub fn fail_writes_after(&self, allowed: usize) {
        self.write_budget.store(allowed, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.write_budget.store(UNLIMITED, Ordering::SeqCst);
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.table(collection).read().await.len()
    }

    fn table(&self, collection: Collection) -> &RwLock<HashMap<String, Entry>> {
        // 所有集合都在 new() 建立
        &self.collections[&collection]
    }

    fn take_write_permit(&self) -> Result<()> {
        self.write_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |budget| match budget {
                0 => None,
                UNLIMITED => Some(UNLIMITED),
                n => Some(n - 1),
            })
            .map(|_| ())
            .map_err(|_| BoardError::store("injected write failure"))
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let table = self.table(collection).read().await;
        Ok(table.get(id).map(|entry| entry.document.clone()))
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let id = document_id(&document)?.to_string();
        let mut table = self.table(collection).write().await;
        if table.contains_key(&id) {
            return Err(BoardError::store(format!(
                "duplicate id {} in {}",
                id, collection
            )));
        }
        self.take_write_permit()?;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        table.insert(id, Entry { seq, document });
        self.record_write();
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let mut table = self.table(collection).write().await;
        self.take_write_permit()?;
        let removed = table.remove(id).is_some();
        self.record_write();
        Ok(removed)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        update: FieldUpdate,
    ) -> Result<bool> {
        let mut table = self.table(collection).write().await;
        let Some(entry) = table.get_mut(id) else {
            return Ok(false);
        };
        self.take_write_permit()?;

        let mut document = entry.document.clone();
        update.apply(&mut document)?;
        touch(&mut document)?;
        entry.document = document;
        self.record_write();
        Ok(true)
    }

    async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        let table = self.table(collection).read().await;
        let mut matches: Vec<&Entry> = table
            .values()
            .filter(|entry| entry.document.get(field).and_then(Value::as_str) == Some(value))
            .collect();
        matches.sort_by_key(|entry| entry.seq);
        Ok(matches.into_iter().map(|entry| entry.document.clone()).collect())
    }
}
