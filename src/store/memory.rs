use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{next_id, upsert, Record, Repository, StoreResult};

/// Volatile collection with the same semantics as the file backend.
pub struct MemoryRepository<T> {
    records: Mutex<Vec<T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.lock().await.clone())
    }

    async fn get(&self, id: u64) -> StoreResult<Option<T>> {
        Ok(self.records.lock().await.iter().find(|record| record.id() == id).cloned())
    }

    async fn create(&self, mut record: T) -> StoreResult<T> {
        let mut records = self.records.lock().await;
        record.set_id(next_id(&records));
        records.push(record.clone());
        Ok(record)
    }

    async fn put(&self, record: T) -> StoreResult<()> {
        upsert(&mut *self.records.lock().await, record);
        Ok(())
    }

    async fn delete(&self, id: u64) -> StoreResult<bool> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }

    async fn replace_all(&self, records: Vec<T>) -> StoreResult<()> {
        *self.records.lock().await = records;
        Ok(())
    }
}
