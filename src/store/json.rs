use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{next_id, upsert, Record, Repository, StoreError, StoreResult};

/// One collection stored as a pretty-printed JSON array. A missing file reads
/// as an empty collection; writes land in a sibling temp file that is renamed
/// over the original.
pub struct JsonFileRepository<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// `<dir>/<collection>.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", T::COLLECTION)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, records: &[T]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Encode {
            collection: T::COLLECTION,
            source,
        })?;

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        tracing::debug!(collection = T::COLLECTION, records = records.len(), "collection written");
        Ok(())
    }
}

#[async_trait]
impl<T: Record> Repository<T> for JsonFileRepository<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, id: u64) -> StoreResult<Option<T>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|record| record.id() == id))
    }

    async fn create(&self, mut record: T) -> StoreResult<T> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        record.set_id(next_id(&records));
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn put(&self, record: T) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        upsert(&mut records, record);
        self.save(&records).await
    }

    async fn delete(&self, id: u64) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    async fn replace_all(&self, records: Vec<T>) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.save(&records).await
    }
}
