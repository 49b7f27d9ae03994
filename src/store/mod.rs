//! Record store
//!
//! Four collections (users, team members, tasks, work logs), each behind a
//! key-addressed [`Repository`]. The production backend keeps one JSON array
//! file per collection; an in-memory backend with the same interface is used
//! by tests and tooling.

mod json;
mod memory;
pub mod seed;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

pub use json::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::models::task::Task;
use crate::models::team_member::TeamMember;
use crate::models::user::User;
use crate::models::work_log::WorkLog;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{collection} already holds a record with id {id}")]
    IdTaken { collection: &'static str, id: u64 },
    #[error("failed to encode {collection}: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A persisted record addressed by a numeric id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name; also the file stem on disk.
    const COLLECTION: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);
}

/// Key-addressed access to one collection. Implementations serialize every
/// operation on a collection, so two writers touching different records never
/// lose each other's changes.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> StoreResult<Vec<T>>;

    async fn get(&self, id: u64) -> StoreResult<Option<T>>;

    /// Inserts `record` under a freshly assigned id and returns it.
    async fn create(&self, record: T) -> StoreResult<T>;

    /// Inserts or replaces the record with the same id.
    async fn put(&self, record: T) -> StoreResult<()>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: u64) -> StoreResult<bool>;

    /// Replaces the whole collection.
    async fn replace_all(&self, records: Vec<T>) -> StoreResult<()>;
}

/// Next id for a collection: one past the current maximum.
pub(crate) fn next_id<T: Record>(records: &[T]) -> u64 {
    records.iter().map(|record| record.id()).max().map_or(1, |max| max + 1)
}

pub(crate) fn upsert<T: Record>(records: &mut Vec<T>, record: T) {
    match records.iter_mut().find(|existing| existing.id() == record.id()) {
        Some(slot) => *slot = record,
        None => records.push(record),
    }
}

#[derive(Clone)]
pub struct RecordStore {
    pub users: Arc<dyn Repository<User>>,
    pub team_members: Arc<dyn Repository<TeamMember>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub work_logs: Arc<dyn Repository<WorkLog>>,
    pairing: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Opens (without creating) the JSON collections under `dir`.
    pub fn open_json(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users: Arc::new(JsonFileRepository::<User>::in_dir(dir)),
            team_members: Arc::new(JsonFileRepository::<TeamMember>::in_dir(dir)),
            tasks: Arc::new(JsonFileRepository::<Task>::in_dir(dir)),
            work_logs: Arc::new(JsonFileRepository::<WorkLog>::in_dir(dir)),
            pairing: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::<User>::default()),
            team_members: Arc::new(MemoryRepository::<TeamMember>::default()),
            tasks: Arc::new(MemoryRepository::<Task>::default()),
            work_logs: Arc::new(MemoryRepository::<WorkLog>::default()),
            pairing: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes operations that must keep users and team members aligned.
    pub async fn lock_pairing(&self) -> MutexGuard<'_, ()> {
        self.pairing.lock().await
    }

    /// Creates a user and its profile under the same id. If the profile
    /// cannot be written the user is removed again, so the two collections
    /// never diverge. The caller must hold [`Self::lock_pairing`].
    pub async fn create_user_with_profile(
        &self,
        user: User,
        mut member: TeamMember,
    ) -> StoreResult<(User, TeamMember)> {
        let user = self.users.create(user).await?;
        member.id = user.id;

        let profile_write = match self.team_members.get(user.id).await {
            Ok(Some(_)) => Err(StoreError::IdTaken {
                collection: TeamMember::COLLECTION,
                id: user.id,
            }),
            Ok(None) => self.team_members.put(member.clone()).await,
            Err(err) => Err(err),
        };

        if let Err(err) = profile_write {
            tracing::warn!(user_id = user.id, error = %err, "profile write failed, rolling back user");
            if let Err(rollback) = self.users.delete(user.id).await {
                tracing::error!(user_id = user.id, error = %rollback, "user rollback failed");
            }
            return Err(err);
        }

        Ok((user, member))
    }

    /// Cheap readability probe used by the health endpoint.
    pub async fn check(&self) -> StoreResult<()> {
        self.users.list().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::LegacyPosition;

    fn user(email: &str) -> User {
        User {
            id: 0,
            email: email.to_string(),
            password_hash: "x".to_string(),
            name: "Someone".to_string(),
            role: "QA Analyst".to_string(),
            position: LegacyPosition::RegularEmployee.into(),
            team_id: Some(1),
            created_date: None,
            is_active: true,
            needs_password_reset: false,
        }
    }

    #[tokio::test]
    async fn paired_create_shares_the_user_id() {
        let store = RecordStore::in_memory();
        let _guard = store.lock_pairing().await;

        let (u1, m1) = store
            .create_user_with_profile(user("a@example.com"), TeamMember::new(99, "A", "a@example.com", "QA"))
            .await
            .unwrap();
        let (u2, m2) = store
            .create_user_with_profile(user("b@example.com"), TeamMember::new(0, "B", "b@example.com", "QA"))
            .await
            .unwrap();

        assert_eq!((u1.id, m1.id), (1, 1));
        assert_eq!((u2.id, m2.id), (2, 2));
        assert_eq!(store.team_members.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn paired_create_never_overwrites_an_existing_profile() {
        let store = RecordStore::in_memory();
        let stale = TeamMember::new(1, "Left Behind", "old@example.com", "QA");
        store.team_members.put(stale.clone()).await.unwrap();

        let _guard = store.lock_pairing().await;
        let err = store
            .create_user_with_profile(user("new@example.com"), TeamMember::new(0, "New", "new@example.com", "QA"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::IdTaken { id: 1, .. }), "{err}");
        assert!(store.users.list().await.unwrap().is_empty());
        let members = store.team_members.list().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, stale.name);
    }

    #[test]
    fn next_id_starts_at_one() {
        let empty: Vec<User> = Vec::new();
        assert_eq!(next_id(&empty), 1);

        let mut records = vec![user("a@example.com")];
        records[0].id = 41;
        assert_eq!(next_id(&records), 42);
    }
}
