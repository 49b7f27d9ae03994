//! Session registry
//!
//! Opaque bearer tokens mapped to a snapshot of the user taken at issue
//! time. A session is active until its fixed expiry; an expired session is
//! indistinguishable from a missing one and is dropped the first time it is
//! looked up. Nothing is persisted, so a restart logs everyone out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::MAX_SESSION_TTL_HOURS;
use crate::models::user::SessionUser;
use crate::utils::{generate_reset_code, generate_token, utc_now};

const RESET_CODE_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Backing storage for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &str) -> Option<Session>;

    async fn put(&self, token: String, session: Session);

    /// Returns whether the token existed.
    async fn delete(&self, token: &str) -> bool;

    /// Drops every session expired at `now`; returns how many were removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> usize;

    async fn len(&self) -> usize;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.lock().await.get(token).cloned()
    }

    async fn put(&self, token: String, session: Session) {
        self.sessions.lock().await.insert(token, session);
    }

    async fn delete(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Issues and resolves session tokens over a [`SessionStore`].
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore>, ttl_hours: i64) -> Self {
        Self {
            store,
            ttl: Duration::hours(ttl_hours.clamp(0, MAX_SESSION_TTL_HOURS)),
        }
    }

    pub fn in_memory(ttl_hours: i64) -> Self {
        Self::new(Arc::new(InMemorySessionStore::default()), ttl_hours)
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Creates a brand-new session. Earlier sessions of the same user stay valid.
    pub async fn issue(&self, user: SessionUser) -> String {
        let token = generate_token();
        let session = Session {
            user,
            expires: utc_now().checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        tracing::debug!(user_id = session.user.id, expires = %session.expires, "session issued");
        self.store.put(token.clone(), session).await;
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<SessionUser> {
        let session = self.store.get(token).await?;

        if session.is_expired_at(utc_now()) {
            self.store.delete(token).await;
            tracing::debug!(user_id = session.user.id, "expired session dropped on lookup");
            return None;
        }

        Some(session.user)
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.store.delete(token).await
    }

    pub async fn sweep(&self) -> usize {
        self.store.sweep_expired(utc_now()).await
    }

    /// Periodically sweeps expired sessions until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: StdDuration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = registry.sweep().await;
                if removed > 0 {
                    tracing::info!(removed, "expired sessions swept");
                }
            }
        })
    }
}

/// Outstanding password-reset codes, one per email.
#[derive(Default)]
pub struct ResetCodes {
    codes: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
}

impl ResetCodes {
    pub async fn issue(&self, email: &str) -> String {
        let code = generate_reset_code();
        let expires = utc_now() + Duration::minutes(RESET_CODE_TTL_MINUTES);
        self.codes
            .lock()
            .await
            .insert(email.trim().to_ascii_lowercase(), (code.clone(), expires));
        code
    }

    /// Consumes the code if it matches the latest one for `email` and has not
    /// expired. A consumed or mismatched code never validates again.
    pub async fn consume(&self, email: &str, code: &str) -> bool {
        let key = email.trim().to_ascii_lowercase();
        let mut codes = self.codes.lock().await;

        let valid = match codes.get(&key) {
            Some((expected, expires)) => *expires > utc_now() && expected.eq_ignore_ascii_case(code.trim()),
            None => false,
        };

        if valid {
            codes.remove(&key);
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::Tier;

    fn user(id: u64) -> SessionUser {
        SessionUser {
            id,
            email: format!("user{id}@example.com"),
            name: "User".to_string(),
            role: "QA Analyst".to_string(),
            position: Tier::Employee,
            team_id: Some(1),
            needs_password_reset: false,
        }
    }

    #[tokio::test]
    async fn issued_token_resolves_to_snapshot() {
        let registry = SessionRegistry::in_memory(24);
        let token = registry.issue(user(3)).await;

        assert_eq!(token.len(), 64);
        assert_eq!(registry.resolve(&token).await, Some(user(3)));
        assert_eq!(registry.resolve("nope").await, None);
    }

    #[tokio::test]
    async fn oversized_ttl_is_capped_instead_of_overflowing() {
        let registry = SessionRegistry::in_memory(10_000_000_000);
        let token = registry.issue(user(3)).await;

        let session = registry.store().get(&token).await.expect("session stored");
        assert!(session.expires <= utc_now() + Duration::hours(MAX_SESSION_TTL_HOURS));
        assert_eq!(registry.resolve(&token).await, Some(user(3)));
    }

    #[tokio::test]
    async fn expired_session_is_removed_on_lookup() {
        let registry = SessionRegistry::in_memory(24);
        let session = Session {
            user: user(3),
            expires: utc_now() - Duration::minutes(1),
        };
        registry.store().put("stale".to_string(), session).await;
        assert_eq!(registry.store().len().await, 1);

        assert_eq!(registry.resolve("stale").await, None);
        assert_eq!(registry.store().len().await, 0);
    }

    #[tokio::test]
    async fn new_login_does_not_revoke_older_tokens() {
        let registry = SessionRegistry::in_memory(24);
        let first = registry.issue(user(3)).await;
        let second = registry.issue(user(3)).await;

        assert_ne!(first, second);
        assert!(registry.resolve(&first).await.is_some());
        assert!(registry.revoke(&second).await);
        assert!(registry.resolve(&second).await.is_none());
        assert!(registry.resolve(&first).await.is_some());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired() {
        let registry = SessionRegistry::in_memory(24);
        registry.issue(user(1)).await;
        registry
            .store()
            .put(
                "old".to_string(),
                Session {
                    user: user(2),
                    expires: utc_now() - Duration::hours(1),
                },
            )
            .await;

        assert_eq!(registry.sweep().await, 1);
        assert_eq!(registry.store().len().await, 1);
    }

    #[tokio::test]
    async fn reset_codes_are_single_use() {
        let codes = ResetCodes::default();
        let code = codes.issue("Analyst@QA-team.com").await;

        assert!(!codes.consume("analyst@qa-team.com", "WRONG000").await);
        assert!(codes.consume("analyst@qa-team.com", &code).await);
        assert!(!codes.consume("analyst@qa-team.com", &code).await);
    }
}
