use super::EditingSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Shared handle to one open session. Holding its lock serializes edits and
/// saves of that session.
pub type SessionHandle = Arc<Mutex<EditingSession>>;

struct SessionEntry {
    session: SessionHandle,
    last_touched: Instant,
}

/// Open editing sessions keyed by session id.
///
/// Sessions idle for longer than the TTL are treated as abandoned: lookups
/// miss them and the next open sweeps them out.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn insert(&self, session: EditingSession) -> Uuid {
        let session_id = session.session_id();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Instant::now();
        sessions.retain(|_, entry| now.duration_since(entry.last_touched) < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            metrics::counter!("roleadmin_sessions_expired_total").increment(expired as u64);
            tracing::info!(expired, "idle editing sessions evicted");
        }
        sessions.insert(
            session_id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                last_touched: now,
            },
        );
        metrics::counter!("roleadmin_sessions_opened_total").increment(1);
        session_id
    }

    /// Live session handle; refreshes the idle timer.
    pub async fn handle(&self, session_id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let idle = now.duration_since(sessions.get(&session_id)?.last_touched);
        if idle >= self.ttl {
            sessions.remove(&session_id);
            metrics::counter!("roleadmin_sessions_expired_total").increment(1);
            tracing::info!(%session_id, "editing session expired");
            return None;
        }
        let entry = sessions.get_mut(&session_id)?;
        entry.last_touched = now;
        Some(entry.session.clone())
    }

    pub async fn get(&self, session_id: Uuid) -> Option<EditingSession> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    pub async fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&EditingSession) -> R,
    ) -> Option<R> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Some(f(&session))
    }

    pub async fn with_session_mut<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut EditingSession) -> R,
    ) -> Option<R> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        Some(f(&mut session))
    }

    pub async fn remove(&self, session_id: Uuid) -> Option<SessionHandle> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|entry| entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectorySnapshot, ScopeLabels};
    use scopegrant_authz::{ScopeTree, Tenant, TenantId};

    fn session() -> EditingSession {
        let tree = ScopeTree::builder()
            .tenant(Tenant { id: TenantId::new(1) })
            .build()
            .expect("tree");
        EditingSession::new_role(Arc::new(DirectorySnapshot {
            tree,
            labels: ScopeLabels::default(),
        }))
    }

    #[tokio::test]
    async fn sessions_are_isolated_and_removable() {
        let registry = SessionRegistry::default();
        let first = registry.insert(session()).await;
        let second = registry.insert(session()).await;
        assert_ne!(first, second);

        registry
            .with_session_mut(first, |session| {
                session.toggle(&scopegrant_authz::ScopeNode::tenant(TenantId::new(1)))
            })
            .await
            .expect("session")
            .expect("toggle");
        assert_eq!(registry.get(first).await.expect("first").grants().len(), 1);
        assert!(registry.get(second).await.expect("second").grants().is_empty());

        assert!(registry.remove(first).await.is_some());
        assert!(registry.with_session(first, |_| ()).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let registry = SessionRegistry::new(Duration::from_millis(30));
        let stale = registry.insert(session()).await;
        registry.insert(session()).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(registry.get(stale).await.is_none());
        let fresh = registry.insert(session()).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(fresh).await.is_some());
    }

    #[tokio::test]
    async fn access_refreshes_the_idle_timer() {
        let registry = SessionRegistry::new(Duration::from_millis(300));
        let session_id = registry.insert(session()).await;
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(150)).await;
            assert!(registry.handle(session_id).await.is_some());
        }
    }
}
