use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use extract::FormCompletionSession;

pub type SharedSession = Arc<Mutex<FormCompletionSession>>;

/// Live form sessions. Each session is serialized behind its own lock.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: FormCompletionSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone());
        shared
    }

    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions untouched for `max_idle`. Sessions in use are kept.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => guard.idle_for() < max_idle,
            Err(_) => true,
        });
        before.saturating_sub(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus::Category;
    use extract::FormRecord;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        let session = FormCompletionSession::from_record(FormRecord::new(Category::Rti));
        let id = session.id();

        store.insert(session);
        assert_eq!(store.get(&id).unwrap().lock().await.id(), id);
        assert!(store.remove(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.remove(&id));
    }

    #[tokio::test]
    async fn test_sweep_skips_locked_sessions() {
        let store = SessionStore::new();
        let held = store.insert(FormCompletionSession::from_record(FormRecord::new(Category::Rti)));
        store.insert(FormCompletionSession::from_record(FormRecord::new(Category::Divorce)));

        let _guard = held.lock().await;
        let swept = store.sweep_idle(Duration::ZERO);

        assert_eq!(swept, 1);
        assert_eq!(store.len(), 1);
    }
}
