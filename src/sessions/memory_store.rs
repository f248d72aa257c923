use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{new_token, session_key, SessionError, SessionStore};

pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, (i64, Instant)>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i64) -> Result<String, SessionError> {
        let now = Instant::now();
        let expires = now
            .checked_add(self.ttl)
            .ok_or(SessionError::TtlOutOfRange(self.ttl.as_secs()))?;
        let token = new_token();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, (_, expiry)| *expiry > now);
        sessions.insert(session_key(&token), (user_id, expires));
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(&session_key(token))
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.lock().await.remove(&session_key(token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_until_destroyed() {
        let store = MemorySessionStore::new(60);
        let token = store.create(7).await.unwrap();

        assert_eq!(store.user_id(&token).await.unwrap(), Some(7));
        assert_eq!(store.user_id("bogus").await.unwrap(), None);

        store.destroy(&token).await.unwrap();
        assert_eq!(store.user_id(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unrepresentable_ttl_is_an_error() {
        let store = MemorySessionStore::new(u64::MAX);
        let err = store.create(1).await.unwrap_err();
        assert!(matches!(err, SessionError::TtlOutOfRange(u64::MAX)));
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire() {
        let store = MemorySessionStore::new(10);
        let token = store.create(1).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(store.user_id(&token).await.unwrap(), None);
    }
}
