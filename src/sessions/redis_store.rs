use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use super::{new_token, session_key, SessionError, SessionStore};
use crate::redis_client::RedisClient;

#[derive(Clone)]
pub struct RedisSessionStore {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: i64) -> Result<String, SessionError> {
        let token = new_token();
        let mut conn = self.redis.conn.clone();
        let _: () = conn
            .set_ex(session_key(&token), user_id, self.ttl_seconds)
            .await?;
        debug!("opened session for user {}", user_id);
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError> {
        let mut conn = self.redis.conn.clone();
        let user_id: Option<i64> = conn.get(session_key(token)).await?;
        Ok(user_id)
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.redis.conn.clone();
        let _: () = conn.del(session_key(token)).await?;
        Ok(())
    }
}
