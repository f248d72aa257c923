//! Login sessions.
//!
//! The browser holds a random token in the `sessionid` cookie; the server
//! keeps only the SHA-256 of that token mapped to a user id.

pub mod memory_store;
pub mod redis_store;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;

pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session backend error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("session lifetime of {0}s is out of range")]
    TtlOutOfRange(u64),
}

/// Longest session lifetime accepted from configuration (about 68 years).
pub const MAX_SESSION_TTL_SECONDS: u64 = i32::MAX as u64;

#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Opens a session for `user_id` and returns the cookie token.
    async fn create(&self, user_id: i64) -> Result<String, SessionError>;
    /// Resolves a cookie token; expired or unknown tokens yield `None`.
    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError>;
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;
}

pub(crate) fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn session_key(token: &str) -> String {
    format!("session:{:x}", Sha256::digest(token.as_bytes()))
}
