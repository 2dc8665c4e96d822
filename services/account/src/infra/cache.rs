use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use crate::domain::repository::SessionStore;
use crate::error::ApiError;

/// Redis-backed web session state: `session:{id}` → user id, with the
/// configured TTL refreshed on every login.
#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
}

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

impl SessionStore for RedisSessionStore {
    async fn put(&self, session_id: &str, user_id: Uuid, ttl_secs: u64) -> Result<(), ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let key = session_key(session_id);
        let (): () = conn
            .set_ex(&key, user_id.to_string(), ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Uuid>, ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let key = session_key(session_id);
        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let key = session_key(session_id);
        let (): () = conn
            .del(&key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }
}
