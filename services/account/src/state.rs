use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::config::AccountConfig;
use crate::infra::cache::RedisSessionStore;
use crate::infra::db::{
    DbCredentialRepository, DbTokenRepository, DbUserRepository, DbVerificationCodeRepository,
};
use crate::infra::wechat::HttpWxClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub http: reqwest::Client,
    pub config: Arc<AccountConfig>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn credential_repo(&self) -> DbCredentialRepository {
        DbCredentialRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_store(&self) -> RedisSessionStore {
        RedisSessionStore {
            pool: self.redis.clone(),
        }
    }

    pub fn wx_client(&self) -> HttpWxClient {
        HttpWxClient {
            http: self.http.clone(),
            api_base: self.config.wechat_api_base.clone(),
            app_id: self.config.wechat_app_id.clone(),
            app_secret: self.config.wechat_app_secret.clone(),
        }
    }
}
