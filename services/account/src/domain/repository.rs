#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    AccessToken, CodeKind, Credential, IdentityType, OutboxEvent, ProfileChanges, RefreshToken,
    User, VerificationCode, WxSession,
};
use crate::error::ApiError;

/// Repository for account profiles. Lookups never return soft-deleted rows.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn organization_exists(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Insert a user, their credential and (for email registrations) the
    /// activation code plus its outbox event, all in one transaction.
    async fn create_with_auth(
        &self,
        user: &User,
        auth: &Credential,
        activation: Option<(&VerificationCode, &OutboxEvent)>,
    ) -> Result<(), ApiError>;

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<(), ApiError>;
}

/// Repository for credential records.
pub trait CredentialRepository: Send + Sync {
    async fn find_by_type_and_identifier(
        &self,
        identity_type: IdentityType,
        identifier: &str,
    ) -> Result<Option<Credential>, ApiError>;

    /// Replace the stored hash (password change, session-key rotation).
    async fn update_credential(&self, id: Uuid, credential: &str) -> Result<(), ApiError>;
}

/// Repository for access/refresh token pairs.
pub trait TokenRepository: Send + Sync {
    /// Delete every token owned by the pair's user and insert the new
    /// pair, atomically. At most one live pair per user.
    async fn replace_for_user(
        &self,
        access: &AccessToken,
        refresh: &RefreshToken,
    ) -> Result<(), ApiError>;

    async fn find_access(&self, token: &str) -> Result<Option<AccessToken>, ApiError>;

    async fn find_refresh(&self, token: &str) -> Result<Option<RefreshToken>, ApiError>;

    /// Delete every token for the user. Idempotent.
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), ApiError>;
}

/// Repository for one-time email codes.
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert a code and its email outbox event in the same transaction.
    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), ApiError>;

    /// Find an unconsumed code by user + code string, any kind.
    async fn find_unconsumed(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError>;

    /// Find a code by user + kind + code string regardless of state.
    async fn find_by_kind_and_code(
        &self,
        user_id: Uuid,
        kind: CodeKind,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError>;

    async fn mark_consumed(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Server-side web session state.
pub trait SessionStore: Send + Sync {
    async fn put(&self, session_id: &str, user_id: Uuid, ttl_secs: u64) -> Result<(), ApiError>;

    async fn get(&self, session_id: &str) -> Result<Option<Uuid>, ApiError>;

    async fn delete(&self, session_id: &str) -> Result<(), ApiError>;
}

/// Port for the WeChat code2session exchange.
pub trait WxClient: Send + Sync {
    async fn code_to_session(&self, code: &str) -> Result<WxSession, ApiError>;
}
