use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Duration, Utc};
use rand::Rng as _;
use uuid::Uuid;

use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::types::{AccessToken, RefreshToken, TOKEN_BYTE_LEN};
use crate::error::ApiError;

/// Generate an opaque token value: 32 CSPRNG bytes, standard base64.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTE_LEN];
    rand::rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Freshly issued pair returned by login, register, refresh and the
/// mini-program bridge.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    /// Absolute expiry of the access token, seconds since the epoch.
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Mint a new pair for `user_id`, revoking everything issued before.
/// Revoke-on-login: any other live session for the user dies here. The
/// delete and both inserts are one transaction on the repository side.
pub async fn issue_pair<T: TokenRepository>(
    tokens: &T,
    user_id: Uuid,
    access_ttl_secs: i64,
    refresh_ttl_secs: Option<i64>,
) -> Result<TokenPair, ApiError> {
    let now = Utc::now();
    let access = AccessToken {
        id: Uuid::now_v7(),
        user_id,
        token: generate_token_value(),
        expires_at: now + Duration::seconds(access_ttl_secs),
        created_at: now,
    };
    let refresh = RefreshToken {
        id: Uuid::now_v7(),
        user_id,
        token: generate_token_value(),
        expires_at: refresh_ttl_secs.map(|ttl| now + Duration::seconds(ttl)),
        created_at: now,
    };
    tokens.replace_for_user(&access, &refresh).await?;
    Ok(TokenPair {
        access_token: access.token,
        expires_in: access.expires_at.timestamp(),
        refresh_token: refresh.token,
    })
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<T: TokenRepository> {
    pub tokens: T,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: Option<i64>,
}

impl<T: TokenRepository> RefreshTokenUseCase<T> {
    /// Exchange a refresh token for a fresh pair. An expired refresh
    /// token is indistinguishable from a missing one.
    pub async fn execute(&self, refresh_value: &str) -> Result<TokenPair, ApiError> {
        let stored = self
            .tokens
            .find_refresh(refresh_value)
            .await?
            .ok_or(ApiError::RefreshTokenNotExist)?;

        if stored.is_expired() {
            return Err(ApiError::RefreshTokenNotExist);
        }

        issue_pair(
            &self.tokens,
            stored.user_id,
            self.access_ttl_secs,
            self.refresh_ttl_secs,
        )
        .await
    }
}

// ── RevokeTokens ─────────────────────────────────────────────────────────────

pub struct RevokeTokensUseCase<U: UserRepository, T: TokenRepository> {
    pub users: U,
    pub tokens: T,
}

impl<U: UserRepository, T: TokenRepository> RevokeTokensUseCase<U, T> {
    /// Delete every token owned by the account behind `email`. An unknown
    /// email is a no-op, which also makes the operation idempotent.
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(());
        };
        self.tokens.delete_all_for_user(user.id).await
    }
}
