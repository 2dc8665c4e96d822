use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;

use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::domain::types::{IdentityType, SESSION_ID_BYTE_LEN};
use crate::error::ApiError;
use crate::password::verify_secret;

/// Generate an unguessable session identifier (32 CSPRNG bytes,
/// URL-safe base64 so it survives cookie encoding untouched).
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTE_LEN];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

// ── WebLogin ─────────────────────────────────────────────────────────────────

pub struct WebLoginUseCase<C, S>
where
    C: CredentialRepository,
    S: SessionStore,
{
    pub credentials: C,
    pub sessions: S,
    pub session_ttl_secs: u64,
}

impl<C, S> WebLoginUseCase<C, S>
where
    C: CredentialRepository,
    S: SessionStore,
{
    /// Verify the email credential and open a server-side session.
    /// Returns the session id to put into the cookie.
    pub async fn execute(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let auth = self
            .credentials
            .find_by_type_and_identifier(IdentityType::Email, email)
            .await?
            .ok_or(ApiError::UserNotExist)?;

        if !verify_secret(password, &auth.credential)? {
            return Err(ApiError::AuthFail);
        }

        let session_id = generate_session_id();
        self.sessions
            .put(&session_id, auth.user_id, self.session_ttl_secs)
            .await?;
        Ok(session_id)
    }
}

// ── WebLogout ────────────────────────────────────────────────────────────────

pub struct WebLogoutUseCase<S: SessionStore> {
    pub sessions: S,
}

impl<S: SessionStore> WebLogoutUseCase<S> {
    pub async fn execute(&self, session_id: &str) -> Result<(), ApiError> {
        self.sessions.delete(session_id).await
    }
}
