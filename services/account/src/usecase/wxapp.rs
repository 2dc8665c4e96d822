use aes::Aes128;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut as _, KeyIvInit as _};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    CredentialRepository, TokenRepository, UserRepository, WxClient,
};
use crate::domain::types::{Credential, DEFAULT_BIO, IdentityType, User, WxProfile};
use crate::error::ApiError;
use crate::password::hash_secret;
use crate::usecase::token::{TokenPair, issue_pair};

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Decrypt the mini-program user payload: all three inputs are base64,
/// the cipher is AES-128-CBC with PKCS7 padding, the session key doubles
/// as the symmetric key.
pub fn decrypt_profile(
    session_key_b64: &str,
    encrypted_b64: &str,
    iv_b64: &str,
) -> Result<WxProfile, ApiError> {
    let key = BASE64
        .decode(session_key_b64)
        .map_err(|_| ApiError::Base64DecodeError)?;
    let data = BASE64
        .decode(encrypted_b64)
        .map_err(|_| ApiError::Base64DecodeError)?;
    let iv = BASE64.decode(iv_b64).map_err(|_| ApiError::Base64DecodeError)?;

    let plain = Aes128CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| ApiError::WxDecodeFail)?
        .decrypt_padded_vec_mut::<Pkcs7>(&data)
        .map_err(|_| ApiError::WxDecodeFail)?;

    serde_json::from_slice(&plain).map_err(|_| ApiError::WxDecodeFail)
}

// ── WxappLogin ───────────────────────────────────────────────────────────────

pub struct WxappLoginInput {
    pub code: String,
    pub encrypted_data: String,
    pub iv: String,
}

pub struct WxappLoginUseCase<U, C, T, W>
where
    U: UserRepository,
    C: CredentialRepository,
    T: TokenRepository,
    W: WxClient,
{
    pub users: U,
    pub credentials: C,
    pub tokens: T,
    pub wx: W,
    pub app_id: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: Option<i64>,
}

impl<U, C, T, W> WxappLoginUseCase<U, C, T, W>
where
    U: UserRepository,
    C: CredentialRepository,
    T: TokenRepository,
    W: WxClient,
{
    /// Exchange a mini-program login code for a local token pair,
    /// creating the account on first sight of the open-id.
    pub async fn execute(&self, input: WxappLoginInput) -> Result<TokenPair, ApiError> {
        let session = self.wx.code_to_session(&input.code).await?;
        let profile = decrypt_profile(&session.session_key, &input.encrypted_data, &input.iv)?;

        // Cross-app replay guard: checked before any lookup or write.
        if profile.watermark.appid != self.app_id {
            return Err(ApiError::WxWatermarkMismatch);
        }

        let hashed_key = hash_secret(&session.session_key)?;

        match self
            .credentials
            .find_by_type_and_identifier(IdentityType::Wxapp, &profile.open_id)
            .await?
        {
            Some(auth) => {
                // Known open-id: rotate the stored session-key hash.
                self.credentials
                    .update_credential(auth.id, &hashed_key)
                    .await?;
                issue_pair(
                    &self.tokens,
                    auth.user_id,
                    self.access_ttl_secs,
                    self.refresh_ttl_secs,
                )
                .await
            }
            None => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::now_v7(),
                    organization_id: None,
                    name: profile.nick_name.clone(),
                    email: None,
                    phone: None,
                    avatar: profile.avatar_url.clone(),
                    bio: DEFAULT_BIO.to_owned(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                let auth = Credential {
                    id: Uuid::now_v7(),
                    user_id: user.id,
                    identity_type: IdentityType::Wxapp,
                    identifier: profile.open_id.clone(),
                    credential: hashed_key,
                    created_at: now,
                    updated_at: now,
                };
                self.users.create_with_auth(&user, &auth, None).await?;
                issue_pair(
                    &self.tokens,
                    user.id,
                    self.access_ttl_secs,
                    self.refresh_ttl_secs,
                )
                .await
            }
        }
    }
}
