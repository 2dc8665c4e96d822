use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token length in random bytes (base64-encoded on the wire).
pub const TOKEN_BYTE_LEN: usize = 32;

/// Change-password code length in characters.
pub const CHANGE_CODE_LEN: usize = 4;

/// Activation code length in random bytes (hex-encoded, 32 chars).
pub const ACTIVATION_CODE_BYTE_LEN: usize = 16;

/// Web session identifier length in random bytes.
pub const SESSION_ID_BYTE_LEN: usize = 32;

/// Default bio assigned to freshly created accounts.
pub const DEFAULT_BIO: &str = "暂无简介";

/// Registered account. `email` is unique among non-deleted users.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial profile update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub organization_id: Option<Uuid>,
}

/// Login method of a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityType {
    Email,
    Wxapp,
}

impl IdentityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Wxapp => "wxapp",
        }
    }

    /// Parse a stored discriminant; unknown values fall back to `Email`.
    pub fn from_value(value: &str) -> Self {
        match value {
            "wxapp" => Self::Wxapp,
            _ => Self::Email,
        }
    }
}

/// Credential record: (type, identifier, hashed secret) for one login
/// method of one user. `identifier` is unique within its type partition.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: Uuid,
    pub user_id: Uuid,
    pub identity_type: IdentityType,
    pub identifier: String,
    pub credential: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short-lived bearer credential for API calls.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Long-lived credential used solely to mint new token pairs.
/// `expires_at` is `None` when no refresh TTL is configured.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|t| t <= Utc::now())
    }
}

/// Purpose of a one-time email code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    ActivateAccount,
    ChangePassword,
}

impl CodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActivateAccount => "activate_account",
            Self::ChangePassword => "change_password",
        }
    }

    pub fn from_value(value: &str) -> Self {
        match value {
            "change_password" => Self::ChangePassword,
            _ => Self::ActivateAccount,
        }
    }
}

/// One-time email code. `consumed` flips to true exactly once, via the
/// activate endpoint; rows are kept forever as an audit trail.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub kind: CodeKind,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outbox event for async email delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// WeChat code2session exchange result.
#[derive(Debug, Clone, Deserialize)]
pub struct WxSession {
    pub session_key: String,
    pub openid: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Decrypted mini-program user payload. Serialization is only exercised
/// when tests build encrypted fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WxProfile {
    pub open_id: String,
    pub nick_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub watermark: WxWatermark,
}

/// Watermark stamped into the encrypted payload by WeChat; `appid` must
/// match the configured app or the payload was minted for someone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WxWatermark {
    pub appid: String,
    pub timestamp: i64,
}

/// Email shape check: one `@`, non-empty local part, dotted domain, ASCII.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    email.is_ascii()
        && !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(|c| c.is_whitespace())
}

/// Password policy: ASCII, at least 6 characters, at least one digit, one
/// lowercase and one uppercase letter.
pub fn validate_password(password: &str) -> bool {
    password.is_ascii()
        && password.len() >= 6
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}
