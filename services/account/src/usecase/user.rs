use chrono::Utc;
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{
    CredentialRepository, TokenRepository, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    ACTIVATION_CODE_BYTE_LEN, CHANGE_CODE_LEN, CodeKind, Credential, DEFAULT_BIO, IdentityType,
    OutboxEvent, User, VerificationCode, validate_email, validate_password,
};
use crate::error::ApiError;
use crate::password::{hash_secret, verify_secret};
use crate::usecase::token::{TokenPair, issue_pair};

/// Charset for change-password codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_change_code() -> String {
    let mut rng = rand::rng();
    (0..CHANGE_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn generate_activation_code() -> String {
    use rand::Rng as _;
    let mut bytes = [0u8; ACTIVATION_CODE_BYTE_LEN];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub organization_id: Option<Uuid>,
}

pub struct RegisterUseCase<U, C, T>
where
    U: UserRepository,
    C: CredentialRepository,
    T: TokenRepository,
{
    pub users: U,
    pub credentials: C,
    pub tokens: T,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: Option<i64>,
    /// Origin for the activation link put into the email event.
    pub public_base_url: String,
}

impl<U, C, T> RegisterUseCase<U, C, T>
where
    U: UserRepository,
    C: CredentialRepository,
    T: TokenRepository,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<TokenPair, ApiError> {
        // Validation happens before any persistence.
        if !validate_email(&input.email) {
            return Err(ApiError::EmailInvalid);
        }
        if !validate_password(&input.password) {
            return Err(ApiError::PasswordInvalid);
        }

        if self
            .credentials
            .find_by_type_and_identifier(IdentityType::Email, &input.email)
            .await?
            .is_some()
        {
            return Err(ApiError::UserExist);
        }

        if let Some(organization_id) = input.organization_id {
            if !self.users.organization_exists(organization_id).await? {
                return Err(ApiError::ModelNotExist);
            }
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            organization_id: input.organization_id,
            name: input.name,
            email: Some(input.email.clone()),
            phone: None,
            avatar: None,
            bio: DEFAULT_BIO.to_owned(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let auth = Credential {
            id: Uuid::now_v7(),
            user_id: user.id,
            identity_type: IdentityType::Email,
            identifier: input.email.clone(),
            credential: hash_secret(&input.password)?,
            created_at: now,
            updated_at: now,
        };

        let code = VerificationCode {
            id: Uuid::now_v7(),
            user_id: user.id,
            code: generate_activation_code(),
            kind: CodeKind::ActivateAccount,
            consumed: false,
            created_at: now,
            updated_at: now,
        };
        let link = format!(
            "{}/api/users/activate?userId={}&code={}",
            self.public_base_url, user.id, code.code
        );
        let event = OutboxEvent {
            id: Uuid::now_v7(),
            kind: "account_activation".to_owned(),
            payload: json!({ "email": input.email, "link": link }),
            idempotency_key: format!("account_activation:{}", code.id),
        };

        self.users
            .create_with_auth(&user, &auth, Some((&code, &event)))
            .await?;

        issue_pair(
            &self.tokens,
            user.id,
            self.access_ttl_secs,
            self.refresh_ttl_secs,
        )
        .await
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<C, T>
where
    C: CredentialRepository,
    T: TokenRepository,
{
    pub credentials: C,
    pub tokens: T,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: Option<i64>,
}

impl<C, T> LoginUseCase<C, T>
where
    C: CredentialRepository,
    T: TokenRepository,
{
    pub async fn execute(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let auth = self
            .credentials
            .find_by_type_and_identifier(IdentityType::Email, email)
            .await?
            .ok_or(ApiError::UserNotExist)?;

        if !verify_secret(password, &auth.credential)? {
            return Err(ApiError::AuthFail);
        }

        issue_pair(
            &self.tokens,
            auth.user_id,
            self.access_ttl_secs,
            self.refresh_ttl_secs,
        )
        .await
    }
}

// ── ChangePasswordCode ───────────────────────────────────────────────────────

pub struct ChangePasswordCodeUseCase<C, V>
where
    C: CredentialRepository,
    V: VerificationCodeRepository,
{
    pub credentials: C,
    pub codes: V,
}

impl<C, V> ChangePasswordCodeUseCase<C, V>
where
    C: CredentialRepository,
    V: VerificationCodeRepository,
{
    /// Mint an unconsumed change-password code and queue its email.
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let auth = self
            .credentials
            .find_by_type_and_identifier(IdentityType::Email, email)
            .await?
            .ok_or(ApiError::ModelNotExist)?;

        let now = Utc::now();
        let code = VerificationCode {
            id: Uuid::now_v7(),
            user_id: auth.user_id,
            code: generate_change_code(),
            kind: CodeKind::ChangePassword,
            consumed: false,
            created_at: now,
            updated_at: now,
        };
        let event = OutboxEvent {
            id: Uuid::now_v7(),
            kind: "password_change_code".to_owned(),
            payload: json!({ "email": email, "code": code.code }),
            idempotency_key: format!("password_change_code:{}", code.id),
        };

        self.codes.create_with_outbox(&code, &event).await
    }
}

// ── ConfirmCode ──────────────────────────────────────────────────────────────

pub struct ConfirmCodeUseCase<V: VerificationCodeRepository> {
    pub codes: V,
}

impl<V: VerificationCodeRepository> ConfirmCodeUseCase<V> {
    /// Flip a matching unconsumed code to consumed. Works for both kinds:
    /// activation codes are spent here, change-password codes are armed
    /// here for the later new-password submission. A wrong or already
    /// consumed code fails the same way.
    pub async fn execute(&self, user_id: Uuid, code: &str) -> Result<(), ApiError> {
        let stored = self
            .codes
            .find_unconsumed(user_id, code)
            .await?
            .ok_or(ApiError::CodeFail)?;

        self.codes.mark_consumed(stored.id).await
    }
}

// ── NewPassword ──────────────────────────────────────────────────────────────

pub struct NewPasswordInput {
    pub email: String,
    pub password: String,
    pub new_password: String,
    pub code: String,
}

pub struct NewPasswordUseCase<C, V>
where
    C: CredentialRepository,
    V: VerificationCodeRepository,
{
    pub credentials: C,
    pub codes: V,
}

impl<C, V> NewPasswordUseCase<C, V>
where
    C: CredentialRepository,
    V: VerificationCodeRepository,
{
    /// Second phase of the password change: the code must already have
    /// been armed (consumed = true) via the activate endpoint.
    pub async fn execute(&self, input: NewPasswordInput) -> Result<(), ApiError> {
        let auth = self
            .credentials
            .find_by_type_and_identifier(IdentityType::Email, &input.email)
            .await?
            .ok_or(ApiError::ModelNotExist)?;

        let code = self
            .codes
            .find_by_kind_and_code(auth.user_id, CodeKind::ChangePassword, &input.code)
            .await?
            .ok_or(ApiError::CodeFail)?;
        if !code.consumed {
            return Err(ApiError::CodeFail);
        }

        if !verify_secret(&input.password, &auth.credential)? {
            return Err(ApiError::AuthFail);
        }
        if !validate_password(&input.new_password) {
            return Err(ApiError::PasswordInvalid);
        }

        let hashed = hash_secret(&input.new_password)?;
        self.credentials.update_credential(auth.id, &hashed).await
    }
}
