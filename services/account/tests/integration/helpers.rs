use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use inkwell_account::domain::repository::{
    CredentialRepository, SessionStore, TokenRepository, UserRepository,
    VerificationCodeRepository, WxClient,
};
use inkwell_account::domain::types::{
    AccessToken, CodeKind, Credential, DEFAULT_BIO, IdentityType, OutboxEvent, ProfileChanges,
    RefreshToken, User, VerificationCode, WxSession,
};
use inkwell_account::error::ApiError;
use inkwell_account::password::hash_secret;

pub const TEST_PASSWORD: &str = "Passw0rd1";

pub type Shared<T> = Arc<Mutex<Vec<T>>>;

/// In-memory stand-in for the persistence layer. Every mock repository
/// clones the same shared vectors, so multi-repository flows (register,
/// wxapp login) observe each other's writes like they would in Postgres.
#[derive(Clone, Default)]
pub struct MockStore {
    pub users: Shared<User>,
    pub auths: Shared<Credential>,
    pub codes: Shared<VerificationCode>,
    pub events: Shared<OutboxEvent>,
    pub access_tokens: Shared<AccessToken>,
    pub refresh_tokens: Shared<RefreshToken>,
    pub organizations: Shared<Uuid>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo {
            store: self.clone(),
        }
    }

    pub fn credential_repo(&self) -> MockCredentialRepo {
        MockCredentialRepo {
            store: self.clone(),
        }
    }

    pub fn token_repo(&self) -> MockTokenRepo {
        MockTokenRepo {
            store: self.clone(),
        }
    }

    pub fn code_repo(&self) -> MockCodeRepo {
        MockCodeRepo {
            store: self.clone(),
        }
    }

    /// Seed a registered email account and its bcrypt credential.
    pub fn seed_email_user(&self, email: &str, password: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            organization_id: None,
            name: "tester".to_owned(),
            email: Some(email.to_owned()),
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
            identifier: email.to_owned(),
            credential: hash_secret(password).unwrap(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        self.auths.lock().unwrap().push(auth);
        user
    }

    /// Seed a mini-program account keyed by open-id.
    pub fn seed_wxapp_user(&self, open_id: &str, session_key: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            organization_id: None,
            name: "wx-tester".to_owned(),
            email: None,
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
            identity_type: IdentityType::Wxapp,
            identifier: open_id.to_owned(),
            credential: hash_secret(session_key).unwrap(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        self.auths.lock().unwrap().push(auth);
        user
    }

    /// Seed a verification code in the given state.
    pub fn seed_code(
        &self,
        user_id: Uuid,
        code: &str,
        kind: CodeKind,
        consumed: bool,
    ) -> VerificationCode {
        let now = Utc::now();
        let record = VerificationCode {
            id: Uuid::now_v7(),
            user_id,
            code: code.to_owned(),
            kind,
            consumed,
            created_at: now,
            updated_at: now,
        };
        self.codes.lock().unwrap().push(record.clone());
        record
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    store: MockStore,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_deref() == Some(email) && u.deleted_at.is_none())
            .cloned())
    }

    async fn organization_exists(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.store.organizations.lock().unwrap().contains(&id))
    }

    async fn create_with_auth(
        &self,
        user: &User,
        auth: &Credential,
        activation: Option<(&VerificationCode, &OutboxEvent)>,
    ) -> Result<(), ApiError> {
        self.store.users.lock().unwrap().push(user.clone());
        self.store.auths.lock().unwrap().push(auth.clone());
        if let Some((code, event)) = activation {
            self.store.codes.lock().unwrap().push(code.clone());
            self.store.events.lock().unwrap().push(event.clone());
        }
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<(), ApiError> {
        let mut users = self.store.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(ref name) = changes.name {
                user.name = name.clone();
            }
            if let Some(ref phone) = changes.phone {
                user.phone = Some(phone.clone());
            }
            if let Some(ref avatar) = changes.avatar {
                user.avatar = Some(avatar.clone());
            }
            if let Some(ref bio) = changes.bio {
                user.bio = bio.clone();
            }
            if let Some(organization_id) = changes.organization_id {
                user.organization_id = Some(organization_id);
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockCredentialRepo ───────────────────────────────────────────────────────

pub struct MockCredentialRepo {
    store: MockStore,
}

impl CredentialRepository for MockCredentialRepo {
    async fn find_by_type_and_identifier(
        &self,
        identity_type: IdentityType,
        identifier: &str,
    ) -> Result<Option<Credential>, ApiError> {
        Ok(self
            .store
            .auths
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.identity_type == identity_type && a.identifier == identifier)
            .cloned())
    }

    async fn update_credential(&self, id: Uuid, credential: &str) -> Result<(), ApiError> {
        let mut auths = self.store.auths.lock().unwrap();
        if let Some(auth) = auths.iter_mut().find(|a| a.id == id) {
            auth.credential = credential.to_owned();
            auth.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockTokenRepo ────────────────────────────────────────────────────────────

pub struct MockTokenRepo {
    store: MockStore,
}

impl TokenRepository for MockTokenRepo {
    async fn replace_for_user(
        &self,
        access: &AccessToken,
        refresh: &RefreshToken,
    ) -> Result<(), ApiError> {
        {
            let mut tokens = self.store.access_tokens.lock().unwrap();
            tokens.retain(|t| t.user_id != access.user_id);
            tokens.push(access.clone());
        }
        {
            let mut tokens = self.store.refresh_tokens.lock().unwrap();
            tokens.retain(|t| t.user_id != refresh.user_id);
            tokens.push(refresh.clone());
        }
        Ok(())
    }

    async fn find_access(&self, token: &str) -> Result<Option<AccessToken>, ApiError> {
        Ok(self
            .store
            .access_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn find_refresh(&self, token: &str) -> Result<Option<RefreshToken>, ApiError> {
        Ok(self
            .store
            .refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.store
            .access_tokens
            .lock()
            .unwrap()
            .retain(|t| t.user_id != user_id);
        self.store
            .refresh_tokens
            .lock()
            .unwrap()
            .retain(|t| t.user_id != user_id);
        Ok(())
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

pub struct MockCodeRepo {
    store: MockStore,
}

impl VerificationCodeRepository for MockCodeRepo {
    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        self.store.codes.lock().unwrap().push(code.clone());
        self.store.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_unconsumed(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError> {
        Ok(self
            .store
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.code == code && !c.consumed)
            .cloned())
    }

    async fn find_by_kind_and_code(
        &self,
        user_id: Uuid,
        kind: CodeKind,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError> {
        Ok(self
            .store
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.kind == kind && c.code == code)
            .cloned())
    }

    async fn mark_consumed(&self, id: Uuid) -> Result<(), ApiError> {
        let mut codes = self.store.codes.lock().unwrap();
        if let Some(code) = codes.iter_mut().find(|c| c.id == id) {
            code.consumed = true;
            code.updated_at = Utc::now();
        }
        Ok(())
    }
}

// ── MockSessionStore ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl SessionStore for MockSessionStore {
    async fn put(&self, session_id: &str, user_id: Uuid, _ttl_secs: u64) -> Result<(), ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_owned(), user_id);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Uuid>, ApiError> {
        Ok(self.sessions.lock().unwrap().get(session_id).copied())
    }

    async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

// ── MockWxClient ─────────────────────────────────────────────────────────────

/// Returns the configured session, or `WxRequestFail` when none is set
/// (simulating an unreachable upstream).
pub struct MockWxClient {
    pub session: Option<WxSession>,
}

impl WxClient for MockWxClient {
    async fn code_to_session(&self, _code: &str) -> Result<WxSession, ApiError> {
        self.session.clone().ok_or(ApiError::WxRequestFail)
    }
}
