use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use inkwell_account_schema::{
    access_tokens, organizations, outbox_events, refresh_tokens, user_auths, users,
    verification_codes,
};

use crate::domain::repository::{
    CredentialRepository, TokenRepository, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    AccessToken, CodeKind, Credential, IdentityType, OutboxEvent, ProfileChanges, RefreshToken,
    User, VerificationCode,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn organization_exists(&self, id: Uuid) -> Result<bool, ApiError> {
        let model = organizations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find organization by id")?;
        Ok(model.is_some())
    }

    async fn create_with_auth(
        &self,
        user: &User,
        auth: &Credential,
        activation: Option<(&VerificationCode, &OutboxEvent)>,
    ) -> Result<(), ApiError> {
        let user = user.clone();
        let auth = auth.clone();
        let activation = activation.map(|(c, e)| (c.clone(), e.clone()));
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id),
                        organization_id: Set(user.organization_id),
                        name: Set(user.name.clone()),
                        email: Set(user.email.clone()),
                        phone: Set(user.phone.clone()),
                        avatar: Set(user.avatar.clone()),
                        bio: Set(user.bio.clone()),
                        created_at: Set(user.created_at),
                        updated_at: Set(user.updated_at),
                        deleted_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    user_auths::ActiveModel {
                        id: Set(auth.id),
                        user_id: Set(auth.user_id),
                        identity_type: Set(auth.identity_type.as_str().to_owned()),
                        identifier: Set(auth.identifier.clone()),
                        credential: Set(auth.credential.clone()),
                        created_at: Set(auth.created_at),
                        updated_at: Set(auth.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    if let Some((code, event)) = activation {
                        insert_verification_code(txn, &code).await?;
                        insert_outbox_event(txn, &event).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create user with credential")?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<(), ApiError> {
        let mut model = users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(ref name) = changes.name {
            model.name = Set(name.clone());
        }
        if let Some(ref phone) = changes.phone {
            model.phone = Set(Some(phone.clone()));
        }
        if let Some(ref avatar) = changes.avatar {
            model.avatar = Set(Some(avatar.clone()));
        }
        if let Some(ref bio) = changes.bio {
            model.bio = Set(bio.clone());
        }
        if let Some(organization_id) = changes.organization_id {
            model.organization_id = Set(Some(organization_id));
        }
        model.update(&self.db).await.context("update user profile")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        organization_id: model.organization_id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        avatar: model.avatar,
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    }
}

// ── Credential repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCredentialRepository {
    pub db: DatabaseConnection,
}

impl CredentialRepository for DbCredentialRepository {
    async fn find_by_type_and_identifier(
        &self,
        identity_type: IdentityType,
        identifier: &str,
    ) -> Result<Option<Credential>, ApiError> {
        let model = user_auths::Entity::find()
            .filter(user_auths::Column::IdentityType.eq(identity_type.as_str()))
            .filter(user_auths::Column::Identifier.eq(identifier))
            .one(&self.db)
            .await
            .context("find credential by type and identifier")?;
        Ok(model.map(credential_from_model))
    }

    async fn update_credential(&self, id: Uuid, credential: &str) -> Result<(), ApiError> {
        user_auths::ActiveModel {
            id: Set(id),
            credential: Set(credential.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update credential")?;
        Ok(())
    }
}

fn credential_from_model(model: user_auths::Model) -> Credential {
    Credential {
        id: model.id,
        user_id: model.user_id,
        identity_type: IdentityType::from_value(&model.identity_type),
        identifier: model.identifier,
        credential: model.credential,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Token repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn replace_for_user(
        &self,
        access: &AccessToken,
        refresh: &RefreshToken,
    ) -> Result<(), ApiError> {
        let access = access.clone();
        let refresh = refresh.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    delete_tokens_for_user(txn, access.user_id).await?;

                    access_tokens::ActiveModel {
                        id: Set(access.id),
                        user_id: Set(access.user_id),
                        token: Set(access.token.clone()),
                        expires_at: Set(access.expires_at),
                        created_at: Set(access.created_at),
                    }
                    .insert(txn)
                    .await?;

                    refresh_tokens::ActiveModel {
                        id: Set(refresh.id),
                        user_id: Set(refresh.user_id),
                        token: Set(refresh.token.clone()),
                        expires_at: Set(refresh.expires_at),
                        created_at: Set(refresh.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace tokens for user")?;
        Ok(())
    }

    async fn find_access(&self, token: &str) -> Result<Option<AccessToken>, ApiError> {
        let model = access_tokens::Entity::find()
            .filter(access_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await
            .context("find access token")?;
        Ok(model.map(|m| AccessToken {
            id: m.id,
            user_id: m.user_id,
            token: m.token,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn find_refresh(&self, token: &str) -> Result<Option<RefreshToken>, ApiError> {
        let model = refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await
            .context("find refresh token")?;
        Ok(model.map(|m| RefreshToken {
            id: m.id,
            user_id: m.user_id,
            token: m.token,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move { delete_tokens_for_user(txn, user_id).await })
            })
            .await
            .context("delete tokens for user")?;
        Ok(())
    }
}

async fn delete_tokens_for_user(
    txn: &DatabaseTransaction,
    user_id: Uuid,
) -> Result<(), sea_orm::DbErr> {
    access_tokens::Entity::delete_many()
        .filter(access_tokens::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    refresh_tokens::Entity::delete_many()
        .filter(refresh_tokens::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    Ok(())
}

// ── Verification code repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn create_with_outbox(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        let code = code.clone();
        let event = event.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    insert_verification_code(txn, &code).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create verification code with outbox")?;
        Ok(())
    }

    async fn find_unconsumed(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::Code.eq(code))
            .filter(verification_codes::Column::Consumed.eq(false))
            .one(&self.db)
            .await
            .context("find unconsumed verification code")?;
        Ok(model.map(verification_code_from_model))
    }

    async fn find_by_kind_and_code(
        &self,
        user_id: Uuid,
        kind: CodeKind,
        code: &str,
    ) -> Result<Option<VerificationCode>, ApiError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::Kind.eq(kind.as_str()))
            .filter(verification_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find verification code by kind and code")?;
        Ok(model.map(verification_code_from_model))
    }

    async fn mark_consumed(&self, id: Uuid) -> Result<(), ApiError> {
        verification_codes::ActiveModel {
            id: Set(id),
            consumed: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark verification code consumed")?;
        Ok(())
    }
}

async fn insert_verification_code(
    txn: &DatabaseTransaction,
    code: &VerificationCode,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::ActiveModel {
        id: Set(code.id),
        user_id: Set(code.user_id),
        code: Set(code.code.clone()),
        kind: Set(code.kind.as_str().to_owned()),
        consumed: Set(code.consumed),
        created_at: Set(code.created_at),
        updated_at: Set(code.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn verification_code_from_model(model: verification_codes::Model) -> VerificationCode {
    VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        kind: CodeKind::from_value(&model.kind),
        consumed: model.consumed,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
