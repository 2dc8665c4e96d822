use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::handlers::token::TokenPairResponse;
use crate::state::AppState;
use crate::usecase::user::{
    ChangePasswordCodeUseCase, ConfirmCodeUseCase, LoginUseCase, NewPasswordInput,
    NewPasswordUseCase, RegisterInput, RegisterUseCase,
};

// ── POST /api/users/register ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub organiz_id: Option<Uuid>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiResponse<TokenPairResponse>, ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        credentials: state.credential_repo(),
        tokens: state.token_repo(),
        access_ttl_secs: state.config.access_token_ttl_secs,
        refresh_ttl_secs: state.config.refresh_token_ttl_secs,
        public_base_url: state.config.public_base_url.clone(),
    };
    let pair = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            name: body.name,
            organization_id: body.organiz_id,
        })
        .await?;
    Ok(ApiResponse::success(pair.into()))
}

// ── POST /api/users/login ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<TokenPairResponse>, ApiError> {
    let usecase = LoginUseCase {
        credentials: state.credential_repo(),
        tokens: state.token_repo(),
        access_ttl_secs: state.config.access_token_ttl_secs,
        refresh_ttl_secs: state.config.refresh_token_ttl_secs,
    };
    let pair = usecase.execute(&body.email, &body.password).await?;
    Ok(ApiResponse::success(pair.into()))
}

// ── POST /api/users/changePasswordCode ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordCodeRequest {
    pub email: String,
}

pub async fn change_password_code(
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordCodeRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let usecase = ChangePasswordCodeUseCase {
        credentials: state.credential_repo(),
        codes: state.verification_code_repo(),
    };
    usecase.execute(&body.email).await?;
    Ok(ApiResponse::empty())
}

// ── GET /api/users/activate ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateQuery {
    pub user_id: Uuid,
    pub code: String,
}

pub async fn activate(
    State(state): State<AppState>,
    Query(query): Query<ActivateQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let usecase = ConfirmCodeUseCase {
        codes: state.verification_code_repo(),
    };
    usecase.execute(query.user_id, &query.code).await?;
    Ok(ApiResponse::empty())
}

// ── POST /api/users/newPassword ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    pub email: String,
    pub password: String,
    pub new_password: String,
    pub code: String,
}

pub async fn new_password(
    State(state): State<AppState>,
    Json(body): Json<NewPasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let usecase = NewPasswordUseCase {
        credentials: state.credential_repo(),
        codes: state.verification_code_repo(),
    };
    usecase
        .execute(NewPasswordInput {
            email: body.email,
            password: body.password,
            new_password: body.new_password,
            code: body.code,
        })
        .await?;
    Ok(ApiResponse::empty())
}
