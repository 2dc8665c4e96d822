use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ApiResponse;
use crate::domain::types::{ProfileChanges, User};
use crate::error::ApiError;
use crate::extract::BearerUser;
use crate::state::AppState;
use crate::usecase::account::UpdateAccountUseCase;

/// Public profile shape returned by account and web endpoints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub organiz_id: Option<Uuid>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            bio: user.bio,
            organiz_id: user.organization_id,
            created_at: user.created_at,
        }
    }
}

// ── GET /api/account/info ────────────────────────────────────────────────────

pub async fn account_info(BearerUser(user): BearerUser) -> ApiResponse<ProfileResponse> {
    ApiResponse::success(user.into())
}

// ── POST /api/account/update ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub organiz_id: Option<Uuid>,
}

pub async fn update_account(
    State(state): State<AppState>,
    BearerUser(user): BearerUser,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let usecase = UpdateAccountUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            user.id,
            ProfileChanges {
                name: body.name,
                phone: body.phone,
                avatar: body.avatar,
                bio: body.bio,
                organization_id: body.organiz_id,
            },
        )
        .await?;
    Ok(ApiResponse::empty())
}
