use axum::http::StatusCode;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::extract::BasicUser;
use crate::state::AppState;
use crate::usecase::token::{RefreshTokenUseCase, RevokeTokensUseCase, TokenPair};

/// Wire shape of an issued pair. `expiresIn` is the absolute expiry of
/// the access token in epoch seconds.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            expires_in: pair.expires_in,
            refresh_token: pair.refresh_token,
        }
    }
}

// ── POST /api/token/refresh ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<ApiResponse<TokenPairResponse>, ApiError> {
    let usecase = RefreshTokenUseCase {
        tokens: state.token_repo(),
        access_ttl_secs: state.config.access_token_ttl_secs,
        refresh_ttl_secs: state.config.refresh_token_ttl_secs,
    };
    let pair = usecase.execute(&body.refresh_token).await?;
    Ok(ApiResponse::success(pair.into()))
}

// ── POST /api/token/revoke ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    pub email: String,
}

/// Basic-auth guarded; replies 204 with no envelope.
pub async fn revoke_token(
    State(state): State<AppState>,
    _authed: BasicUser,
    Json(body): Json<RevokeRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = RevokeTokensUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
    };
    usecase.execute(&body.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
