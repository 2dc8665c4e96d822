use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::handlers::token::TokenPairResponse;
use crate::state::AppState;
use crate::usecase::wxapp::{WxappLoginInput, WxappLoginUseCase};

// ── POST /api/users/oauth/token ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WxappOauthRequest {
    pub encrypted_data: String,
    pub iv: String,
    pub code: String,
}

pub async fn wxapp_token(
    State(state): State<AppState>,
    Json(body): Json<WxappOauthRequest>,
) -> Result<ApiResponse<TokenPairResponse>, ApiError> {
    let usecase = WxappLoginUseCase {
        users: state.user_repo(),
        credentials: state.credential_repo(),
        tokens: state.token_repo(),
        wx: state.wx_client(),
        app_id: state.config.wechat_app_id.clone(),
        access_ttl_secs: state.config.access_token_ttl_secs,
        refresh_ttl_secs: state.config.refresh_token_ttl_secs,
    };
    let pair = usecase
        .execute(WxappLoginInput {
            code: body.code,
            encrypted_data: body.encrypted_data,
            iv: body.iv,
        })
        .await?;
    Ok(ApiResponse::success(pair.into()))
}
