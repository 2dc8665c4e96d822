use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use inkwell_core::health::{healthz, readyz};
use inkwell_core::middleware::request_id_layer;

use crate::handlers::{
    account::{account_info, update_account},
    oauth::wxapp_token,
    token::{refresh_token, revoke_token},
    user::{activate, change_password_code, login, new_password, register},
    web::{web_login, web_login_page, web_logout, web_profile},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/newPassword", post(new_password))
        .route("/api/users/changePasswordCode", post(change_password_code))
        .route("/api/users/activate", get(activate))
        .route("/api/users/oauth/token", post(wxapp_token))
        // Token
        .route("/api/token/refresh", post(refresh_token))
        .route("/api/token/revoke", post(revoke_token))
        // Account (bearer + guard)
        .route("/api/account/info", get(account_info))
        .route("/api/account/update", post(update_account))
        // Web session flows
        .route("/web/login", get(web_login_page).post(web_login))
        .route("/web/profile", get(web_profile))
        .route("/web/logout", get(web_logout))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
