use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, extract::State};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::extract::{
    SESSION_COOKIE, SessionPage, SessionUser, clear_session_cookie, session_cookie,
};
use crate::handlers::account::ProfileResponse;
use crate::state::AppState;
use crate::usecase::session::{WebLoginUseCase, WebLogoutUseCase};

// ── GET /web/login ───────────────────────────────────────────────────────────

/// Login page stand-in. An already authenticated browser is sent straight
/// to the profile; everyone else gets an empty success body to render a
/// form against.
pub async fn web_login_page(user: Option<SessionUser>) -> Response {
    match user {
        Some(_) => Redirect::to("/web/profile").into_response(),
        None => ApiResponse::empty().into_response(),
    }
}

// ── POST /web/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct WebLoginForm {
    pub email: String,
    pub password: String,
}

/// Browser login: success opens a session and lands on the profile page;
/// bad credentials bounce back to the login page rather than erroring.
pub async fn web_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<WebLoginForm>,
) -> Response {
    let usecase = WebLoginUseCase {
        credentials: state.credential_repo(),
        sessions: state.session_store(),
        session_ttl_secs: state.config.session_ttl_secs,
    };
    match usecase.execute(&form.email, &form.password).await {
        Ok(session_id) => {
            let jar = jar.add(session_cookie(session_id, state.config.session_ttl_secs));
            (jar, Redirect::to("/web/profile")).into_response()
        }
        Err(ApiError::Internal(e)) => ApiError::Internal(e).into_response(),
        Err(_) => Redirect::to("/web/login").into_response(),
    }
}

// ── GET /web/profile ─────────────────────────────────────────────────────────

pub async fn web_profile(SessionPage(user): SessionPage) -> ApiResponse<ProfileResponse> {
    ApiResponse::success(user.into())
}

// ── GET /web/logout ──────────────────────────────────────────────────────────

pub async fn web_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(session_id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) {
        let usecase = WebLogoutUseCase {
            sessions: state.session_store(),
        };
        usecase.execute(&session_id).await?;
    }
    Ok((jar.add(clear_session_cookie()), Redirect::to("/web/login")))
}
