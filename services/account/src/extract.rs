//! Authentication extractors — the per-request credential chain.
//!
//! Each extractor resolves an identity from one credential scheme. A bare
//! parameter is extract-plus-guard (reject when no identity resolves); an
//! `Option<...>` parameter is the bare extract stage. API schemes reject
//! with a transport-level 401 that never enters the response envelope;
//! the web session variant redirects to the login page instead.

use std::convert::Infallible;
use std::future::Future;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::authorization::{Basic, Bearer};
use axum_extra::headers::{Authorization, HeaderMapExt as _};
use time::Duration;

use crate::domain::repository::{
    CredentialRepository, SessionStore, TokenRepository, UserRepository,
};
use crate::domain::types::{IdentityType, User};
use crate::error::ApiError;
use crate::password::verify_secret;
use crate::state::AppState;

/// Web session cookie name.
pub const SESSION_COOKIE: &str = "inkwell_session";

/// Rejection for the API authentication schemes.
#[derive(Debug)]
pub enum AuthRejection {
    Unauthorized,
    Internal(ApiError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Internal(e) => e.into_response(),
        }
    }
}

/// Rejection for the browser session scheme: send the user to the login
/// page instead of a bare status code.
#[derive(Debug)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/web/login").into_response()
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

async fn resolve_basic(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(auth) = state
        .credential_repo()
        .find_by_type_and_identifier(IdentityType::Email, username)
        .await?
    else {
        return Ok(None);
    };
    if !verify_secret(password, &auth.credential)? {
        return Ok(None);
    }
    state.user_repo().find_by_id(auth.user_id).await
}

async fn resolve_bearer(state: &AppState, token: &str) -> Result<Option<User>, ApiError> {
    let Some(access) = state.token_repo().find_access(token).await? else {
        return Ok(None);
    };
    if access.is_expired() {
        return Ok(None);
    }
    state.user_repo().find_by_id(access.user_id).await
}

async fn resolve_session(state: &AppState, session_id: &str) -> Result<Option<User>, ApiError> {
    let Some(user_id) = state.session_store().get(session_id).await? else {
        return Ok(None);
    };
    state.user_repo().find_by_id(user_id).await
}

fn guard(resolved: Result<Option<User>, ApiError>) -> Result<User, AuthRejection> {
    match resolved {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AuthRejection::Unauthorized),
        Err(e) => Err(AuthRejection::Internal(e)),
    }
}

fn session_id_from_parts(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
}

// ── BasicUser ────────────────────────────────────────────────────────────────

/// Identity resolved from `Authorization: Basic` against the email
/// credential partition.
#[derive(Debug, Clone)]
pub struct BasicUser(pub User);

impl FromRequestParts<AppState> for BasicUser {
    type Rejection = AuthRejection;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; an
    // `async fn` impl trips E0195 under Rust 2024 capture rules, so the
    // header parse happens synchronously and the lookup in an owned block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let credentials = parts
            .headers
            .typed_get::<Authorization<Basic>>()
            .map(|auth| (auth.username().to_owned(), auth.password().to_owned()));
        let state = state.clone();
        async move {
            let (username, password) = credentials.ok_or(AuthRejection::Unauthorized)?;
            guard(resolve_basic(&state, &username, &password).await).map(Self)
        }
    }
}

// ── BearerUser ───────────────────────────────────────────────────────────────

/// Identity resolved from `Authorization: Bearer` via the access-token
/// store; expired tokens do not resolve.
#[derive(Debug, Clone)]
pub struct BearerUser(pub User);

impl FromRequestParts<AppState> for BearerUser {
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_owned());
        let state = state.clone();
        async move {
            let token = token.ok_or(AuthRejection::Unauthorized)?;
            guard(resolve_bearer(&state, &token).await).map(Self)
        }
    }
}

// ── SessionUser / SessionPage ────────────────────────────────────────────────

/// Identity resolved from the session cookie (API variant, 401 on failure).
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session_id = session_id_from_parts(parts);
        let state = state.clone();
        async move {
            let session_id = session_id.ok_or(AuthRejection::Unauthorized)?;
            guard(resolve_session(&state, &session_id).await).map(Self)
        }
    }
}

// The bare extract stage without the guard: `Option<SessionUser>` never
// fails the request, it just resolves to `None`.
impl OptionalFromRequestParts<AppState> for SessionUser {
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let session_id = session_id_from_parts(parts);
        let state = state.clone();
        async move {
            let Some(session_id) = session_id else {
                return Ok(None);
            };
            Ok(resolve_session(&state, &session_id)
                .await
                .ok()
                .flatten()
                .map(Self))
        }
    }
}

/// Browser variant of [`SessionUser`]: unauthenticated requests are
/// redirected to the login page.
#[derive(Debug, Clone)]
pub struct SessionPage(pub User);

impl FromRequestParts<AppState> for SessionPage {
    type Rejection = LoginRedirect;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let session_id = session_id_from_parts(parts);
        let state = state.clone();
        async move {
            let session_id = session_id.ok_or(LoginRedirect)?;
            match resolve_session(&state, &session_id).await {
                Ok(Some(user)) => Ok(Self(user)),
                _ => Err(LoginRedirect),
            }
        }
    }
}

// ── Session cookie builders ──────────────────────────────────────────────────

/// Build the session cookie set after a successful web login.
pub fn session_cookie(value: String, ttl_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .max_age(Duration::seconds(ttl_secs as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Expire the session cookie on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}
