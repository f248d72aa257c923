use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::User;
use crate::sessions::SESSION_COOKIE;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Checks `Authorization: Basic base64(username:password)` against the user table.
async fn basic_auth(header_value: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let encoded = header_value
        .strip_prefix("Basic ")
        .ok_or(AppError::Unauthorized)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| AppError::Unauthorized)?;

    let credentials = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;

    let (username, password) = credentials
        .split_once(':')
        .ok_or(AppError::Unauthorized)?;

    let user = state
        .store
        .find_user_by_username(username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.verify_password(password) {
        warn!("basic auth rejected for {}", username);
        return Err(AppError::Unauthorized);
    }
    Ok(user.into())
}

/// Resolves the `sessionid` cookie, if any, to a user.
async fn session_user(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(token) = super::cookie(&parts.headers, SESSION_COOKIE) else {
        return Ok(None);
    };
    let Some(user_id) = state.sessions.user_id(token).await? else {
        debug!("stale session cookie");
        return Ok(None);
    };
    Ok(state.store.get_user(user_id).await?.map(AuthUser::from))
}

// API extractor: Basic auth when the header is present, the session cookie otherwise
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
            let value = value.to_str().map_err(|_| AppError::Unauthorized)?;
            return basic_auth(value, state).await;
        }
        session_user(parts, state)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Logged-in user of a page request, if any.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_user(parts, state).await?))
    }
}

/// Page extractor that sends anonymous visitors to the login form.
#[derive(Debug, Clone)]
pub struct RequireLogin(pub AuthUser);

pub fn login_redirect(next: &str) -> Response {
    let query = serde_urlencoded::to_string([("next", next)]).unwrap_or_default();
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/login/?{query}"))],
    )
        .into_response()
}

impl FromRequestParts<Arc<AppState>> for RequireLogin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_user(parts, state).await {
            Ok(Some(user)) => Ok(RequireLogin(user)),
            Ok(None) => Err(login_redirect(parts.uri.path())),
            Err(e) => Err(e.into_response()),
        }
    }
}
