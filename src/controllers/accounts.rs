use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::pages::{redirect, render};
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::middleware::{self, flash, Flash, MaybeUser, Message};
use crate::services::accounts::{authenticate, register, AccountError, Registration, INVALID_LOGIN};
use crate::sessions::SESSION_COOKIE;
use crate::views::{LoginPage, RegisterPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register/", get(register_form).post(register_submit))
        .route("/login/", get(login_form).post(login_submit))
        .route("/logout/", get(logout).post(logout))
}

fn session_cookie(token: &str, auth: &AuthConfig) -> String {
    let secure = if auth.cookie_secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{secure}",
        auth.session_ttl_seconds
    )
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        next
    } else {
        "/"
    }
}

/// Opens a session for `user_id` and redirects with `message` flashed.
async fn sign_in(
    state: &AppState,
    user_id: i64,
    location: &str,
    message: &str,
) -> Result<Response, AppError> {
    let token = state.sessions.create(user_id).await?;
    Ok(redirect(
        location,
        vec![
            session_cookie(&token, &state.config.auth),
            flash::set_cookie(&[Message::success(message)]),
        ],
    ))
}

// GET /register/
async fn register_form(user: MaybeUser, flash: Flash) -> Result<Response, AppError> {
    let page = RegisterPage {
        user: user.username(),
        messages: flash.0.clone(),
        username: String::new(),
        errors: Vec::new(),
    };
    render(&page, &flash)
}

// POST /register/
async fn register_submit(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
    flash: Flash,
    Form(form): Form<Registration>,
) -> Result<Response, AppError> {
    match register(state.store.as_ref(), &form, state.config.auth.bcrypt_cost).await {
        Ok(created) => sign_in(&state, created.id, "/", "Registration successful!").await,
        Err(AccountError::Invalid(errors)) => {
            let page = RegisterPage {
                user: user.username(),
                messages: flash.0.clone(),
                username: form.username,
                errors,
            };
            render(&page, &flash)
        }
        Err(AccountError::Store(e)) => Err(e.into()),
        Err(AccountError::Password(e)) => Err(e.into()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

// GET /login/
async fn login_form(
    user: MaybeUser,
    flash: Flash,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    let page = LoginPage {
        user: user.username(),
        messages: flash.0.clone(),
        username: String::new(),
        next: query.next.unwrap_or_default(),
        errors: Vec::new(),
    };
    render(&page, &flash)
}

// POST /login/
async fn login_submit(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
    flash: Flash,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = form
        .next
        .filter(|n| !n.is_empty())
        .or(query.next)
        .unwrap_or_default();

    match authenticate(state.store.as_ref(), &form.username, &form.password).await? {
        Some(found) => {
            info!("{} logged in", found.username);
            sign_in(&state, found.id, safe_next(&next), "Login successful!").await
        }
        None => {
            let page = LoginPage {
                user: user.username(),
                messages: flash.0.clone(),
                username: form.username,
                next,
                errors: vec![INVALID_LOGIN.to_string()],
            };
            render(&page, &flash)
        }
    }
}

// GET|POST /logout/
async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = middleware::cookie(&headers, SESSION_COOKIE) {
        state.sessions.destroy(token).await?;
    }
    Ok(redirect(
        "/",
        vec![
            clear_session_cookie(),
            flash::set_cookie(&[Message::success("You have been logged out.")]),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next("/history/"), "/history/");
        assert_eq!(safe_next("//evil.example"), "/");
        assert_eq!(safe_next("https://evil.example/"), "/");
        assert_eq!(safe_next("/\\evil.example"), "/");
        assert_eq!(safe_next(""), "/");
    }

    #[test]
    fn session_cookie_flags() {
        let mut auth = crate::config::Config::in_memory().auth;
        auth.session_ttl_seconds = 60;
        assert_eq!(
            session_cookie("abc", &auth),
            "sessionid=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        auth.cookie_secure = true;
        assert!(session_cookie("abc", &auth).ends_with("; Secure"));
    }
}
