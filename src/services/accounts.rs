//! Registration and password login.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{info, warn};
use validator::Validate;

use crate::error::field_errors;
use crate::models::User;
use crate::store::{Repository, StoreError};

static USERNAME_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").ok());

pub const INVALID_LOGIN: &str = "Please enter a correct username and password.";

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct Registration {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username is required and may have at most 150 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Form problems to show next to the form, in field order.
    #[error("invalid registration: {}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

impl Registration {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let errors = self.validate().err().map(|e| field_errors(&e)).unwrap_or_default();

        if let Some(messages) = errors.get("username") {
            problems.extend(messages.iter().cloned());
        } else if !USERNAME_RE.as_ref().is_some_and(|re| re.is_match(&self.username)) {
            problems.push(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                    .to_string(),
            );
        }
        if let Some(messages) = errors.get("password1") {
            problems.extend(messages.iter().cloned());
        }
        if !self.password1.is_empty() && self.password1.chars().all(|c| c.is_ascii_digit()) {
            problems.push("This password is entirely numeric.".to_string());
        }
        if self.password1 != self.password2 {
            problems.push("The two password fields didn't match.".to_string());
        }
        problems
    }
}

pub async fn register(
    store: &dyn Repository,
    form: &Registration,
    bcrypt_cost: u32,
) -> Result<User, AccountError> {
    let problems = form.problems();
    if !problems.is_empty() {
        return Err(AccountError::Invalid(problems));
    }

    let hash = bcrypt::hash(&form.password1, bcrypt_cost)?;
    match store.create_user(&form.username, &hash).await {
        Ok(user) => {
            info!("registered user {}", user.username);
            Ok(user)
        }
        Err(StoreError::Conflict { message, .. }) => {
            Err(AccountError::Invalid(vec![message.to_string()]))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the user when the password matches, recording the login time.
pub async fn authenticate(
    store: &dyn Repository,
    username: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = store.find_user_by_username(username).await? else {
        warn!("login attempt for unknown user {}", username);
        return Ok(None);
    };
    if !user.verify_password(password) {
        warn!("wrong password for {}", username);
        return Ok(None);
    }
    store.touch_last_login(user.id).await?;
    Ok(Some(user))
}
