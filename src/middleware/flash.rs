//! One-shot messages carried across a redirect in the `messages` cookie.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use std::fmt;

pub const FLASH_COOKIE: &str = "messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Level::Info),
            "success" => Some(Level::Success),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: Level::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: Level::Error, text: text.into() }
    }
}

/// `Set-Cookie` value storing `messages` for the next page view.
pub fn set_cookie(messages: &[Message]) -> String {
    let pairs: Vec<(&str, &str)> = messages
        .iter()
        .map(|m| (m.level.as_str(), m.text.as_str()))
        .collect();
    let value = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    format!("{FLASH_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn decode(value: &str) -> Vec<Message> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(value)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(level, text)| Some(Message { level: Level::parse(&level)?, text }))
        .collect()
}

/// Messages left by the previous response.
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Vec<Message>);

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flash(
            super::cookie(&parts.headers, FLASH_COOKIE)
                .map(decode)
                .unwrap_or_default(),
        ))
    }
}
