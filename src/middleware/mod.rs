pub mod auth;
pub mod flash;
pub mod json;
pub mod path;

pub use auth::{AuthUser, MaybeUser, RequireLogin};
pub use flash::{Flash, Level, Message};
pub use json::ApiJson;
pub use path::IdPath;

use axum::http::{header, HeaderMap};

/// Value of the cookie `name`, searching every `Cookie` header.
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1; sessionid=abc"));
        headers.append(header::COOKIE, HeaderValue::from_static("messages=x"));

        assert_eq!(cookie(&headers, "sessionid"), Some("abc"));
        assert_eq!(cookie(&headers, "messages"), Some("x"));
        assert_eq!(cookie(&headers, "missing"), None);
    }
}
