use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// `Path<T>` where an id that does not parse is reported like an unknown id: 404 `{"detail": "Not found."}`.
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(IdPath(value)),
            Err(rejection) => {
                debug!("unroutable id in {}: {}", parts.uri.path(), rejection.body_text());
                Err(AppError::NotFound)
            }
        }
    }
}
