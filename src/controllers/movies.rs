use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{required, AppError, FieldErrors};
use crate::middleware::{ApiJson, AuthUser, IdPath};
use crate::models::{Movie, NewMovie};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/movies/", get(list_movies).post(create_movie))
        .route(
            "/api/movies/{id}/",
            get(get_movie)
                .put(update_movie)
                .patch(patch_movie)
                .delete(delete_movie),
        )
}

/// Request body; every field is optional so PATCH can reuse it.
#[derive(Debug, Default, Deserialize)]
pub struct MovieInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<i32>,
}

impl MovieInput {
    fn complete(self) -> Result<NewMovie, AppError> {
        let mut errors = FieldErrors::new();
        let title = required(self.title, "title", &mut errors);
        let description = required(self.description, "description", &mut errors);
        let release_date = required(self.release_date, "release_date", &mut errors);
        let duration = required(self.duration, "duration", &mut errors);

        match (title, description, release_date, duration) {
            (Some(title), Some(description), Some(release_date), Some(duration)) => Ok(NewMovie {
                title,
                description,
                release_date,
                duration,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    fn merge(self, current: Movie) -> NewMovie {
        let current = NewMovie::from(current);
        NewMovie {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            release_date: self.release_date.unwrap_or(current.release_date),
            duration: self.duration.unwrap_or(current.duration),
        }
    }
}

// GET /api/movies/
async fn list_movies(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Movie>>, AppError> {
    Ok(Json(state.store.list_movies().await?))
}

// POST /api/movies/
async fn create_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<(StatusCode, Json<Movie>), AppError> {
    let movie = input.complete()?;
    movie.validate()?;
    let created = state.store.create_movie(movie).await?;
    tracing::info!("movie {} created: {}", created.id, created);
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/movies/{id}/
async fn get_movie(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Movie>, AppError> {
    state
        .store
        .get_movie(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// PUT /api/movies/{id}/
async fn update_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<Json<Movie>, AppError> {
    let movie = input.complete()?;
    movie.validate()?;
    state
        .store
        .update_movie(id, movie)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// PATCH /api/movies/{id}/
async fn patch_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<Json<Movie>, AppError> {
    let current = state.store.get_movie(id).await?.ok_or(AppError::NotFound)?;
    let movie = input.merge(current);
    movie.validate()?;
    state
        .store
        .update_movie(id, movie)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// DELETE /api/movies/{id}/
async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_movie(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_lists_every_missing_field() {
        let input = MovieInput {
            title: Some("Incomplete Movie".into()),
            ..Default::default()
        };
        let AppError::Validation(errors) = input.complete().unwrap_err() else {
            panic!("expected a validation error");
        };
        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(fields, ["description", "duration", "release_date"]);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let current = Movie {
            id: 3,
            title: "Old".into(),
            description: "Same".into(),
            release_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            duration: 150,
        };
        let merged = MovieInput {
            duration: Some(160),
            ..Default::default()
        }
        .merge(current);
        assert_eq!(merged.title, "Old");
        assert_eq!(merged.duration, 160);
    }
}
