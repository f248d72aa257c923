use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{required, AppError, FieldErrors};
use crate::middleware::{ApiJson, AuthUser, IdPath};
use crate::models::{NewSeat, Seat};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/seats/", get(list_seats).post(create_seat))
        .route(
            "/api/seats/{id}/",
            get(get_seat)
                .put(update_seat)
                .patch(patch_seat)
                .delete(delete_seat),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct SeatInput {
    pub seat_number: Option<String>,
    pub is_booked: Option<bool>,
}

impl SeatInput {
    fn complete(self) -> Result<NewSeat, AppError> {
        let mut errors = FieldErrors::new();
        let seat_number = required(self.seat_number, "seat_number", &mut errors)
            .ok_or(AppError::Validation(errors))?;
        Ok(NewSeat {
            seat_number,
            is_booked: self.is_booked.unwrap_or(false),
        })
    }

    fn merge(self, current: Seat) -> NewSeat {
        NewSeat {
            seat_number: self.seat_number.unwrap_or(current.seat_number),
            is_booked: self.is_booked.unwrap_or(current.is_booked),
        }
    }
}

// GET /api/seats/
async fn list_seats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Seat>>, AppError> {
    Ok(Json(state.store.list_seats().await?))
}

// POST /api/seats/
async fn create_seat(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(input): ApiJson<SeatInput>,
) -> Result<(StatusCode, Json<Seat>), AppError> {
    let seat = input.complete()?;
    seat.validate()?;
    let created = state.store.create_seat(seat).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/seats/{id}/
async fn get_seat(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Seat>, AppError> {
    state
        .store
        .get_seat(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// PUT /api/seats/{id}/
async fn update_seat(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
    ApiJson(input): ApiJson<SeatInput>,
) -> Result<Json<Seat>, AppError> {
    let seat = input.complete()?;
    seat.validate()?;
    state
        .store
        .update_seat(id, seat)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// PATCH /api/seats/{id}/
async fn patch_seat(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
    ApiJson(input): ApiJson<SeatInput>,
) -> Result<Json<Seat>, AppError> {
    let current = state.store.get_seat(id).await?.ok_or(AppError::NotFound)?;
    let seat = input.merge(current);
    seat.validate()?;
    state
        .store
        .update_seat(id, seat)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// DELETE /api/seats/{id}/
async fn delete_seat(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_seat(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
