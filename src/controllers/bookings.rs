use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::error::{required, AppError, FieldErrors};
use crate::middleware::{ApiJson, AuthUser, IdPath};
use crate::models::{Booking, BookingResponse};
use crate::services::booking::book_seat;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings/", get(list_bookings).post(create_booking))
        .route("/api/bookings/{id}/", get(get_booking).delete(cancel_booking))
}

/// `user` and `booking_date` are stamped server-side; any client value is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BookingInput {
    pub movie: Option<i64>,
    pub seat: Option<i64>,
}

/// Loads a booking owned by `user`; anyone else's booking is reported as missing.
async fn own_booking(state: &AppState, user: &AuthUser, id: i64) -> Result<Booking, AppError> {
    state
        .store
        .get_booking(id)
        .await?
        .filter(|booking| booking.user_id == user.id)
        .ok_or(AppError::NotFound)
}

// GET /api/bookings/
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.store.list_bookings_for_user(user.id).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// POST /api/bookings/
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(input): ApiJson<BookingInput>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let mut errors = FieldErrors::new();
    let movie = required(input.movie, "movie", &mut errors);
    let seat = required(input.seat, "seat", &mut errors);
    let (Some(movie_id), Some(seat_id)) = (movie, seat) else {
        return Err(AppError::Validation(errors));
    };

    let booking = book_seat(state.store.as_ref(), &user, movie_id, seat_id).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

// GET /api/bookings/{id}/
async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = own_booking(&state, &user, id).await?;
    Ok(Json(booking.into()))
}

// DELETE /api/bookings/{id}/
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    let booking = own_booking(&state, &user, id).await?;
    if !state.store.delete_booking(booking.id).await? {
        return Err(AppError::NotFound);
    }
    info!("booking {} cancelled by {}", booking.id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
