//! Seat booking.
//!
//! The only rule here is the availability guard: a seat already marked
//! booked cannot be booked again. The acting user and the booking time are
//! always taken from the request, never from client input.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{Booking, NewBooking, Seat};
use crate::store::{Repository, StoreError};

pub const SEAT_ALREADY_BOOKED: &str = "This seat is already booked.";

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("movie {0} does not exist")]
    MovieNotFound(i64),

    #[error("seat {0} does not exist")]
    SeatNotFound(i64),

    #[error("{0} is already booked")]
    SeatAlreadyBooked(Seat),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn invalid_pk(id: i64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MovieNotFound(id) => AppError::field("movie", invalid_pk(id)),
            BookingError::SeatNotFound(id) => AppError::field("seat", invalid_pk(id)),
            BookingError::SeatAlreadyBooked(_) => AppError::field("seat", SEAT_ALREADY_BOOKED),
            BookingError::Store(e) => AppError::Store(e),
        }
    }
}

/// Books `seat_id` for `movie_id` on behalf of `user`.
pub async fn book_seat(
    store: &dyn Repository,
    user: &AuthUser,
    movie_id: i64,
    seat_id: i64,
) -> Result<Booking, BookingError> {
    let movie = store
        .get_movie(movie_id)
        .await?
        .ok_or(BookingError::MovieNotFound(movie_id))?;
    let seat = store
        .get_seat(seat_id)
        .await?
        .ok_or(BookingError::SeatNotFound(seat_id))?;

    if seat.is_booked {
        warn!("{} tried to book taken {}", user.username, seat);
        return Err(BookingError::SeatAlreadyBooked(seat));
    }

    let request = NewBooking {
        movie_id: movie.id,
        seat_id: seat.id,
        user_id: user.id,
        booking_date: Utc::now(),
    };

    match store.reserve_seat(request).await {
        Ok(booking) => {
            info!("booking {} created: {}", booking.id, booking);
            Ok(booking)
        }
        // lost the race to a concurrent request
        Err(StoreError::SeatAlreadyBooked(_)) => Err(BookingError::SeatAlreadyBooked(seat)),
        Err(e) => Err(e.into()),
    }
}
