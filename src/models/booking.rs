use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;

/// A booking joined with the display fields of its user, movie and seat.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Booking {
    pub id: i64,
    pub movie_id: i64,
    pub seat_id: i64,
    pub user_id: i64,
    pub booking_date: DateTime<Utc>,
    pub username: String,
    pub movie_title: String,
    pub seat_number: String,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - Seat {}",
            self.username, self.movie_title, self.seat_number
        )
    }
}

/// Insert payload; `user_id` and `booking_date` are always filled in server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub movie_id: i64,
    pub seat_id: i64,
    pub user_id: i64,
    pub booking_date: DateTime<Utc>,
}

/// API representation: related rows by id, the user by name.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub movie: i64,
    pub seat: i64,
    pub user: String,
    pub booking_date: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            movie: b.movie_id,
            seat: b.seat_id,
            user: b.username,
            booking_date: b.booking_date,
        }
    }
}
