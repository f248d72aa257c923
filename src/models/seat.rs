use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub seat_number: String,
    pub is_booked: bool,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seat {}", self.seat_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct NewSeat {
    #[validate(length(
        min = 1,
        max = 10,
        message = "Ensure this field has no more than 10 characters and is not blank."
    ))]
    pub seat_number: String,
    #[serde(default)]
    pub is_booked: bool,
}

impl NewSeat {
    pub fn into_seat(self, id: i64) -> Seat {
        Seat {
            id,
            seat_number: self.seat_number,
            is_booked: self.is_booked,
        }
    }
}

impl From<Seat> for NewSeat {
    fn from(seat: Seat) -> Self {
        Self {
            seat_number: seat.seat_number,
            is_booked: seat.is_booked,
        }
    }
}
