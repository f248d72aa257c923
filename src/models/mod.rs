pub mod booking;
pub mod movie;
pub mod seat;
pub mod user;

pub use booking::{Booking, BookingResponse, NewBooking};
pub use movie::{Movie, NewMovie};
pub use seat::{NewSeat, Seat};
pub use user::User;
