//! Persistence for movies, seats, bookings and users.
//!
//! Handlers only see [`Repository`]. [`postgres::PgRepository`] is the
//! production backend; [`memory::MemoryRepository`] keeps everything in
//! process for local runs and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Booking, Movie, NewBooking, NewMovie, NewSeat, Seat, User};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: &'static str,
    },

    #[error("seat {0} is already booked")]
    SeatAlreadyBooked(i64),

    /// The booking names a movie, seat or user that does not exist.
    #[error("booking references a missing movie, seat or user")]
    DanglingReference,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub const SEAT_NUMBER_TAKEN: &str = "seat with this seat number already exists.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MOVIE_SEAT_TAKEN: &str = "The fields movie, seat must make a unique set.";

#[async_trait]
pub trait Repository: Send + Sync + 'static {
    async fn list_movies(&self) -> StoreResult<Vec<Movie>>;
    async fn get_movie(&self, id: i64) -> StoreResult<Option<Movie>>;
    async fn create_movie(&self, movie: NewMovie) -> StoreResult<Movie>;
    async fn update_movie(&self, id: i64, movie: NewMovie) -> StoreResult<Option<Movie>>;
    /// Removes the movie and its bookings, releasing their seats.
    async fn delete_movie(&self, id: i64) -> StoreResult<bool>;

    async fn list_seats(&self) -> StoreResult<Vec<Seat>>;
    async fn get_seat(&self, id: i64) -> StoreResult<Option<Seat>>;
    async fn create_seat(&self, seat: NewSeat) -> StoreResult<Seat>;
    async fn update_seat(&self, id: i64, seat: NewSeat) -> StoreResult<Option<Seat>>;
    async fn delete_seat(&self, id: i64) -> StoreResult<bool>;

    /// Bookings of one user, newest first.
    async fn list_bookings_for_user(&self, user_id: i64) -> StoreResult<Vec<Booking>>;
    async fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>>;
    /// Marks the seat booked and inserts the booking as one atomic step.
    ///
    /// Fails with [`StoreError::SeatAlreadyBooked`] when the seat is taken,
    /// leaving nothing written.
    async fn reserve_seat(&self, booking: NewBooking) -> StoreResult<Booking>;
    /// Removes the booking and releases its seat.
    async fn delete_booking(&self, id: i64) -> StoreResult<bool>;

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn touch_last_login(&self, user_id: i64) -> StoreResult<()>;
}
