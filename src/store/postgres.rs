use async_trait::async_trait;
use tracing::debug;

use super::{
    Repository, StoreError, StoreResult, MOVIE_SEAT_TAKEN, SEAT_NUMBER_TAKEN, USERNAME_TAKEN,
};
use crate::database::Database;
use crate::models::{Booking, Movie, NewBooking, NewMovie, NewSeat, Seat, User};

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.movie_id, b.seat_id, b.user_id, b.booking_date,
           u.username, m.title AS movie_title, s.seat_number
    FROM bookings b
    JOIN users u ON u.id = b.user_id
    JOIN movies m ON m.id = b.movie_id
    JOIN seats s ON s.id = b.seat_id
"#;

/// Turns unique violations on the named constraints into field conflicts
/// and foreign key violations into `DanglingReference`.
fn map_constraint(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let conflict = match db_err.constraint() {
                Some("seats_seat_number_key") => Some(("seat_number", SEAT_NUMBER_TAKEN)),
                Some("users_username_key") => Some(("username", USERNAME_TAKEN)),
                Some("bookings_movie_seat_key") => Some(("non_field_errors", MOVIE_SEAT_TAKEN)),
                _ => None,
            };
            if let Some((field, message)) = conflict {
                return StoreError::Conflict { field, message };
            }
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::DanglingReference;
        }
    }
    StoreError::Database(err)
}

#[derive(Clone)]
pub struct PgRepository {
    db: Database,
}

impl PgRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date, duration FROM movies ORDER BY id",
        )
        .fetch_all(&self.db.pool)
        .await?;
        Ok(movies)
    }

    async fn get_movie(&self, id: i64) -> StoreResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, release_date, duration FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(movie)
    }

    async fn create_movie(&self, movie: NewMovie) -> StoreResult<Movie> {
        let created = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, description, release_date, duration)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, release_date, duration
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.release_date)
        .bind(movie.duration)
        .fetch_one(&self.db.pool)
        .await?;
        Ok(created)
    }

    async fn update_movie(&self, id: i64, movie: NewMovie) -> StoreResult<Option<Movie>> {
        let updated = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET title = $2, description = $3, release_date = $4, duration = $5
            WHERE id = $1
            RETURNING id, title, description, release_date, duration
            "#,
        )
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.release_date)
        .bind(movie.duration)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_movie(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.db.pool.begin().await?;

        let released = sqlx::query(
            r#"
            UPDATE seats SET is_booked = FALSE
            WHERE id IN (SELECT seat_id FROM bookings WHERE movie_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // bookings go with the movie via ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(
            "deleted movie {} ({} seats released)",
            id,
            released.rows_affected()
        );
        Ok(deleted.rows_affected() > 0)
    }

    async fn list_seats(&self) -> StoreResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT id, seat_number, is_booked FROM seats ORDER BY id",
        )
        .fetch_all(&self.db.pool)
        .await?;
        Ok(seats)
    }

    async fn get_seat(&self, id: i64) -> StoreResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>(
            "SELECT id, seat_number, is_booked FROM seats WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(seat)
    }

    async fn create_seat(&self, seat: NewSeat) -> StoreResult<Seat> {
        sqlx::query_as::<_, Seat>(
            r#"
            INSERT INTO seats (seat_number, is_booked)
            VALUES ($1, $2)
            RETURNING id, seat_number, is_booked
            "#,
        )
        .bind(&seat.seat_number)
        .bind(seat.is_booked)
        .fetch_one(&self.db.pool)
        .await
        .map_err(map_constraint)
    }

    async fn update_seat(&self, id: i64, seat: NewSeat) -> StoreResult<Option<Seat>> {
        sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats SET seat_number = $2, is_booked = $3
            WHERE id = $1
            RETURNING id, seat_number, is_booked
            "#,
        )
        .bind(id)
        .bind(&seat.seat_number)
        .bind(seat.is_booked)
        .fetch_optional(&self.db.pool)
        .await
        .map_err(map_constraint)
    }

    async fn delete_seat(&self, id: i64) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM seats WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn list_bookings_for_user(&self, user_id: i64) -> StoreResult<Vec<Booking>> {
        let query = format!("{BOOKING_SELECT} WHERE b.user_id = $1 ORDER BY b.booking_date DESC, b.id DESC");
        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(bookings)
    }

    async fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>> {
        let query = format!("{BOOKING_SELECT} WHERE b.id = $1");
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(booking)
    }

    async fn reserve_seat(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut tx = self.db.pool.begin().await?;

        // FREE -> BOOKED only; a concurrent winner leaves zero rows here
        let claimed = sqlx::query("UPDATE seats SET is_booked = TRUE WHERE id = $1 AND is_booked = FALSE")
            .bind(booking.seat_id)
            .execute(&mut *tx)
            .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::SeatAlreadyBooked(booking.seat_id));
        }

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (movie_id, seat_id, user_id, booking_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(booking.movie_id)
        .bind(booking.seat_id)
        .bind(booking.user_id)
        .bind(booking.booking_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint)?;

        let query = format!("{BOOKING_SELECT} WHERE b.id = $1");
        let created = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn delete_booking(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.db.pool.begin().await?;

        let seat_id = sqlx::query_scalar::<_, i64>("DELETE FROM bookings WHERE id = $1 RETURNING seat_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(seat_id) = seat_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE seats SET is_booked = FALSE WHERE id = $1")
            .bind(seat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, date_joined, last_login
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db.pool)
        .await
        .map_err(map_constraint)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined, last_login FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined, last_login FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.db.pool)
            .await?;
        Ok(())
    }
}
