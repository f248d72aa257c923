use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::{
    Repository, StoreError, StoreResult, MOVIE_SEAT_TAKEN, SEAT_NUMBER_TAKEN, USERNAME_TAKEN,
};
use crate::models::{Booking, Movie, NewBooking, NewMovie, NewSeat, Seat, User};

#[derive(Debug, Clone)]
struct BookingRow {
    id: i64,
    movie_id: i64,
    seat_id: i64,
    user_id: i64,
    booking_date: chrono::DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    movies: BTreeMap<i64, Movie>,
    seats: BTreeMap<i64, Seat>,
    bookings: BTreeMap<i64, BookingRow>,
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Joins a booking row with its user, movie and seat; `None` if any is gone.
    fn hydrate(&self, row: &BookingRow) -> Option<Booking> {
        let user = self.users.get(&row.user_id)?;
        let movie = self.movies.get(&row.movie_id)?;
        let seat = self.seats.get(&row.seat_id)?;
        Some(Booking {
            id: row.id,
            movie_id: row.movie_id,
            seat_id: row.seat_id,
            user_id: row.user_id,
            booking_date: row.booking_date,
            username: user.username.clone(),
            movie_title: movie.title.clone(),
            seat_number: seat.seat_number.clone(),
        })
    }

    fn seat_number_taken(&self, number: &str, except: Option<i64>) -> bool {
        self.seats
            .values()
            .any(|s| s.seat_number == number && Some(s.id) != except)
    }

    fn release_seat(&mut self, seat_id: i64) {
        if let Some(seat) = self.seats.get_mut(&seat_id) {
            seat.is_booked = false;
        }
    }
}

/// In-process [`Repository`] with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        Ok(self.tables.lock().await.movies.values().cloned().collect())
    }

    async fn get_movie(&self, id: i64) -> StoreResult<Option<Movie>> {
        Ok(self.tables.lock().await.movies.get(&id).cloned())
    }

    async fn create_movie(&self, movie: NewMovie) -> StoreResult<Movie> {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        let movie = movie.into_movie(id);
        tables.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: i64, movie: NewMovie) -> StoreResult<Option<Movie>> {
        let mut tables = self.tables.lock().await;
        let Some(slot) = tables.movies.get_mut(&id) else {
            return Ok(None);
        };
        *slot = movie.into_movie(id);
        Ok(Some(slot.clone()))
    }

    async fn delete_movie(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.movies.remove(&id).is_none() {
            return Ok(false);
        }
        let orphaned: Vec<BookingRow> = tables
            .bookings
            .values()
            .filter(|b| b.movie_id == id)
            .cloned()
            .collect();
        for row in orphaned {
            tables.bookings.remove(&row.id);
            tables.release_seat(row.seat_id);
        }
        Ok(true)
    }

    async fn list_seats(&self) -> StoreResult<Vec<Seat>> {
        Ok(self.tables.lock().await.seats.values().cloned().collect())
    }

    async fn get_seat(&self, id: i64) -> StoreResult<Option<Seat>> {
        Ok(self.tables.lock().await.seats.get(&id).cloned())
    }

    async fn create_seat(&self, seat: NewSeat) -> StoreResult<Seat> {
        let mut tables = self.tables.lock().await;
        if tables.seat_number_taken(&seat.seat_number, None) {
            return Err(StoreError::Conflict {
                field: "seat_number",
                message: SEAT_NUMBER_TAKEN,
            });
        }
        let id = tables.next_id();
        let seat = seat.into_seat(id);
        tables.seats.insert(id, seat.clone());
        Ok(seat)
    }

    async fn update_seat(&self, id: i64, seat: NewSeat) -> StoreResult<Option<Seat>> {
        let mut tables = self.tables.lock().await;
        if !tables.seats.contains_key(&id) {
            return Ok(None);
        }
        if tables.seat_number_taken(&seat.seat_number, Some(id)) {
            return Err(StoreError::Conflict {
                field: "seat_number",
                message: SEAT_NUMBER_TAKEN,
            });
        }
        let seat = seat.into_seat(id);
        tables.seats.insert(id, seat.clone());
        Ok(Some(seat))
    }

    async fn delete_seat(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.seats.remove(&id).is_none() {
            return Ok(false);
        }
        tables.bookings.retain(|_, b| b.seat_id != id);
        Ok(true)
    }

    async fn list_bookings_for_user(&self, user_id: i64) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.lock().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| tables.hydrate(b))
            .collect();
        bookings.sort_by(|a, b| (b.booking_date, b.id).cmp(&(a.booking_date, a.id)));
        Ok(bookings)
    }

    async fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.get(&id).and_then(|b| tables.hydrate(b)))
    }

    async fn reserve_seat(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut tables = self.tables.lock().await;

        match tables.seats.get(&booking.seat_id) {
            Some(seat) if !seat.is_booked => {}
            _ => return Err(StoreError::SeatAlreadyBooked(booking.seat_id)),
        }
        if tables
            .bookings
            .values()
            .any(|b| b.movie_id == booking.movie_id && b.seat_id == booking.seat_id)
        {
            return Err(StoreError::Conflict {
                field: "non_field_errors",
                message: MOVIE_SEAT_TAKEN,
            });
        }

        let id = tables.next_id();
        let row = BookingRow {
            id,
            movie_id: booking.movie_id,
            seat_id: booking.seat_id,
            user_id: booking.user_id,
            booking_date: booking.booking_date,
        };
        let Some(created) = tables.hydrate(&row) else {
            return Err(StoreError::DanglingReference);
        };
        if let Some(seat) = tables.seats.get_mut(&booking.seat_id) {
            seat.is_booked = true;
        }
        tables.bookings.insert(id, row);
        Ok(created)
    }

    async fn delete_booking(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.bookings.remove(&id) else {
            return Ok(false);
        };
        tables.release_seat(row.seat_id);
        Ok(true)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict {
                field: "username",
                message: USERNAME_TAKEN,
            });
        }
        let id = tables.next_id();
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            date_joined: Utc::now(),
            last_login: None,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn touch_last_login(&self, user_id: i64) -> StoreResult<()> {
        if let Some(user) = self.tables.lock().await.users.get_mut(&user_id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn seeded() -> (MemoryRepository, Movie, Seat, User) {
        let repo = MemoryRepository::new();
        let movie = repo
            .create_movie(NewMovie {
                title: "Test Movie".into(),
                description: "Description".into(),
                release_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                duration: 90,
            })
            .await
            .unwrap();
        let seat = repo
            .create_seat(NewSeat { seat_number: "B2".into(), is_booked: false })
            .await
            .unwrap();
        let user = repo.create_user("testuser", "hash").await.unwrap();
        (repo, movie, seat, user)
    }

    fn new_booking(movie: &Movie, seat: &Seat, user: &User) -> NewBooking {
        NewBooking {
            movie_id: movie.id,
            seat_id: seat.id,
            user_id: user.id,
            booking_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn seat_numbers_are_unique() {
        let (repo, _, seat, _) = seeded().await;
        let err = repo
            .create_seat(NewSeat { seat_number: "B2".into(), is_booked: false })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "seat_number", .. }));

        // renaming a seat to its own number is not a conflict
        let same = repo
            .update_seat(seat.id, NewSeat { seat_number: "B2".into(), is_booked: true })
            .await
            .unwrap()
            .unwrap();
        assert!(same.is_booked);
    }

    #[tokio::test]
    async fn reserve_marks_seat_and_joins_names() {
        let (repo, movie, seat, user) = seeded().await;
        let booking = repo.reserve_seat(new_booking(&movie, &seat, &user)).await.unwrap();

        assert_eq!(booking.to_string(), "testuser - Test Movie - Seat B2");
        assert!(repo.get_seat(seat.id).await.unwrap().unwrap().is_booked);
    }

    #[tokio::test]
    async fn booked_seat_cannot_be_reserved_twice() {
        let (repo, movie, seat, user) = seeded().await;
        repo.reserve_seat(new_booking(&movie, &seat, &user)).await.unwrap();

        let err = repo
            .reserve_seat(new_booking(&movie, &seat, &user))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SeatAlreadyBooked(id) if id == seat.id));
        assert_eq!(repo.list_bookings_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_booking_releases_seat() {
        let (repo, movie, seat, user) = seeded().await;
        let booking = repo.reserve_seat(new_booking(&movie, &seat, &user)).await.unwrap();

        assert!(repo.delete_booking(booking.id).await.unwrap());
        assert!(!repo.get_seat(seat.id).await.unwrap().unwrap().is_booked);
        assert!(!repo.delete_booking(booking.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_movie_cascades() {
        let (repo, movie, seat, user) = seeded().await;
        repo.reserve_seat(new_booking(&movie, &seat, &user)).await.unwrap();

        assert!(repo.delete_movie(movie.id).await.unwrap());
        assert!(repo.list_bookings_for_user(user.id).await.unwrap().is_empty());
        assert!(!repo.get_seat(seat.id).await.unwrap().unwrap().is_booked);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let (repo, _, _, _) = seeded().await;
        let err = repo.create_user("testuser", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "username", .. }));
    }

    #[tokio::test]
    async fn reserving_for_a_missing_user_or_movie_writes_nothing() {
        let (repo, movie, seat, user) = seeded().await;

        let mut orphan = new_booking(&movie, &seat, &user);
        orphan.user_id = 9999;
        let err = repo.reserve_seat(orphan).await.unwrap_err();
        assert!(matches!(err, StoreError::DanglingReference));

        let mut orphan = new_booking(&movie, &seat, &user);
        orphan.movie_id = 9999;
        let err = repo.reserve_seat(orphan).await.unwrap_err();
        assert!(matches!(err, StoreError::DanglingReference));

        assert!(!repo.get_seat(seat.id).await.unwrap().unwrap().is_booked);
        assert!(repo.list_bookings_for_user(user.id).await.unwrap().is_empty());
    }
}
