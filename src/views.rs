//! Askama page templates. Every page carries the nav user and pending messages.

use askama::Template;

use crate::middleware::Message;
use crate::models::{Booking, Movie, Seat};

#[derive(Template)]
#[template(path = "movie_list.html")]
pub struct MovieListPage {
    pub user: Option<String>,
    pub messages: Vec<Message>,
    pub movies: Vec<Movie>,
}

#[derive(Template)]
#[template(path = "seat_booking.html")]
pub struct SeatBookingPage {
    pub user: Option<String>,
    pub messages: Vec<Message>,
    pub movie: Movie,
    pub seats: Vec<Seat>,
}

#[derive(Template)]
#[template(path = "booking_history.html")]
pub struct BookingHistoryPage {
    pub user: Option<String>,
    pub messages: Vec<Message>,
    pub bookings: Vec<Booking>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub user: Option<String>,
    pub messages: Vec<Message>,
    pub username: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub user: Option<String>,
    pub messages: Vec<Message>,
    pub username: String,
    pub next: String,
    pub errors: Vec<String>,
}
