use askama::Template;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::middleware::{flash, Flash, IdPath, MaybeUser, Message, RequireLogin};
use crate::services::booking::{book_seat, BookingError, SEAT_ALREADY_BOOKED};
use crate::views::{BookingHistoryPage, MovieListPage, SeatBookingPage};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(movie_list))
        .route("/book/{movie_id}/", get(seat_booking).post(book))
        .route("/history/", get(booking_history))
}

/// Renders `page`, dropping the flash cookie once its messages are shown.
pub(crate) fn render(page: &impl Template, flash: &Flash) -> Result<Response, AppError> {
    let html = Html(page.render()?);
    if flash.is_empty() {
        Ok(html.into_response())
    } else {
        Ok(([(header::SET_COOKIE, flash::clear_cookie())], html).into_response())
    }
}

/// 302 to `location`, setting each of `cookies`.
pub(crate) fn redirect(location: &str, cookies: Vec<String>) -> Response {
    let mut headers = vec![(header::LOCATION, location.to_string())];
    headers.extend(cookies.into_iter().map(|cookie| (header::SET_COOKIE, cookie)));
    (StatusCode::FOUND, AppendHeaders(headers)).into_response()
}

// GET /
async fn movie_list(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
    flash: Flash,
) -> Result<Response, AppError> {
    let page = MovieListPage {
        user: user.username(),
        messages: flash.0.clone(),
        movies: state.store.list_movies().await?,
    };
    render(&page, &flash)
}

// GET /book/{movie_id}/
async fn seat_booking(
    State(state): State<Arc<AppState>>,
    RequireLogin(user): RequireLogin,
    IdPath(movie_id): IdPath<i64>,
    flash: Flash,
) -> Result<Response, AppError> {
    let movie = state.store.get_movie(movie_id).await?.ok_or(AppError::NotFound)?;
    let page = SeatBookingPage {
        user: Some(user.username),
        messages: flash.0.clone(),
        movie,
        seats: state.store.list_seats().await?,
    };
    render(&page, &flash)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub seat_id: Option<String>,
}

// POST /book/{movie_id}/
async fn book(
    State(state): State<Arc<AppState>>,
    RequireLogin(user): RequireLogin,
    IdPath(movie_id): IdPath<i64>,
    flash: Flash,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let movie = state.store.get_movie(movie_id).await?.ok_or(AppError::NotFound)?;
    let seat_id = form
        .seat_id
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or(AppError::NotFound)?;
    let seat = state.store.get_seat(seat_id).await?.ok_or(AppError::NotFound)?;

    match book_seat(state.store.as_ref(), &user, movie.id, seat.id).await {
        Ok(_) => {
            let message = Message::success(format!("Successfully booked {} for {}!", seat, movie.title));
            Ok(redirect("/history/", vec![flash::set_cookie(&[message])]))
        }
        Err(BookingError::SeatAlreadyBooked(_)) => {
            let mut messages = flash.0.clone();
            messages.push(Message::error(SEAT_ALREADY_BOOKED));
            let page = SeatBookingPage {
                user: Some(user.username),
                messages,
                movie,
                seats: state.store.list_seats().await?,
            };
            render(&page, &flash)
        }
        Err(BookingError::MovieNotFound(_) | BookingError::SeatNotFound(_)) => Err(AppError::NotFound),
        Err(BookingError::Store(e)) => Err(e.into()),
    }
}

// GET /history/
async fn booking_history(
    State(state): State<Arc<AppState>>,
    RequireLogin(user): RequireLogin,
    flash: Flash,
) -> Result<Response, AppError> {
    let page = BookingHistoryPage {
        messages: flash.0.clone(),
        bookings: state.store.list_bookings_for_user(user.id).await?,
        user: Some(user.username),
    };
    render(&page, &flash)
}
