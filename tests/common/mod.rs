#![allow(dead_code)]

use chrono::NaiveDate;
use fake::{faker::internet::en::Username, Fake};
use reqwest::{redirect, Client, Response};
use std::net::SocketAddr;
use std::sync::Arc;

use movie_theater::{
    build_router,
    config::Config,
    models::{Movie, NewMovie, NewSeat, Seat, User},
    AppState,
};

pub const PASSWORD: &str = "testpass123";

/// A server on an ephemeral port backed by the in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    /// Keeps cookies and never follows redirects.
    pub client: Client,
}

pub async fn spawn_app() -> TestApp {
    let state = AppState::in_memory(Config::in_memory());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, state, client }
}

pub fn fake_username() -> String {
    let name: String = Username().fake();
    let suffix: u16 = (1000..9999).fake();
    format!("{}_{}", name.replace(|c: char| !c.is_ascii_alphanumeric(), ""), suffix)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn create_user(&self, username: &str) -> User {
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();
        self.state.store.create_user(username, &hash).await.unwrap()
    }

    pub async fn create_movie(&self, title: &str, release_date: NaiveDate, duration: i32) -> Movie {
        self.state
            .store
            .create_movie(NewMovie {
                title: title.into(),
                description: format!("{title} description."),
                release_date,
                duration,
            })
            .await
            .unwrap()
    }

    pub async fn create_seat(&self, seat_number: &str, is_booked: bool) -> Seat {
        self.state
            .store
            .create_seat(NewSeat {
                seat_number: seat_number.into(),
                is_booked,
            })
            .await
            .unwrap()
    }

    /// Logs `username` in through the login form; the session cookie lands in the client jar.
    pub async fn login(&self, username: &str) -> Response {
        let response = self
            .client
            .post(self.url("/login/"))
            .form(&[("username", username), ("password", PASSWORD)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 302, "login failed for {username}");
        response
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
