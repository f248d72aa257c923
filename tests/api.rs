mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{date, spawn_app, TestApp, PASSWORD};

async fn api_user(app: &TestApp) -> String {
    let username = common::fake_username();
    app.create_user(&username).await;
    username
}

#[tokio::test]
async fn health_and_index() {
    let app = spawn_app().await;
    let body = app.get("/health").send().await.unwrap().text().await.unwrap();
    assert_eq!(body, "OK");

    let index: Value = app.get("/api/").send().await.unwrap().json().await.unwrap();
    assert_eq!(index["bookings"], "/api/bookings/");
}

#[tokio::test]
async fn movie_crud() {
    let app = spawn_app().await;
    let user = api_user(&app).await;
    let movie = app.create_movie("API Movie", date(2025, 6, 15), 150).await;

    let list: Vec<Value> = app.get("/api/movies/").send().await.unwrap().json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "API Movie");

    let response = app
        .post("/api/movies/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({
            "title": "New Movie",
            "description": "A brand new movie.",
            "release_date": "2025-12-25",
            "duration": 100
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["title"], "New Movie");
    assert_eq!(app.state.store.list_movies().await.unwrap().len(), 2);

    let detail: Value = app
        .get(&format!("/api/movies/{}/", movie.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["title"], "API Movie");
    assert_eq!(detail["release_date"], "2025-06-15");

    let response = app
        .client
        .put(app.url(&format!("/api/movies/{}/", movie.id)))
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({
            "title": "Updated Movie",
            "description": "Updated description.",
            "release_date": "2025-06-15",
            "duration": 160
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.state.store.get_movie(movie.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Updated Movie");

    let response = app
        .client
        .patch(app.url(&format!("/api/movies/{}/", movie.id)))
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "duration": 170 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patched: Value = response.json().await.unwrap();
    assert_eq!(patched["duration"], 170);
    assert_eq!(patched["title"], "Updated Movie");

    let response = app
        .client
        .delete(app.url(&format!("/api/movies/{}/", movie.id)))
        .basic_auth(&user, Some(PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.state.store.get_movie(movie.id).await.unwrap().is_none());

    let response = app.get(&format!("/api/movies/{}/", movie.id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn movie_validation_errors() {
    let app = spawn_app().await;
    let user = api_user(&app).await;

    let response = app
        .post("/api/movies/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "title": "Incomplete Movie" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["description"][0], "This field is required.");
    assert_eq!(body["release_date"][0], "This field is required.");

    let response = app
        .post("/api/movies/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({
            "title": "x".repeat(201),
            "description": "Too long a title.",
            "release_date": "2025-01-01",
            "duration": 90
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("title").is_some());

    let response = app
        .post("/api/movies/")
        .basic_auth(&user, Some(PASSWORD))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn writes_require_authentication() {
    let app = spawn_app().await;
    api_user(&app).await;

    let response = app
        .post("/api/movies/")
        .json(&json!({
            "title": "Anonymous",
            "description": "d",
            "release_date": "2025-01-01",
            "duration": 90
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));

    let response = app
        .post("/api/seats/")
        .basic_auth("nobody", Some("wrongpass"))
        .json(&json!({ "seat_number": "Z9" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/api/bookings/").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seat_endpoints() {
    let app = spawn_app().await;
    let user = api_user(&app).await;
    let seat = app.create_seat("C3", false).await;

    let list: Vec<Value> = app.get("/api/seats/").send().await.unwrap().json().await.unwrap();
    assert_eq!(list.len(), 1);
    let available = list.iter().filter(|s| s["is_booked"] == false).count();
    assert_eq!(available, 1);

    let detail: Value = app
        .get(&format!("/api/seats/{}/", seat.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["seat_number"], "C3");
    assert_eq!(detail["is_booked"], false);

    let response = app
        .post("/api/seats/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "seat_number": "D4", "is_booked": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.state.store.list_seats().await.unwrap().len(), 2);

    let response = app
        .post("/api/seats/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "seat_number": "C3", "is_booked": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["seat_number"][0].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn booking_marks_seat_and_stamps_user() {
    let app = spawn_app().await;
    let user = api_user(&app).await;
    let movie = app.create_movie("Booking Movie", date(2025, 3, 1), 110).await;
    let seat = app.create_seat("E5", false).await;

    let response = app
        .post("/api/bookings/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "movie": movie.id, "seat": seat.id, "user": "someone-else" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking: Value = response.json().await.unwrap();
    assert_eq!(booking["movie"], movie.id);
    assert_eq!(booking["seat"], seat.id);
    assert_eq!(booking["user"], user.as_str());
    assert!(booking["booking_date"].is_string());

    assert!(app.state.store.get_seat(seat.id).await.unwrap().unwrap().is_booked);

    let list: Vec<Value> = app
        .get("/api/bookings/")
        .basic_auth(&user, Some(PASSWORD))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);

    let detail: Value = app
        .get(&format!("/api/bookings/{}/", booking["id"]))
        .basic_auth(&user, Some(PASSWORD))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["movie"], movie.id);
}

#[tokio::test]
async fn booking_a_booked_seat_is_rejected() {
    let app = spawn_app().await;
    let user = api_user(&app).await;
    let movie = app.create_movie("Booking Movie", date(2025, 3, 1), 110).await;
    let seat = app.create_seat("E5", true).await;

    let response = app
        .post("/api/bookings/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "movie": movie.id, "seat": seat.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "seat": ["This seat is already booked."] }));

    let response = app
        .post("/api/bookings/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({ "movie": 9999, "seat": seat.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["movie"][0], "Invalid pk \"9999\" - object does not exist.");

    let response = app
        .post("/api/bookings/")
        .basic_auth(&user, Some(PASSWORD))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["movie"][0], "This field is required.");
    assert_eq!(body["seat"][0], "This field is required.");
}

#[tokio::test]
async fn bookings_are_private_and_cancellable() {
    let app = spawn_app().await;
    let owner = api_user(&app).await;
    let other = api_user(&app).await;
    let movie = app.create_movie("Private Movie", date(2025, 3, 1), 110).await;
    let seat = app.create_seat("H8", false).await;

    let booking: Value = app
        .post("/api/bookings/")
        .basic_auth(&owner, Some(PASSWORD))
        .json(&json!({ "movie": movie.id, "seat": seat.id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let path = format!("/api/bookings/{}/", booking["id"]);

    let response = app.get(&path).basic_auth(&other, Some(PASSWORD)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list: Vec<Value> = app
        .get("/api/bookings/")
        .basic_auth(&other, Some(PASSWORD))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    let response = app
        .client
        .delete(app.url(&path))
        .basic_auth(&other, Some(PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .delete(app.url(&path))
        .basic_auth(&owner, Some(PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!app.state.store.get_seat(seat.id).await.unwrap().unwrap().is_booked);
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
    let app = spawn_app().await;
    let user = api_user(&app).await;

    for path in ["/api/movies/abc/", "/api/seats/abc/", "/api/movies/1.5/", "/api/seats/99999999999999999999/"] {
        let response = app.get(path).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "detail": "Not found." }), "{path}");
    }

    let response = app
        .get("/api/bookings/abc/")
        .basic_auth(&user, Some(PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Not found.");

    let response = app
        .client
        .delete(app.url("/api/movies/abc/"))
        .basic_auth(&user, Some(PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
