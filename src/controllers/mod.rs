pub mod accounts;
pub mod bookings;
pub mod movies;
pub mod pages;
pub mod seats;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    let api = Router::new()
        .route("/api/", get(api_root))
        .merge(movies::routes())
        .merge(seats::routes())
        .merge(bookings::routes())
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(api)
        .merge(pages::routes())
        .merge(accounts::routes())
}

// GET /api/
async fn api_root() -> Json<Value> {
    Json(json!({
        "movies": "/api/movies/",
        "seats": "/api/seats/",
        "bookings": "/api/bookings/"
    }))
}
