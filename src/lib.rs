use std::time::Duration;

use axum::{routing::get, Router};
use mongodb::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod routes;

pub fn app(db: Database) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .merge(routes::api_router(db))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

async fn root_handler() -> &'static str {
    "bistro boss is running"
}
