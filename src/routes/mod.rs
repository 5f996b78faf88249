use axum::Router;
use mongodb::Database;

// api routes all import here
pub mod common;

mod carts;
mod jwt;
mod menu;
mod reviews;
mod users;

pub fn api_router(db: Database) -> Router {
    // merge all routes (an api is an endpoint) here
    Router::new()
        .merge(jwt::jwt_router())
        .nest("/users", users::users_router(db.clone()))
        .nest("/menu", menu::menu_router(db.clone()))
        .nest("/reviews", reviews::reviews_router(db.clone()))
        .nest("/carts", carts::carts_router(db))
}
