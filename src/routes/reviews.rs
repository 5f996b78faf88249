use axum::{extract::State, routing::get, Json, Router};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Database,
};

use crate::db::REVIEWS;
use crate::error::AppError;

async fn list_reviews(State(db): State<Database>) -> Result<Json<Vec<Document>>, AppError> {
    let collection = db.collection::<Document>(REVIEWS);
    let mut cursor = collection.find(doc! {}).await?;
    let mut reviews = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        reviews.push(doc);
    }
    Ok(Json(reviews))
}

pub fn reviews_router(db: Database) -> Router {
    Router::new().route("/", get(list_reviews)).with_state(db)
}
