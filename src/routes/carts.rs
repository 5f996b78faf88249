use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{delete, get},
    Json, Router,
};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Database,
};
use serde::Deserialize;

use crate::db::CARTS;
use crate::error::AppError;
use crate::routes::common::{auth_claims, delete_result, id_filter, insert_result};

#[derive(Deserialize)]
struct CartQuery {
    email: Option<String>,
}

async fn list_carts(
    State(db): State<Database>,
    Query(query): Query<CartQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Document>>, AppError> {
    let claims = auth_claims(&headers)?;

    let Some(email) = query.email else {
        return Ok(Json(Vec::new()));
    };
    if claims.email() != Some(email.as_str()) {
        return Err(AppError::Forbidden);
    }

    let collection = db.collection::<Document>(CARTS);
    let mut cursor = collection.find(doc! { "email": &email }).await?;
    let mut items = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        items.push(doc);
    }
    Ok(Json(items))
}

// Insertion carries whatever owner email the body claims; only listing is
// tied to the token.
async fn create_cart_item(
    State(db): State<Database>,
    Json(item): Json<Document>,
) -> Result<Json<Document>, AppError> {
    let result = db.collection::<Document>(CARTS).insert_one(item).await?;
    Ok(Json(insert_result(&result)))
}

async fn delete_cart_item(
    Path(id): Path<String>,
    State(db): State<Database>,
) -> Result<Json<Document>, AppError> {
    let result = db
        .collection::<Document>(CARTS)
        .delete_one(id_filter(&id))
        .await?;
    Ok(Json(delete_result(&result)))
}

pub fn carts_router(db: Database) -> Router {
    Router::new()
        .route("/", get(list_carts).post(create_cart_item))
        .route("/{id}", delete(delete_cart_item))
        .with_state(db)
}
