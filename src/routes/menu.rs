use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get},
    Json, Router,
};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Database,
};

use crate::db::MENU;
use crate::error::AppError;
use crate::routes::common::{delete_result, id_filter, insert_result, require_admin};

async fn list_menu(State(db): State<Database>) -> Result<Json<Vec<Document>>, AppError> {
    let collection = db.collection::<Document>(MENU);
    let mut cursor = collection.find(doc! {}).await?;
    let mut items = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        items.push(doc);
    }
    Ok(Json(items))
}

async fn create_item(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(item): Json<Document>,
) -> Result<Json<Document>, AppError> {
    require_admin(&db, &headers).await?;

    let result = db.collection::<Document>(MENU).insert_one(item).await?;
    Ok(Json(insert_result(&result)))
}

async fn delete_item(
    Path(id): Path<String>,
    State(db): State<Database>,
    headers: HeaderMap,
) -> Result<Json<Document>, AppError> {
    require_admin(&db, &headers).await?;

    let result = db
        .collection::<Document>(MENU)
        .delete_one(id_filter(&id))
        .await?;
    Ok(Json(delete_result(&result)))
}

pub fn menu_router(db: Database) -> Router {
    Router::new()
        .route("/", get(list_menu).post(create_item))
        .route("/{id}", delete(delete_item))
        .with_state(db)
}
