use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get},
    Json, Router,
};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    Database,
};

use crate::db::USERS;
use crate::error::AppError;
use crate::routes::common::{
    auth_claims, delete_result, id_filter, insert_result, require_admin, update_result,
};

async fn list_users(
    State(db): State<Database>,
    headers: HeaderMap,
) -> Result<Json<Vec<Document>>, AppError> {
    require_admin(&db, &headers).await?;

    let collection = db.collection::<Document>(USERS);
    let mut cursor = collection.find(doc! {}).await?;
    let mut users = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        users.push(doc);
    }
    Ok(Json(users))
}

// Check-then-insert, not an atomic upsert: two racing sign-ins for the same
// email can both pass the existence check.
async fn create_user(
    State(db): State<Database>,
    Json(user): Json<Document>,
) -> Result<Json<Document>, AppError> {
    let collection = db.collection::<Document>(USERS);

    let email = user.get("email").cloned().unwrap_or(Bson::Null);
    let existing = collection.find_one(doc! { "email": email }).await?;
    if existing.is_some() {
        return Ok(Json(doc! { "message": "User already exist!" }));
    }

    let result = collection.insert_one(user).await?;
    Ok(Json(insert_result(&result)))
}

async fn admin_flag(
    Path(email): Path<String>,
    State(db): State<Database>,
    headers: HeaderMap,
) -> Result<Json<Document>, AppError> {
    let claims = auth_claims(&headers)?;

    // callers may only ask about their own email
    if claims.email() != Some(email.as_str()) {
        return Ok(Json(doc! { "admin": false }));
    }

    let user = db
        .collection::<Document>(USERS)
        .find_one(doc! { "email": &email })
        .await?;
    let admin = user.map(|u| u.get_str("role") == Ok("admin")).unwrap_or(false);
    Ok(Json(doc! { "admin": admin }))
}

// Promotion takes no auth; the route is reachable by any caller.
async fn promote_user(
    Path(id): Path<String>,
    State(db): State<Database>,
) -> Result<Json<Document>, AppError> {
    let update = doc! { "$set": { "role": "admin" } };
    let result = db
        .collection::<Document>(USERS)
        .update_one(id_filter(&id), update)
        .await?;
    Ok(Json(update_result(&result)))
}

async fn delete_user(
    Path(id): Path<String>,
    State(db): State<Database>,
) -> Result<Json<Document>, AppError> {
    let result = db
        .collection::<Document>(USERS)
        .delete_one(id_filter(&id))
        .await?;
    Ok(Json(delete_result(&result)))
}

pub fn users_router(db: Database) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        // GET reads an email, PATCH promotes by object id; they share the segment
        .route("/admin/{key}", get(admin_flag).patch(promote_user))
        .route("/delete/{id}", delete(delete_user))
        .with_state(db)
}
