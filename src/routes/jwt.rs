use axum::{routing::post, Json, Router};
use mongodb::bson::{doc, Document};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::routes::common::sign_token;

// Signs whatever claim object the client sends; the claim contents are not
// inspected here, only on later authenticated requests.
async fn issue_token(Json(claims): Json<Map<String, Value>>) -> Result<Json<Document>, AppError> {
    let token = sign_token(&claims)?;
    Ok(Json(doc! { "token": token }))
}

pub fn jwt_router() -> Router {
    Router::new().route("/jwt", post(issue_token))
}
