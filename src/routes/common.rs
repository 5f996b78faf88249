use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    results::{DeleteResult, InsertOneResult, UpdateResult},
    Database,
};
use serde_json::{json, Map, Value};

use crate::db::USERS;
use crate::error::AppError;

pub const TOKEN_TTL_SECS: u64 = 60 * 60;

/// Decoded token payload. The claim set is whatever the caller signed;
/// an email claim is the only one the API ever reads back.
#[derive(Debug, Clone)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }
}

fn token_secret() -> String {
    std::env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| "secret-key-change-me".to_string())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn sign_token(claims: &Map<String, Value>) -> Result<String, jsonwebtoken::errors::Error> {
    let mut payload = claims.clone();
    payload.insert("exp".to_string(), json!(now_secs() + TOKEN_TTL_SECS));
    encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(token_secret().as_bytes()),
    )
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(token_secret().as_bytes()),
        &validation,
    )
    .map(|data| Claims(data.claims))
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|s| s.to_string())
}

/// Authentication stage. A missing header, a non-bearer scheme and an
/// invalid or expired token are all rejected identically.
pub fn auth_claims(headers: &HeaderMap) -> Result<Claims, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    decode_token(&token).map_err(|_| AppError::Unauthorized)
}

/// Authorization stage. Runs authentication itself so the role lookup can
/// never observe an unauthenticated request.
pub async fn require_admin(db: &Database, headers: &HeaderMap) -> Result<Claims, AppError> {
    let claims = auth_claims(headers)?;
    let email = claims.email().ok_or(AppError::Forbidden)?.to_string();
    let user = db
        .collection::<Document>(USERS)
        .find_one(doc! { "email": email })
        .await?;
    match user {
        Some(user) if user.get_str("role") == Ok("admin") => Ok(claims),
        _ => Err(AppError::Forbidden),
    }
}

/// Match a path id against `_id` as an ObjectId, falling back to the raw
/// string when it does not parse. A malformed id then matches nothing and
/// surfaces as a zero-count result.
pub fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => doc! { "_id": id },
    }
}

pub fn insert_result(result: &InsertOneResult) -> Document {
    doc! {
        "acknowledged": true,
        "insertedId": result.inserted_id.clone(),
    }
}

pub fn update_result(result: &UpdateResult) -> Document {
    let upserted = result.upserted_id.clone();
    let upserted_count: i64 = if upserted.is_some() { 1 } else { 0 };
    doc! {
        "acknowledged": true,
        "matchedCount": result.matched_count as i64,
        "modifiedCount": result.modified_count as i64,
        "upsertedCount": upserted_count,
        "upsertedId": upserted.unwrap_or(Bson::Null),
    }
}

pub fn delete_result(result: &DeleteResult) -> Document {
    doc! {
        "acknowledged": true,
        "deletedCount": result.deleted_count as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn claims_with_email(email: &str) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("email".to_string(), json!(email));
        claims
    }

    #[test]
    fn sign_and_decode_round_trip_preserves_claims() {
        let mut claims = claims_with_email("alice@bistro.test");
        claims.insert("name".to_string(), json!("Alice"));
        claims.insert("photoURL".to_string(), json!("https://img.example/a.png"));

        let token = sign_token(&claims).unwrap();
        let decoded = decode_token(&token).unwrap();

        assert_eq!(decoded.email(), Some("alice@bistro.test"));
        assert_eq!(decoded.0.get("name"), Some(&json!("Alice")));
        assert_eq!(decoded.0.get("photoURL"), Some(&json!("https://img.example/a.png")));
        assert!(decoded.0.get("exp").and_then(Value::as_u64).is_some());
    }

    #[test]
    fn expired_token_is_rejected() {
        // expired well past the validation leeway
        let mut payload = claims_with_email("alice@bistro.test");
        payload.insert("exp".to_string(), json!(now_secs() - 7200));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(token_secret().as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let mut payload = claims_with_email("alice@bistro.test");
        payload.insert("exp".to_string(), json!(now_secs() + 3600));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn auth_claims_rejects_missing_and_garbage_tokens() {
        let mut headers = HeaderMap::new();
        assert!(matches!(auth_claims(&headers), Err(AppError::Unauthorized)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"));
        assert!(matches!(auth_claims(&headers), Err(AppError::Unauthorized)));
    }

    #[test]
    fn id_filter_parses_object_ids_and_keeps_raw_strings() {
        let oid = ObjectId::new();
        assert_eq!(id_filter(&oid.to_hex()), doc! { "_id": oid });
        assert_eq!(id_filter("not-an-oid"), doc! { "_id": "not-an-oid" });
    }
}
