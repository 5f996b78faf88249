use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::doc;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unauthorized access")]
    Unauthorized,

    #[error("forbidden access")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(#[from] mongodb::error::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => error_body(StatusCode::UNAUTHORIZED, "unauthorized access"),
            AppError::Forbidden => error_body(StatusCode::FORBIDDEN, "forbidden access"),
            AppError::Storage(e) => {
                error!("storage operation failed: {e}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            AppError::Token(e) => {
                error!("token signing failed: {e}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(doc! { "error": true, "message": message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_is_401_with_fixed_body() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_text(response).await,
            r#"{"error":true,"message":"unauthorized access"}"#
        );
    }

    #[tokio::test]
    async fn forbidden_is_403_with_fixed_body() {
        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_text(response).await,
            r#"{"error":true,"message":"forbidden access"}"#
        );
    }
}
