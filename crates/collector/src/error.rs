use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unsupported content type")]
    UnsupportedMediaType,

    #[error("invalid JSON body: {0}")]
    MalformedJson(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    // Storage detail stays in the server log; the client sees a generic
    // message.
    #[error("storage failure")]
    StorageFailure,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "expected content type application/json".to_string(),
            ),
            ApiError::MalformedJson(detail) => {
                (StatusCode::BAD_REQUEST, format!("invalid JSON body: {detail}"))
            }
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                format!("missing required fields: {}", fields.join(", ")),
            ),
            ApiError::StorageFailure => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal failure".to_string())
            }
        };

        let body = Json(serde_json::json!({
            "result": "failed",
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
