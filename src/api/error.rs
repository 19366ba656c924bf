//! Mapping from domain errors to HTTP responses

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            DomainError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            DomainError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            DomainError::Database(msg) => {
                // Store details stay in the logs
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Unwrap a JSON body, turning every rejection into a 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, DomainError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| DomainError::validation(format!("Invalid data: {}", rejection.body_text())))
}

/// Unwrap a path parameter; a malformed id is a 400 with a JSON body
pub fn path_param<T>(param: Result<Path<T>, PathRejection>) -> Result<T, DomainError> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| DomainError::validation(format!("Invalid path: {}", rejection.body_text())))
}

pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, DomainError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| DomainError::validation(format!("Invalid query: {}", rejection.body_text())))
}
