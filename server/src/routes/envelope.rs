//! JSON response envelope.
//!
//! Success bodies are `{"data": ...}`. Failures are `{"errors": [...]}` where
//! each entry is a message string or a `{"field","message"}` object.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::services::validation::FieldError;

#[derive(Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorBody<E> {
    pub errors: Vec<E>,
}

pub fn data<T: Serialize>(status: StatusCode, value: T) -> Response {
    (status, Json(DataBody { data: value })).into_response()
}

pub fn errors(status: StatusCode, messages: &[&str]) -> Response {
    (status, Json(ErrorBody { errors: messages.to_vec() })).into_response()
}

pub fn error(status: StatusCode, message: &str) -> Response {
    errors(status, &[message])
}

pub fn field_errors(list: Vec<FieldError>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { errors: list })).into_response()
}

pub fn bad_request() -> Response {
    error(StatusCode::BAD_REQUEST, "Bad Request")
}

pub fn internal_error() -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Decode a JSON body. Anything undecodable is a plain `Bad Request`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::info!(error = %e, "undecodable request body");
        bad_request()
    })
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
