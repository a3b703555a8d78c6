//! Profile routes for the signed-in user.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use super::auth::{AuthUser, UserResponse, user_error_response};
use super::envelope;
use crate::services::password;
use crate::services::users::{self, UserError};
use crate::services::validation::Validator;
use crate::state::AppState;

/// `GET /api/user/me`: the current user.
pub async fn me(auth: AuthUser) -> Response {
    envelope::data(StatusCode::OK, UserResponse::from(&auth.user))
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

/// `POST /api/user/change-password`
pub async fn change_password(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> Response {
    let req: ChangePasswordRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("current_password", &req.current_password).required();
    v.field("new_password", &req.new_password).required().min_len(8).max_len(50).password();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    match password::verify_password(&req.current_password, &auth.user.password_hash).await {
        Ok(true) => {}
        Ok(false) => return user_error_response(UserError::IncorrectPassword),
        Err(e) => return user_error_response(e.into()),
    }

    match users::change_password(&state.pool, &state.passwords, &auth.user, &req.new_password).await {
        Ok(()) => {
            tracing::info!(user_id = %auth.user.id, "password changed");
            envelope::data(StatusCode::OK, serde_json::json!({}))
        }
        Err(e) => user_error_response(e),
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
