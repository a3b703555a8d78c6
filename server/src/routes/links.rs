//! Short link routes.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use super::envelope;
use crate::services::format_unix;
use crate::services::links::{self, Link, LinkError};
use crate::services::validation::Validator;
use crate::state::AppState;

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CreateLinkRequest {
    original_url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub original_url: String,
    pub short_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Link> for LinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            original_url: link.original_url.clone(),
            short_id: link.short_id.clone(),
            created_at: format_unix(link.created_at),
            updated_at: format_unix(link.updated_at),
        }
    }
}

fn link_error_response(err: LinkError) -> Response {
    match err {
        LinkError::InvalidUrl => envelope::error(StatusCode::BAD_REQUEST, "original_url must be a valid http(s) URL"),
        LinkError::ShortIdExhausted | LinkError::Db(_) => {
            tracing::error!(error = %err, "link operation failed");
            envelope::internal_error()
        }
    }
}

/// `POST /api/links`
pub async fn create_link(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> Response {
    let req: CreateLinkRequest = match envelope::decode(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let mut v = Validator::default();
    v.field("original_url", &req.original_url).required().max_len(2048).http_url();
    if let Err(list) = v.finish() {
        return envelope::field_errors(list);
    }

    match links::create_link(&state.pool, &auth.user.id, &req.original_url).await {
        Ok(link) => envelope::data(StatusCode::CREATED, LinkResponse::from(&link)),
        Err(e) => link_error_response(e),
    }
}

/// `GET /api/links`: the user's links, newest first.
pub async fn list_links(State(state): State<AppState>, auth: AuthUser) -> Response {
    match links::list_links(&state.pool, &auth.user.id).await {
        Ok(list) => envelope::data(StatusCode::OK, list.iter().map(LinkResponse::from).collect::<Vec<_>>()),
        Err(e) => link_error_response(e.into()),
    }
}

/// `GET /s/{short_id}`: redirect to the stored URL.
pub async fn follow_link(State(state): State<AppState>, Path(short_id): Path<String>) -> Response {
    match links::resolve(&state.pool, &short_id).await {
        Ok(Some(url)) => Redirect::temporary(&url).into_response(),
        Ok(None) => envelope::error(StatusCode::NOT_FOUND, "link not found"),
        Err(e) => link_error_response(e.into()),
    }
}

#[cfg(test)]
#[path = "links_test.rs"]
mod tests;
