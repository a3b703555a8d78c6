//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API, the short link redirect and the Leptos SSR
//! pages under a single Axum router. Compiled client assets are served from
//! `/pkg`. Anything else falls through to a plain 404.

pub mod auth;
pub mod envelope;
pub mod links;
pub mod user;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// JSON API, redirect and health routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/email-verification", post(auth::verify_email))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/password-reset/start", post(auth::start_password_reset))
        .route("/api/auth/password-reset", post(auth::reset_password))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/user/me", get(user::me))
        .route("/api/user/change-password", post(user::change_password))
        .route("/api/links", get(links::list_links).post(links::create_link))
        .route("/s/{short_id}", get(links::follow_link))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// API routes + Leptos SSR pages + `/pkg` assets + 404 fallback.
pub fn app(state: AppState, leptos_options: LeptosOptions) -> Router {
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "All systems OK"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Page not found.")
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
