//! # client
//!
//! Leptos front-end for URL.sh. Rendered on the server by the `server`
//! crate (feature `ssr`) and hydrated in the browser (feature `hydrate`).
//!
//! The UI is a static page-composition layer: a route table, a header, an
//! auth layout wrapper, the waitlist landing page and placeholder auth pages.

pub mod app;
pub mod components;
pub mod pages;
pub mod routes;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
