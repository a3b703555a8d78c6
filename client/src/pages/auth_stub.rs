//! Placeholder for auth pages that have no UI yet.

use leptos::prelude::*;

/// Renders nothing; the auth layout still shows its header.
#[component]
pub fn AuthStubPage() -> impl IntoView {}
