//! Layout wrapping every `/auth` route.

use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::components::auth_header::AuthHeader;

/// Renders the auth header followed by the nested route in `<main>`.
#[component]
pub fn AuthLayout() -> impl IntoView {
    view! {
        <div>
            <AuthHeader/>
            <main>
                <Outlet/>
            </main>
        </div>
    }
}
