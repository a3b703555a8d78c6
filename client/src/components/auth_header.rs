//! Fixed header shown above every auth page.

use leptos::prelude::*;

use crate::routes::LOGIN_PATH;

/// Product title on the left, login link on the right.
#[component]
pub fn AuthHeader() -> impl IntoView {
    view! {
        <header class="fixed top-0 left-0 w-full py-6 px-5">
            <div class="container flex justify-between">
                <p>"URL.sh"</p>
                <a href=LOGIN_PATH>"Log in"</a>
            </div>
        </header>
    }
}

#[cfg(test)]
#[path = "auth_header_test.rs"]
mod tests;
