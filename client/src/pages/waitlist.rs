//! Landing page mounted at `/`.

use leptos::prelude::*;

#[component]
pub fn WaitlistPage() -> impl IntoView {
    view! {
        <div class="waitlist-page">
            <h1>"URL.sh"</h1>
            <p class="waitlist-page__tagline">"Short links, coming soon."</p>
        </div>
    }
}
