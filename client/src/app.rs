//! Root application component with routing and the SSR document shell.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{ParentRoute, Route, Router, Routes},
};

use crate::pages::{auth_layout::AuthLayout, auth_stub::AuthStubPage, waitlist::WaitlistPage};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// `/` mounts the waitlist. `/auth` mounts the auth layout, whose outlet
/// receives one of the placeholder pages.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/urlsh.css"/>
        <Title text="URL.sh"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=WaitlistPage/>
                <ParentRoute path=StaticSegment("auth") view=AuthLayout>
                    <Route path=StaticSegment("") view=AuthStubPage/>
                    <Route path=StaticSegment("signup") view=AuthStubPage/>
                    <Route path=StaticSegment("login") view=AuthStubPage/>
                    <Route path=StaticSegment("forgot-password") view=AuthStubPage/>
                    <Route path=StaticSegment("reset-password") view=AuthStubPage/>
                </ParentRoute>
            </Routes>
        </Router>
    }
}
