//! Static page route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! The Leptos router in `app` declares the same paths as view markup. This
//! table is the data form of those declarations so the header link, the
//! server and the tests can refer to a path without spelling it twice.
//! Matching itself stays with the router.

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

/// Path of the auth layout; every auth page is nested under it.
pub const AUTH_PATH: &str = "/auth";

/// Outbound link target rendered by the auth header.
pub const LOGIN_PATH: &str = "/auth/login";

/// Component mounted at a page path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Waitlist,
    AuthLayout,
    Signup,
    Login,
    ForgotPassword,
    ResetPassword,
}

impl PageKind {
    /// Placeholder pages render nothing inside the auth layout.
    #[must_use]
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Signup | Self::Login | Self::ForgotPassword | Self::ResetPassword)
    }
}

/// One row of the route table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRoute {
    pub path: &'static str,
    pub kind: PageKind,
}

/// Every page path served by the app, in declaration order.
pub const PAGE_ROUTES: &[PageRoute] = &[
    PageRoute { path: "/", kind: PageKind::Waitlist },
    PageRoute { path: AUTH_PATH, kind: PageKind::AuthLayout },
    PageRoute { path: "/auth/signup", kind: PageKind::Signup },
    PageRoute { path: LOGIN_PATH, kind: PageKind::Login },
    PageRoute { path: "/auth/forgot-password", kind: PageKind::ForgotPassword },
    PageRoute { path: "/auth/reset-password", kind: PageKind::ResetPassword },
];

/// Exact lookup of a path in the route table.
#[must_use]
pub fn page_for(path: &str) -> Option<PageKind> {
    PAGE_ROUTES
        .iter()
        .find(|route| route.path == path)
        .map(|route| route.kind)
}

/// True for the auth layout path and any path nested below it.
#[must_use]
pub fn is_auth_path(path: &str) -> bool {
    path == AUTH_PATH
        || path
            .strip_prefix(AUTH_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}
