//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page is mounted by a route in `app`; layouts delegate shared chrome
//! to `components`.

pub mod auth_layout;
pub mod auth_stub;
pub mod waitlist;
