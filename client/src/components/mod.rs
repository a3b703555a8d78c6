//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components are presentational: no inputs beyond props, no side effects.

pub mod auth_header;
