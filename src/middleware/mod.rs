//! # Middleware Module
//!
//! Middleware named on a route runs after the route is selected and before
//! its redirect or handler. Aliases are resolved through a
//! [`MiddlewareRegistry`]; an unknown alias is a configuration fault
//! ([`crate::error::DispatchError::MiddlewareNotFound`]) reported before any
//! middleware runs.

mod auth;
mod core;

pub use auth::AuthMiddleware;
pub use core::{Middleware, MiddlewareChain, MiddlewareRegistry};
