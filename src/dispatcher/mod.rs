//! # Dispatcher Module
//!
//! Turns one request into exactly one terminal action: a controller call, a
//! redirect, a middleware reply or a JSON error.
//!
//! ## Request Flow
//!
//! 1. Take the routes registered for the request method, in insertion order.
//! 2. For each route: skip it if it is auth-gated and the caller is anonymous,
//!    otherwise try to extract parameters. The first route that matches wins.
//! 3. For the winning route: resolve and run its middleware (any of them may
//!    answer the request), answer a redirect if the route is one, otherwise
//!    split the action at `@`. A route without a valid `Controller@action`
//!    is skipped and the scan continues.
//! 4. Resolve the controller under its own id, then under
//!    `<system>/<id>`. A missing controller or action is a 404.
//! 5. When no route of the request method answered, probe every other
//!    method's routes (auth ignored). Any match means 405 with an `Allow`
//!    header; otherwise the not-found controller for the current context
//!    answers.
//!
//! ## Not-Found Controllers
//!
//! Two ids are tried, in order:
//!
//! - `<subdomain>/<context>/<context>NotFoundController`
//! - `<System>/<context>/NotFoundController`
//!
//! where `<context>` is the dashboard or website context and `<subdomain>`
//! comes from the `Host` header (the system namespace on the bare domain).
//! If neither exists the dispatch fails with
//! [`DispatchError::NotFoundControllerMissing`](crate::error::DispatchError).
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use switchyard::config::RoutingConfig;
//! use switchyard::controller::{ActionController, ControllerTable};
//! use switchyard::dispatcher::{DispatchRequest, Dispatcher, OutcomeKind};
//! use switchyard::middleware::MiddlewareRegistry;
//! use switchyard::registry::{Registrar, RouteRegistry};
//! use switchyard::response::HandlerResponse;
//! use switchyard::route::{HttpMethod, RouteOptions};
//!
//! let mut registry = RouteRegistry::new();
//! registry.post("/widgets", "WidgetController@store", RouteOptions::new());
//!
//! let mut controllers = ControllerTable::new();
//! controllers.register(
//!     "WidgetController",
//!     ActionController::new().action("store", |_| HandlerResponse::json(201, json!({}))),
//! );
//!
//! let dispatcher = Dispatcher::new(
//!     registry,
//!     controllers,
//!     MiddlewareRegistry::new(),
//!     RoutingConfig::default(),
//! );
//!
//! let outcome = dispatcher
//!     .dispatch(&DispatchRequest::new(HttpMethod::Get, "/widgets"))
//!     .unwrap();
//! assert_eq!(outcome.response.status, 405);
//! assert_eq!(outcome.response.get_header("allow"), Some("POST"));
//! assert_eq!(
//!     outcome.kind,
//!     OutcomeKind::MethodNotAllowed { allowed: vec![HttpMethod::Post] }
//! );
//! ```

mod core;
mod request;

pub use core::{DispatchOutcome, Dispatcher, OutcomeKind};
pub use request::{resolve_subdomain, DispatchRequest, URL_QUERY_KEY};
