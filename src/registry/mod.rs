//! # Registry Module
//!
//! The route table. Routes live in one bucket per HTTP method, kept in
//! insertion order because the dispatcher scans them in that order and the
//! first valid match wins. Within a method, paths are unique; registering the
//! same path again replaces the earlier route without moving it.
//!
//! ## Declaring Routes
//!
//! Declarations go through the [`Registrar`] trait, implemented by the
//! [`RouteRegistry`] and by the [`RouteGroup`] scope handed to group builders:
//!
//! ```rust
//! use switchyard::registry::{GroupAttributes, Registrar, RouteRegistry};
//! use switchyard::route::{HttpMethod, RouteOptions};
//!
//! let mut registry = RouteRegistry::new();
//! registry.get("/", "HomeController@index", RouteOptions::new().name("home"));
//! registry.group(
//!     GroupAttributes::new().prefix("/admin").middleware(["auth"]),
//!     |admin| {
//!         admin.get("/x", "AdminController@x", RouteOptions::new());
//!     },
//! );
//!
//! let route = registry.find_route(HttpMethod::Get, "/admin/x").unwrap();
//! assert_eq!(route.options.middleware, vec!["auth".to_string()]);
//! ```
//!
//! ## Snapshots
//!
//! The table can be serialized to a checksummed JSON document and restored
//! verbatim, either in memory or through a cache file (see
//! [`RouteRegistry::load_or_build`]).

mod core;
mod group;
mod snapshot;

pub use core::RouteRegistry;
pub use group::{GroupAttributes, Registrar, RouteGroup};
pub use snapshot::SNAPSHOT_VERSION;
