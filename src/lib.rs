//! # switchyard
//!
//! **switchyard** is a request routing and dispatch engine: it compiles route
//! patterns with typed placeholders, validates and casts extracted
//! parameters, keeps a per-method route table with groups and a cache
//! snapshot, and dispatches each request to exactly one terminal action.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Compiles `/users/{id:int:5}` style patterns into anchored regexes
//! - **[`validator`]** - Per-type acceptance rules for placeholder values
//! - **[`router`]** - Parameter extraction: match, merge the query, validate, cast
//! - **[`registry`]** - The route table, groups, resources and the cache snapshot
//! - **[`dispatcher`]** - First-match scan, 405 probing and not-found handling
//! - **[`controller`]** - Controller ids, actions and the controller table
//! - **[`middleware`]** - Named middleware run once a route is selected
//! - **[`manifest`]** - YAML route declarations
//! - **[`config`]** - `config/*.yaml` settings and the routing settings
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Hosting layer
//!     participant Dispatcher
//!     participant Registry as RouteRegistry
//!     participant Extractor as ParamExtractor
//!     participant Middleware
//!     participant Controller
//!
//!     Host->>Dispatcher: dispatch(DispatchRequest)
//!     Dispatcher->>Registry: routes_for(method)
//!     loop each route, in registration order
//!         Dispatcher->>Extractor: extract(pattern, path, query)
//!         alt matched and valid
//!             Dispatcher->>Middleware: resolve + run before
//!             Dispatcher->>Controller: invoke(action, params)
//!             Controller-->>Host: HandlerResponse
//!         end
//!     end
//!     alt path matches under other methods
//!         Dispatcher-->>Host: 405 + Allow
//!     else
//!         Dispatcher->>Controller: not-found controller index
//!         Controller-->>Host: HandlerResponse
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use switchyard::config::RoutingConfig;
//! use switchyard::controller::{ActionController, ControllerTable};
//! use switchyard::dispatcher::{DispatchRequest, Dispatcher};
//! use switchyard::middleware::MiddlewareRegistry;
//! use switchyard::registry::{Registrar, RouteRegistry};
//! use switchyard::response::HandlerResponse;
//! use switchyard::route::{HttpMethod, RouteOptions};
//!
//! let mut routes = RouteRegistry::new();
//! routes.get("/users/{id:int}", "UserController@show", RouteOptions::new());
//!
//! let mut controllers = ControllerTable::new();
//! controllers.register(
//!     "UserController",
//!     ActionController::new()
//!         .action("show", |req| HandlerResponse::json(200, json!({ "id": req.params["id"] }))),
//! );
//!
//! let dispatcher = Dispatcher::new(
//!     routes,
//!     controllers,
//!     MiddlewareRegistry::new(),
//!     RoutingConfig::default(),
//! );
//! let response = dispatcher.handle(&DispatchRequest::new(HttpMethod::Get, "/users/42"));
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["id"], 42);
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod middleware;
pub mod pattern;
pub mod registry;
pub mod response;
pub mod route;
pub mod router;
pub mod validator;

pub use dispatcher::{DispatchOutcome, DispatchRequest, Dispatcher, OutcomeKind};
pub use error::{ConfigError, DispatchError, ManifestError, PatternError, RouteCacheError};
pub use registry::{GroupAttributes, Registrar, RouteRegistry};
pub use response::HandlerResponse;
pub use route::{HttpMethod, Route, RouteOptions};
pub use router::{ParamExtractor, ParamValue, Params};
