use serde::Serialize;
use serde_json::json;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

use super::request::{resolve_subdomain, DispatchRequest};
use crate::config::RoutingConfig;
use crate::controller::{normalize_controller_id, ActionRequest, Controller, ControllerTable};
use crate::error::DispatchError;
use crate::middleware::{MiddlewareChain, MiddlewareRegistry};
use crate::registry::RouteRegistry;
use crate::response::HandlerResponse;
use crate::route::{HttpMethod, Route};
use crate::router::{ParamExtractor, Params};

/// Action every not-found controller must provide.
const NOT_FOUND_ACTION: &str = "index";

/// How a request was answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// A controller action ran
    Handled { controller: String, action: String },
    /// The controller action panicked; answered with 500
    HandlerFailed { controller: String, action: String },
    /// The matched route is a redirect
    Redirect { location: String, status: u16 },
    /// A middleware answered before the handler
    Halted { middleware: String },
    /// Neither the primary nor the fallback controller id is registered
    ControllerNotFound { controller: String },
    /// The controller exists but lacks the action
    ActionNotFound { controller: String, action: String },
    /// The path matches only under other methods
    MethodNotAllowed { allowed: Vec<HttpMethod> },
    /// Nothing matched; a not-found controller answered
    NotFound { controller: String },
}

/// Terminal result of one dispatch: what happened and the reply to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    #[serde(flatten)]
    pub kind: OutcomeKind,
    /// Pattern of the selected route, if one was selected
    pub route: Option<String>,
    pub response: HandlerResponse,
}

impl DispatchOutcome {
    fn new(kind: OutcomeKind, route: Option<&Route>, response: HandlerResponse) -> Self {
        Self {
            kind,
            route: route.map(|r| r.path.clone()),
            response,
        }
    }
}

/// Resolves requests against a route table and runs exactly one terminal action.
///
/// The registry is shared read-only; a dispatcher never mutates it.
pub struct Dispatcher {
    registry: Arc<RouteRegistry>,
    controllers: ControllerTable,
    middleware: MiddlewareRegistry,
    config: RoutingConfig,
    extractor: ParamExtractor,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        registry: impl Into<Arc<RouteRegistry>>,
        controllers: ControllerTable,
        middleware: MiddlewareRegistry,
        config: RoutingConfig,
    ) -> Self {
        let registry = registry.into();
        info!(
            routes_count = registry.len(),
            controllers_count = controllers.len(),
            "Dispatcher ready"
        );
        Self {
            registry,
            controllers,
            middleware,
            config,
            extractor: ParamExtractor::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    #[must_use]
    pub fn extractor(&self) -> &ParamExtractor {
        &self.extractor
    }

    /// Dispatches one request.
    ///
    /// Per-request failures (404, 405, missing controller or action) come back
    /// as `Ok` outcomes with a JSON reply. `Err` is reserved for configuration
    /// faults: an unknown middleware alias or a missing not-found controller.
    pub fn dispatch(&self, req: &DispatchRequest) -> Result<DispatchOutcome, DispatchError> {
        let span = info_span!(
            "dispatch",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path
        );
        let _entered = span.enter();

        let candidates = self.registry.routes_for(req.method);
        debug!(candidates = candidates.len(), "Dispatch attempt");

        for route in candidates {
            if route.options.auth && !req.authenticated {
                debug!(route = %route.path, "Skipping auth-gated route for anonymous caller");
                continue;
            }
            let Some(params) = self.try_match(route, req) else {
                continue;
            };

            let chain = self
                .middleware
                .resolve(&route.options.middleware)
                .inspect_err(|e| error!(route = %route.path, error = %e, "Middleware resolution failed"))?;
            if let Some((name, response)) = MiddlewareRegistry::run_before(&chain, req) {
                info!(
                    route = %route.path,
                    middleware = %name,
                    status = response.status,
                    "Middleware short-circuited request"
                );
                return Ok(DispatchOutcome::new(
                    OutcomeKind::Halted { middleware: name },
                    Some(route),
                    response,
                ));
            }

            if let Some(location) = &route.options.redirect {
                let status = route.redirect_status();
                info!(route = %route.path, location = %location, status, "Route redirect");
                return Ok(DispatchOutcome::new(
                    OutcomeKind::Redirect {
                        location: location.clone(),
                        status,
                    },
                    Some(route),
                    HandlerResponse::redirect(location, status),
                ));
            }

            let Some((controller, action)) = route.handler() else {
                debug!(route = %route.path, "Route has no invocable action, continuing scan");
                continue;
            };
            return Ok(self.invoke(route, controller, action, params, req, &chain));
        }

        let allowed = self.allowed_methods(req);
        if !allowed.is_empty() {
            let allowed_list: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
            warn!(allowed = ?allowed_list, "Method not allowed");
            let response = HandlerResponse::method_not_allowed(&allowed);
            return Ok(DispatchOutcome::new(
                OutcomeKind::MethodNotAllowed { allowed },
                None,
                response,
            ));
        }

        warn!("No route matched");
        self.not_found(req)
    }

    /// [`Dispatcher::dispatch`], with configuration faults rendered as a 500
    /// reply (details only when `debug` is on).
    #[must_use]
    pub fn handle(&self, req: &DispatchRequest) -> HandlerResponse {
        match self.dispatch(req) {
            Ok(outcome) => outcome.response,
            Err(e) => {
                error!(
                    request_id = %req.request_id,
                    error = %e,
                    kind = e.kind(),
                    "Dispatch configuration fault"
                );
                e.to_response(self.config.debug)
            }
        }
    }

    /// Methods other than the request's under which some route matches the
    /// path, in `GET, POST, PUT, DELETE, PATCH, HEAD` order.
    ///
    /// Auth gating is ignored: the question is whether the path exists.
    #[must_use]
    pub fn allowed_methods(&self, req: &DispatchRequest) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|m| *m != req.method)
            .filter(|m| {
                self.registry
                    .routes_for(*m)
                    .iter()
                    .any(|route| self.try_match(route, req).is_some())
            })
            .collect()
    }

    fn try_match(&self, route: &Route, req: &DispatchRequest) -> Option<Params> {
        self.extractor
            .extract(&route.path, &req.path, &req.query, route.options.query_params)
    }

    fn invoke(
        &self,
        route: &Route,
        controller: &str,
        action: &str,
        params: Params,
        req: &DispatchRequest,
        chain: &MiddlewareChain,
    ) -> DispatchOutcome {
        let primary = normalize_controller_id(controller);
        let fallback = format!("{}/{}", self.config.system_content, primary);

        let resolved = match self.controllers.get(&primary) {
            Some(c) => Some((primary.clone(), c)),
            None => self.controllers.get(&fallback).map(|c| (fallback.clone(), c)),
        };
        let Some((controller_id, handler)) = resolved else {
            error!(
                route = %route.path,
                controller = %primary,
                fallback = %fallback,
                "Controller not found"
            );
            return DispatchOutcome::new(
                OutcomeKind::ControllerNotFound { controller: primary },
                Some(route),
                HandlerResponse::error(404, "Controller not found"),
            );
        };

        if !handler.has_action(action) {
            error!(
                route = %route.path,
                controller = %controller_id,
                action = %action,
                "Action not found"
            );
            return DispatchOutcome::new(
                OutcomeKind::ActionNotFound {
                    controller: controller_id,
                    action: action.to_string(),
                },
                Some(route),
                HandlerResponse::error(404, "Action not found"),
            );
        }

        info!(
            route = %route.path,
            controller = %controller_id,
            action = %action,
            "Route matched"
        );
        let start = Instant::now();
        match self.call(handler.as_ref(), action, self.action_request(req, params)) {
            Some(mut response) => {
                MiddlewareRegistry::run_after(chain, req, &mut response, start.elapsed());
                debug!(
                    status = response.status,
                    latency_us = start.elapsed().as_micros() as u64,
                    "Handler response"
                );
                DispatchOutcome::new(
                    OutcomeKind::Handled {
                        controller: controller_id,
                        action: action.to_string(),
                    },
                    Some(route),
                    response,
                )
            }
            None => {
                let response = self.panic_response(&controller_id, action);
                DispatchOutcome::new(
                    OutcomeKind::HandlerFailed {
                        controller: controller_id,
                        action: action.to_string(),
                    },
                    Some(route),
                    response,
                )
            }
        }
    }

    fn not_found(&self, req: &DispatchRequest) -> Result<DispatchOutcome, DispatchError> {
        let context = req
            .context
            .clone()
            .unwrap_or_else(|| self.config.template_for(req.authenticated).to_string());
        let subdomain = resolve_subdomain(
            req.host.as_deref().unwrap_or(""),
            &self.config.domain,
            &self.config.system_content,
        );
        let tried = vec![
            format!("{subdomain}/{context}/{context}NotFoundController"),
            self.config.not_found_controller(&context),
        ];

        for id in &tried {
            let Some(handler) = self.controllers.get(id) else {
                continue;
            };
            if !handler.has_action(NOT_FOUND_ACTION) {
                continue;
            }
            debug!(controller = %id, "Not-found controller selected");
            let request = self.action_request(req, Params::new());
            let response = match self.call(handler.as_ref(), NOT_FOUND_ACTION, request) {
                Some(response) => response,
                None => self.panic_response(id, NOT_FOUND_ACTION),
            };
            return Ok(DispatchOutcome::new(
                OutcomeKind::NotFound {
                    controller: id.clone(),
                },
                None,
                response,
            ));
        }

        error!(tried = ?tried, "No not-found controller registered");
        Err(DispatchError::NotFoundControllerMissing { tried })
    }

    fn action_request(&self, req: &DispatchRequest, params: Params) -> ActionRequest {
        ActionRequest {
            request_id: req.request_id,
            method: req.method,
            path: req.path.clone(),
            params,
            query: req.query.clone(),
        }
    }

    /// Runs a controller action, turning a panic into `None`.
    fn call(&self, handler: &dyn Controller, action: &str, req: ActionRequest) -> Option<HandlerResponse> {
        match catch_unwind(AssertUnwindSafe(|| handler.invoke(action, req))) {
            Ok(response) => Some(response),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(action = %action, panic = %message, "Controller action panicked");
                None
            }
        }
    }

    fn panic_response(&self, controller: &str, action: &str) -> HandlerResponse {
        if self.config.debug {
            HandlerResponse::json(
                500,
                json!({
                    "success": false,
                    "error": true,
                    "message": format!("{controller}@{action} panicked"),
                    "exception": "HandlerPanicked",
                }),
            )
        } else {
            HandlerResponse::error(500, "Internal Server Error")
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.registry.len())
            .field("controllers", &self.controllers)
            .field("middleware", &self.middleware)
            .field("config", &self.config)
            .finish()
    }
}
