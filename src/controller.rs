//! Controller resolution.
//!
//! Route actions name a controller id and an action (`Controller@action`).
//! Controllers are registered up front in a [`ControllerTable`]; the
//! dispatcher only asks whether an id exists, whether it has an action, and
//! invokes it.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ids::RequestId;
use crate::response::HandlerResponse;
use crate::route::HttpMethod;
use crate::router::{Params, QueryParams};

/// What an action receives.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest {
    pub request_id: RequestId,
    pub method: HttpMethod,
    pub path: String,
    /// Validated and cast route parameters
    pub params: Params,
    pub query: QueryParams,
}

pub trait Controller: Send + Sync {
    fn has_action(&self, action: &str) -> bool;

    /// Runs `action`. Only called after [`Controller::has_action`] returned true.
    fn invoke(&self, action: &str, req: ActionRequest) -> HandlerResponse;
}

/// Boxed action callback.
pub type ActionFn = Arc<dyn Fn(ActionRequest) -> HandlerResponse + Send + Sync>;

/// Controller assembled from closures, one per action.
///
/// ```rust
/// use serde_json::json;
/// use switchyard::controller::{ActionController, Controller};
/// use switchyard::response::HandlerResponse;
///
/// let home = ActionController::new()
///     .action("index", |_req| HandlerResponse::json(200, json!({"page": "home"})));
/// assert!(home.has_action("index"));
/// assert!(!home.has_action("show"));
/// ```
#[derive(Clone, Default)]
pub struct ActionController {
    actions: HashMap<String, ActionFn>,
}

impl ActionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ActionRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(f));
        self
    }
}

impl fmt::Debug for ActionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ActionController")
            .field("actions", &names)
            .finish()
    }
}

impl Controller for ActionController {
    fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    fn invoke(&self, action: &str, req: ActionRequest) -> HandlerResponse {
        match self.actions.get(action) {
            Some(f) => f(req),
            None => HandlerResponse::error(404, "Action not found"),
        }
    }
}

/// Normalizes a controller id: `\` becomes `/`, surrounding slashes are dropped.
///
/// `App\Website\HomeController` and `/App/Website/HomeController` both map to
/// `App/Website/HomeController`.
#[must_use]
pub fn normalize_controller_id(id: &str) -> String {
    id.replace('\\', "/").trim_matches('/').to_string()
}

/// Controller id -> controller.
#[derive(Clone, Default)]
pub struct ControllerTable {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the controller under `id`.
    pub fn register<C>(&mut self, id: &str, controller: C)
    where
        C: Controller + 'static,
    {
        self.register_arc(id, Arc::new(controller));
    }

    pub fn register_arc(&mut self, id: &str, controller: Arc<dyn Controller>) {
        self.controllers.insert(normalize_controller_id(id), controller);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Controller>> {
        self.controllers.get(&normalize_controller_id(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl fmt::Debug for ControllerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ControllerTable").field("ids", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_controller_id() {
        assert_eq!(
            normalize_controller_id("App\\Website\\HomeController"),
            "App/Website/HomeController"
        );
        assert_eq!(normalize_controller_id("/Home/"), "Home");
    }

    #[test]
    fn test_lookup_ignores_separator_style() {
        let mut table = ControllerTable::new();
        table.register(
            "App/Website/HomeController",
            ActionController::new().action("index", |_| HandlerResponse::json(200, json!({}))),
        );
        assert!(table.contains("App\\Website\\HomeController"));
        assert!(!table.contains("App/Website"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_action_controller_invokes_by_name() {
        let c = ActionController::new()
            .action("show", |req| HandlerResponse::json(200, json!({ "path": req.path })));
        let req = ActionRequest {
            request_id: RequestId::new(),
            method: HttpMethod::Get,
            path: "/x".to_string(),
            params: Params::new(),
            query: QueryParams::new(),
        };
        let resp = c.invoke("show", req.clone());
        assert_eq!(resp.body["path"], "/x");
        assert_eq!(c.invoke("missing", req).status, 404);
    }
}
