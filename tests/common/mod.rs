#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use switchyard::config::RoutingConfig;
use switchyard::controller::{ActionRequest, Controller, ControllerTable};
use switchyard::echo::EchoController;
use switchyard::manifest::controller_ids;
use switchyard::middleware::MiddlewareRegistry;
use switchyard::{Dispatcher, HandlerResponse, RouteRegistry};
use tempfile::TempDir;

/// Dispatcher with an echo controller for every controller id in the table
/// and the default website/dashboard not-found controllers.
pub fn echo_dispatcher(registry: RouteRegistry) -> Dispatcher {
    let routing = RoutingConfig::default();
    let mut controllers = ControllerTable::new();
    for id in controller_ids(registry.routes()) {
        controllers.register(&id, EchoController::new(id.as_str()));
    }
    for context in ["Website", "Dashboard"] {
        let id = routing.not_found_controller(context);
        controllers.register(&id, NotFound);
    }
    Dispatcher::new(registry, controllers, MiddlewareRegistry::new(), routing)
}

/// 404 not-found controller.
pub struct NotFound;

impl Controller for NotFound {
    fn has_action(&self, action: &str) -> bool {
        action == "index"
    }

    fn invoke(&self, _action: &str, req: ActionRequest) -> HandlerResponse {
        HandlerResponse::json(404, json!({ "success": false, "error": true, "message": "Page not found", "path": req.path }))
    }
}

/// Controller that records the actions it was asked to run.
#[derive(Clone, Default)]
pub struct Recorder {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub count: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Controller for Recorder {
    fn has_action(&self, _action: &str) -> bool {
        true
    }

    fn invoke(&self, action: &str, req: ActionRequest) -> HandlerResponse {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(action.to_string());
        HandlerResponse::json(200, json!({ "action": action, "params": req.params }))
    }
}

/// Writes `content` to `name` inside a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
