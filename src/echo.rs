use serde_json::json;

use crate::controller::{ActionRequest, Controller};
use crate::response::HandlerResponse;

/// Controller that answers every action by echoing the request back.
///
/// The CLI registers one per controller id found in a manifest so that any
/// route can be exercised without real handlers.
#[derive(Debug, Clone)]
pub struct EchoController {
    id: String,
}

impl EchoController {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Controller for EchoController {
    fn has_action(&self, _action: &str) -> bool {
        true
    }

    fn invoke(&self, action: &str, req: ActionRequest) -> HandlerResponse {
        HandlerResponse::json(
            200,
            json!({
                "controller": self.id,
                "action": action,
                "method": req.method,
                "path": req.path,
                "params": req.params,
                "query": req.query,
                "request_id": req.request_id,
            }),
        )
    }
}
