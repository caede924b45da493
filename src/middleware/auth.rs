use serde_json::json;

use super::Middleware;
use crate::dispatcher::DispatchRequest;
use crate::response::HandlerResponse;

/// Rejects unauthenticated callers with 401.
///
/// The dispatcher does not decide who is authenticated; it only forwards the
/// flag the hosting layer put on the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMiddleware;

impl Middleware for AuthMiddleware {
    fn before(&self, req: &DispatchRequest) -> Option<HandlerResponse> {
        if req.authenticated {
            None
        } else {
            Some(HandlerResponse::json(
                401,
                json!({
                    "success": false,
                    "message": "Restricted access. Please log in.",
                }),
            ))
        }
    }
}
