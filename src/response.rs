//! Terminal replies produced by dispatch.
//!
//! The dispatcher never writes bytes; it hands one [`HandlerResponse`] to the
//! hosting layer, which owns the wire format.

use serde::Serialize;
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::route::HttpMethod;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Response header storage. Names are `Arc<str>` because they are almost
/// always static (`content-type`, `location`, `allow`).
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Status, headers and JSON body of one reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// The framework's JSON error shape: `{success: false, error: true, message}`.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(
            status,
            json!({
                "success": false,
                "error": true,
                "message": message,
            }),
        )
    }

    /// 405 with an `Allow` header and the `allowed_methods` list in the body.
    #[must_use]
    pub fn method_not_allowed(allowed: &[HttpMethod]) -> Self {
        let names: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
        let mut resp = Self::json(
            405,
            json!({
                "success": false,
                "error": true,
                "message": "Method not allowed",
                "allowed_methods": names,
            }),
        );
        resp.set_header("allow", names.join(", "));
        resp
    }

    /// Redirect with a `location` header and an empty body.
    #[must_use]
    pub fn redirect(location: &str, status: u16) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("location"), location.to_string()));
        Self {
            status,
            headers,
            body: Value::Null,
        }
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Reason phrase for the status line.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }
}

pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(599), "Unknown");
    }

    #[test]
    fn test_method_not_allowed_shape() {
        let resp = HandlerResponse::method_not_allowed(&[HttpMethod::Post, HttpMethod::Put]);
        assert_eq!(resp.status, 405);
        assert_eq!(resp.get_header("Allow"), Some("POST, PUT"));
        assert_eq!(resp.body["allowed_methods"], json!(["POST", "PUT"]));
        assert_eq!(resp.body["success"], false);
        assert_eq!(resp.body["error"], true);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = HandlerResponse::json(200, json!({}));
        resp.set_header("Content-Type", "text/plain".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_redirect() {
        let resp = HandlerResponse::redirect("/login", 302);
        assert_eq!(resp.status, 302);
        assert_eq!(resp.get_header("location"), Some("/login"));
        assert_eq!(resp.body, Value::Null);
    }
}
