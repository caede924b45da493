//! Route data model shared by the registry, the dispatcher and the cache snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of HTTP verbs a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl HttpMethod {
    /// All verbs in registry order. The cross-method probe and the `Allow`
    /// header follow this order.
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name one of the six supported verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMethod(pub String);

impl fmt::Display for UnsupportedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported HTTP method '{}' (expected one of GET, POST, PUT, DELETE, PATCH, HEAD)",
            self.0
        )
    }
}

impl std::error::Error for UnsupportedMethod {}

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    /// Parses a verb case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Head => http::Method::HEAD,
        }
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Per-route options.
///
/// Serialized field names follow the route declaration vocabulary
/// (`as`, `queryParams`), so cache snapshots and manifests read the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteOptions {
    /// Gate the route behind authentication. Unauthenticated callers skip it.
    pub auth: bool,
    /// Merge the query string into the extracted params.
    pub query_params: bool,
    /// Middleware aliases to run, in order, once the route is selected.
    pub middleware: Vec<String>,
    /// Redirect target; when set the route never reaches a controller.
    pub redirect: Option<String>,
    /// Redirect status, 301 when absent.
    pub status: Option<u16>,
    /// Route name for reverse lookup.
    #[serde(rename = "as")]
    pub name: Option<String>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            auth: false,
            query_params: true,
            middleware: Vec::new(),
            redirect: None,
            status: None,
            name: None,
        }
    }
}

impl RouteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn query_params(mut self, include: bool) -> Self {
        self.query_params = include;
        self
    }

    #[must_use]
    pub fn middleware<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn redirect(mut self, to: impl Into<String>, status: u16) -> Self {
        self.redirect = Some(to.into());
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One registered endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: HttpMethod,
    /// Normalized pattern: leading `/`, no trailing `/` except for the root.
    pub path: String,
    /// `Controller@action`, or `None` for redirect-only routes.
    pub action: Option<String>,
    pub options: RouteOptions,
    /// Copy of `options.name`, kept at the top level for lookups.
    pub name: Option<String>,
}

impl Route {
    /// Builds a route, normalizing `path` and lifting the route name out of the options.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        path: &str,
        action: Option<String>,
        options: RouteOptions,
    ) -> Self {
        let name = options.name.clone();
        Self {
            method,
            path: normalize_path(path),
            action,
            options,
            name,
        }
    }

    /// Splits the action at its `@` separator.
    ///
    /// Returns `None` when there is no action or no separator; the dispatcher
    /// treats such routes as not invocable.
    #[must_use]
    pub fn handler(&self) -> Option<(&str, &str)> {
        let action = self.action.as_deref()?;
        let (controller, method) = action.split_once('@')?;
        if controller.is_empty() || method.is_empty() || method.contains('@') {
            return None;
        }
        Some((controller, method))
    }

    #[must_use]
    pub fn redirect_status(&self) -> u16 {
        self.options.status.unwrap_or(301)
    }
}

/// Normalizes a route or request path: single leading `/`, trailing `/` stripped
/// unless the path is the root.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push('/');
    out.push_str(trimmed);
    out
}

/// Joins a group prefix onto a route path and normalizes the result.
#[must_use]
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => normalize_path(path),
        (false, true) => normalize_path(prefix),
        (false, false) => normalize_path(&format!("{prefix}/{path}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("users/"), "/users");
        assert_eq!(normalize_path("//users/{id}//"), "/users/{id}");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/dashboard", "/"), "/dashboard");
        assert_eq!(join_paths("/", "/"), "/");
        assert_eq!(join_paths("admin/", "/x"), "/admin/x");
        assert_eq!(join_paths("", "x"), "/x");
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("PATCH".parse::<HttpMethod>(), Ok(HttpMethod::Patch));
        assert!("OPTIONS".parse::<HttpMethod>().is_err());
        assert_eq!(
            HttpMethod::try_from(&http::Method::DELETE),
            Ok(HttpMethod::Delete)
        );
    }

    #[test]
    fn test_handler_split() {
        let route = Route::new(
            HttpMethod::Get,
            "/",
            Some("App/Website/HomeController@index".to_string()),
            RouteOptions::default(),
        );
        assert_eq!(
            route.handler(),
            Some(("App/Website/HomeController", "index"))
        );

        let no_at = Route::new(HttpMethod::Get, "/", Some("Home".into()), RouteOptions::default());
        assert_eq!(no_at.handler(), None);

        let redirect = Route::new(HttpMethod::Get, "/", None, RouteOptions::default());
        assert_eq!(redirect.handler(), None);
    }

    #[test]
    fn test_options_serde_names() {
        let opts = RouteOptions::new().name("home").query_params(false);
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["as"], "home");
        assert_eq!(json["queryParams"], false);

        let parsed: RouteOptions = serde_json::from_str(r#"{"auth": true}"#).unwrap();
        assert!(parsed.auth);
        assert!(parsed.query_params);
    }
}
