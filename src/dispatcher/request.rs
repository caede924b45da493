use crate::ids::RequestId;
use crate::route::{normalize_path, HttpMethod};
use crate::router::QueryParams;

/// Query key carrying the request path in front-controller deployments.
pub const URL_QUERY_KEY: &str = "url";

/// Everything the dispatcher needs to know about one incoming request.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub request_id: RequestId,
    pub method: HttpMethod,
    /// Normalized request path
    pub path: String,
    pub query: QueryParams,
    /// Set by the hosting layer; gates `auth` routes and the `auth` middleware
    pub authenticated: bool,
    /// Template context override. Defaults to the dashboard or website
    /// context depending on `authenticated`.
    pub context: Option<String>,
    /// `Host` header, used to pick the subdomain namespace for not-found handling
    pub host: Option<String>,
}

impl DispatchRequest {
    #[must_use]
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: normalize_path(path),
            query: QueryParams::new(),
            authenticated: false,
            context: None,
            host: None,
        }
    }

    /// Builds a request whose path comes from the `url` query entry, the way
    /// a rewrite rule hands it to a front controller.
    ///
    /// The value is reduced to URL-safe characters, stripped of trailing
    /// slashes, prefixed with `/` and percent-decoded. A missing entry means `/`.
    #[must_use]
    pub fn from_url_query(method: HttpMethod, query: QueryParams) -> Self {
        let path = query
            .get(URL_QUERY_KEY)
            .map_or_else(|| "/".to_string(), |raw| path_from_url_param(raw));
        let mut req = Self::new(method, &path);
        req.query = query;
        req
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Characters kept by the URL sanitizer: letters, digits and
/// `$-_.+!*'(),{}|\\^~[]`<>#%";/?:@&=`.
fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(c)
}

fn path_from_url_param(raw: &str) -> String {
    let sanitized: String = raw.chars().filter(|c| is_url_safe(*c)).collect();
    let trimmed = sanitized.trim_end_matches('/');
    let with_slash = format!("/{trimmed}");
    let decoded = urlencoding::decode(&with_slash)
        .map(|s| s.into_owned())
        .unwrap_or(with_slash);
    normalize_path(&decoded)
}

/// Derives the subdomain namespace from a `Host` header.
///
/// A leading `www.` is ignored on both sides and the `.domain` suffix is
/// removed. The bare domain, an empty host or an empty configured domain map
/// to `system`; a host outside the domain is returned unchanged.
///
/// ```rust
/// use switchyard::dispatcher::resolve_subdomain;
///
/// assert_eq!(resolve_subdomain("shop.example.com", "example.com", "App"), "shop");
/// assert_eq!(resolve_subdomain("www.example.com", "example.com", "App"), "App");
/// ```
#[must_use]
pub fn resolve_subdomain(host: &str, domain: &str, system: &str) -> String {
    let host = host.split(':').next().unwrap_or(host).trim();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let domain = domain.trim();
    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    if host.is_empty() || domain.is_empty() || host == domain {
        return system.to_string();
    }
    match host.strip_suffix(domain).and_then(|h| h.strip_suffix('.')) {
        Some(sub) if !sub.is_empty() => sub.to_string(),
        _ => host.to_string(),
    }
}
