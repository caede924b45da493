use std::collections::HashMap;
use tracing::info;

use super::group::Registrar;
use crate::pattern::substitute;
use crate::route::{normalize_path, HttpMethod, Route};

/// Routes of one HTTP method in insertion order, indexed by path.
///
/// Registering a path that is already present replaces the route in place,
/// so the original position in the scan order is kept.
#[derive(Debug, Clone, Default)]
pub(crate) struct MethodBucket {
    routes: Vec<Route>,
    by_path: HashMap<String, usize>,
}

impl MethodBucket {
    pub(crate) fn insert(&mut self, route: Route) {
        match self.by_path.get(&route.path) {
            Some(&i) => self.routes[i] = route,
            None => {
                self.by_path.insert(route.path.clone(), self.routes.len());
                self.routes.push(route);
            }
        }
    }

    pub(crate) fn get(&self, path: &str) -> Option<&Route> {
        self.by_path.get(path).map(|&i| &self.routes[i])
    }

    pub(crate) fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn clear(&mut self) {
        self.routes.clear();
        self.by_path.clear();
    }
}

/// The route table: one ordered bucket per HTTP method.
///
/// Populated at startup (from declarations or a cache snapshot) and read-only
/// while requests are dispatched.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    pub(crate) buckets: [MethodBucket; 6],
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bucket(&self, method: HttpMethod) -> &MethodBucket {
        &self.buckets[method as usize]
    }

    /// Routes registered for `method`, in scan order.
    #[must_use]
    pub fn routes_for(&self, method: HttpMethod) -> &[Route] {
        self.bucket(method).routes()
    }

    /// Every route, grouped by method in `GET, POST, PUT, DELETE, PATCH, HEAD` order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        HttpMethod::ALL
            .into_iter()
            .flat_map(move |m| self.routes_for(m).iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.routes().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact lookup by method and path; `path` is normalized first.
    #[must_use]
    pub fn find_route(&self, method: HttpMethod, path: &str) -> Option<&Route> {
        self.bucket(method).get(&normalize_path(path))
    }

    /// Path of the first route carrying `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        self.routes()
            .find(|r| r.name.as_deref() == Some(name))
            .map(|r| r.path.as_str())
    }

    /// Builds a URL for a named route, substituting placeholder values.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use switchyard::registry::{Registrar, RouteRegistry};
    /// use switchyard::route::RouteOptions;
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry.get("/users/{id:int}", "UserController@show", RouteOptions::new().name("user.show"));
    /// let params = HashMap::from([("id".to_string(), "7".to_string())]);
    /// assert_eq!(registry.url_for("user.show", &params).as_deref(), Some("/users/7"));
    /// ```
    #[must_use]
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        self.find_by_name(name).map(|path| substitute(path, params))
    }

    /// Empties every method bucket.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Logs the number of routes per method.
    pub fn log_summary(&self) {
        let per_method: Vec<(&'static str, usize)> = HttpMethod::ALL
            .iter()
            .map(|m| (m.as_str(), self.routes_for(*m).len()))
            .collect();
        info!(
            routes_count = self.len(),
            routes_summary = ?per_method,
            "Route table loaded"
        );
    }
}

impl Registrar for RouteRegistry {
    fn add_route(&mut self, route: Route) {
        let method = route.method;
        self.buckets[method as usize].insert(route);
    }
}
