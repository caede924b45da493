use crate::route::{join_paths, HttpMethod, Route, RouteOptions};

/// Anything routes can be declared on: the registry itself or a group scope.
///
/// Only [`Registrar::add_route`] is required; every declaration helper is
/// built on it.
pub trait Registrar {
    fn add_route(&mut self, route: Route);

    fn add(&mut self, method: HttpMethod, path: &str, action: &str, options: RouteOptions) {
        self.add_route(Route::new(method, path, Some(action.to_string()), options));
    }

    fn get(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Get, path, action, options);
    }

    fn post(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Post, path, action, options);
    }

    fn put(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Put, path, action, options);
    }

    fn delete(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Delete, path, action, options);
    }

    fn patch(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Patch, path, action, options);
    }

    fn head(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.add(HttpMethod::Head, path, action, options);
    }

    /// Registers the same route under all six methods.
    fn any(&mut self, path: &str, action: &str, options: RouteOptions) {
        self.match_methods(&HttpMethod::ALL, path, action, options);
    }

    fn match_methods(
        &mut self,
        methods: &[HttpMethod],
        path: &str,
        action: &str,
        options: RouteOptions,
    ) {
        for method in methods {
            self.add(*method, path, action, options.clone());
        }
    }

    /// GET route that answers with a redirect and never reaches a controller.
    fn redirect(&mut self, from: &str, to: &str, status: u16) {
        self.add_route(Route::new(
            HttpMethod::Get,
            from,
            None,
            RouteOptions::new().redirect(to, status),
        ));
    }

    /// Registers the seven CRUD routes for `controller`.
    ///
    /// Route names are `<base>.<action>`, where `<base>` is `options.name` or
    /// the trimmed path.
    fn resource(&mut self, path: &str, controller: &str, options: RouteOptions) {
        let path = path.trim_matches('/');
        let base = options.name.clone().unwrap_or_else(|| path.to_string());
        let item = format!("/{path}/{{id:int}}");
        let plan = [
            (HttpMethod::Get, format!("/{path}"), "index"),
            (HttpMethod::Get, format!("/{path}/create"), "create"),
            (HttpMethod::Post, format!("/{path}"), "store"),
            (HttpMethod::Get, item.clone(), "show"),
            (HttpMethod::Get, format!("{item}/edit"), "edit"),
            (HttpMethod::Put, item.clone(), "update"),
            (HttpMethod::Delete, item, "destroy"),
        ];
        for (method, route_path, action) in plan {
            let opts = options.clone().name(format!("{base}.{action}"));
            self.add(method, &route_path, &format!("{controller}@{action}"), opts);
        }
    }

    /// Declares routes inside a scope sharing a path prefix and middleware.
    ///
    /// Routes declared by `builder` get the prefix joined in front of their
    /// path and the group middleware placed before their own. Nested groups
    /// compose outer-first.
    fn group<F>(&mut self, attributes: GroupAttributes, builder: F)
    where
        F: FnOnce(&mut RouteGroup),
        Self: Sized,
    {
        let mut scope = RouteGroup::default();
        builder(&mut scope);
        for route in scope.routes {
            self.add_route(attributes.apply(route));
        }
    }
}

/// Shared attributes of a route group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAttributes {
    pub prefix: String,
    pub middleware: Vec<String>,
}

impl GroupAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
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

    fn apply(&self, mut route: Route) -> Route {
        route.path = join_paths(&self.prefix, &route.path);
        if !self.middleware.is_empty() {
            let mut middleware = self.middleware.clone();
            middleware.append(&mut route.options.middleware);
            route.options.middleware = middleware;
        }
        route
    }
}

/// Collects the routes declared inside one group.
///
/// Collected routes reach the outer registrar only after the builder returns,
/// so nothing registered before the group is ever rewritten.
#[derive(Debug, Default)]
pub struct RouteGroup {
    routes: Vec<Route>,
}

impl RouteGroup {
    /// Routes declared so far, before the group attributes are applied.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Registrar for RouteGroup {
    fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }
}
