use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::AuthMiddleware;
use crate::dispatcher::DispatchRequest;
use crate::error::DispatchError;
use crate::response::HandlerResponse;

/// A step run around the handler of a matched route.
///
/// `before` may answer the request itself, in which case neither later
/// middleware nor the handler run. `after` sees the handler's response.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &DispatchRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &DispatchRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}

/// Resolved middleware list for one route, in declaration order.
pub type MiddlewareChain = Vec<(String, Arc<dyn Middleware>)>;

/// Alias -> middleware map.
///
/// `auth` is registered by [`MiddlewareRegistry::new`]; use
/// [`MiddlewareRegistry::empty`] to start from nothing.
#[derive(Clone)]
pub struct MiddlewareRegistry {
    by_alias: HashMap<String, Arc<dyn Middleware>>,
}

impl MiddlewareRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("auth", AuthMiddleware);
        registry
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_alias: HashMap::new(),
        }
    }

    /// Registers (or replaces) the middleware behind `alias`.
    pub fn register<M>(&mut self, alias: &str, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.by_alias.insert(alias.to_string(), Arc::new(middleware));
    }

    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// Resolves every alias up front. Fails on the first unknown one, before
    /// anything has run.
    pub fn resolve(&self, names: &[String]) -> Result<MiddlewareChain, DispatchError> {
        names
            .iter()
            .map(|name| match self.by_alias.get(name) {
                Some(m) => Ok((name.clone(), Arc::clone(m))),
                None => Err(DispatchError::MiddlewareNotFound { name: name.clone() }),
            })
            .collect()
    }

    /// Runs `before` for each middleware in order and returns the first
    /// short-circuit response together with the alias that produced it.
    #[must_use]
    pub fn run_before(
        chain: &MiddlewareChain,
        req: &DispatchRequest,
    ) -> Option<(String, HandlerResponse)> {
        chain
            .iter()
            .find_map(|(name, m)| m.before(req).map(|resp| (name.clone(), resp)))
    }

    /// Runs `after` in reverse order.
    pub fn run_after(
        chain: &MiddlewareChain,
        req: &DispatchRequest,
        res: &mut HandlerResponse,
        latency: Duration,
    ) {
        for (_, m) in chain.iter().rev() {
            m.after(req, res, latency);
        }
    }
}

impl Default for MiddlewareRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<&str> = self.by_alias.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        f.debug_struct("MiddlewareRegistry")
            .field("aliases", &aliases)
            .finish()
    }
}
