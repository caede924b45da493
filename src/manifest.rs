//! YAML route manifests.
//!
//! A manifest declares the same things the [`Registrar`] API does, as data:
//!
//! ```yaml
//! routes:
//!   - method: GET
//!     path: /users/{id:int}
//!     action: UserController@show
//!     as: users.show
//!   - method: [GET, POST]
//!     path: /contact
//!     action: ContactController@handle
//!     queryParams: false
//! redirects:
//!   - from: /old
//!     to: /new
//!     status: 308
//! resources:
//!   - path: /photos
//!     controller: PhotoController
//! groups:
//!   - prefix: /dashboard
//!     middleware: [auth]
//!     routes:
//!       - method: GET
//!         path: /
//!         action: Dashboard/HomeController@index
//!         auth: true
//! ```
//!
//! `method` is a verb, a list of verbs, or `ANY`. Route options (`auth`,
//! `queryParams`, `middleware`, `as`) sit next to the route fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ManifestError;
use crate::registry::{GroupAttributes, Registrar};
use crate::route::{HttpMethod, Route, RouteOptions};

/// One verb or a list of verbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodDecl {
    One(String),
    Many(Vec<String>),
}

impl MethodDecl {
    fn resolve(&self, path: &str) -> Result<Vec<HttpMethod>, ManifestError> {
        let names: Vec<&str> = match self {
            MethodDecl::One(name) => vec![name.as_str()],
            MethodDecl::Many(names) => names.iter().map(String::as_str).collect(),
        };
        let mut methods = Vec::with_capacity(names.len());
        for name in names {
            if name.trim().eq_ignore_ascii_case("any") {
                return Ok(HttpMethod::ALL.to_vec());
            }
            let method = name.parse().map_err(|_| ManifestError::InvalidMethod {
                method: name.to_string(),
                path: path.to_string(),
            })?;
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        Ok(methods)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecl {
    pub method: MethodDecl,
    pub path: String,
    pub action: String,
    #[serde(flatten)]
    pub options: RouteOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDecl {
    pub from: String,
    pub to: String,
    #[serde(default = "default_redirect_status")]
    pub status: u16,
}

fn default_redirect_status() -> u16 {
    301
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDecl {
    pub path: String,
    pub controller: String,
    #[serde(flatten)]
    pub options: RouteOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDecl {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub middleware: Vec<String>,
    #[serde(flatten)]
    pub body: RouteManifest,
}

/// A parsed manifest. Groups nest arbitrarily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    pub routes: Vec<RouteDecl>,
    pub redirects: Vec<RedirectDecl>,
    pub resources: Vec<ResourceDecl>,
    pub groups: Vec<GroupDecl>,
}

impl RouteManifest {
    pub fn from_yaml_str(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Registers every declaration on `registrar`, in document order:
    /// routes, redirects, resources, then groups.
    ///
    /// Methods are checked up front, so a manifest with a bad verb registers
    /// nothing.
    pub fn apply<R: Registrar>(&self, registrar: &mut R) -> Result<(), ManifestError> {
        self.check()?;
        self.register(registrar)
    }

    fn check(&self) -> Result<(), ManifestError> {
        for route in &self.routes {
            route.method.resolve(&route.path)?;
        }
        for group in &self.groups {
            group.body.check()?;
        }
        Ok(())
    }

    fn register<R: Registrar>(&self, registrar: &mut R) -> Result<(), ManifestError> {
        for route in &self.routes {
            let methods = route.method.resolve(&route.path)?;
            registrar.match_methods(&methods, &route.path, &route.action, route.options.clone());
        }
        for redirect in &self.redirects {
            registrar.redirect(&redirect.from, &redirect.to, redirect.status);
        }
        for resource in &self.resources {
            registrar.resource(&resource.path, &resource.controller, resource.options.clone());
        }
        for group in &self.groups {
            let attributes = GroupAttributes::new()
                .prefix(group.prefix.as_str())
                .middleware(group.middleware.iter().cloned());
            let mut result = Ok(());
            registrar.group(attributes, |scope| result = group.body.register(scope));
            result?;
        }
        Ok(())
    }

    /// Number of route declarations, counting nested groups. Resources count
    /// once and multi-method routes count once.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.routes.len()
            + self.redirects.len()
            + self.resources.len()
            + self.groups.iter().map(|g| g.body.declaration_count()).sum::<usize>()
    }
}

/// Reads and parses a manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<RouteManifest, ManifestError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let manifest = RouteManifest::from_yaml_str(&source)?;
    info!(
        manifest = %path.display(),
        declarations = manifest.declaration_count(),
        "Route manifest loaded"
    );
    Ok(manifest)
}

/// Distinct controller ids named by route actions, sorted.
pub fn controller_ids<'a, I>(routes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Route>,
{
    let ids: BTreeSet<String> = routes
        .into_iter()
        .filter_map(|route| route.handler().map(|(controller, _)| controller.to_string()))
        .collect();
    debug!(count = ids.len(), "Collected controller ids");
    ids
}
