//! Whole-table snapshots of the route registry.
//!
//! A snapshot is a JSON envelope `{version, checksum, routes}` where `routes`
//! maps each method to its routes in scan order and `checksum` is the SHA-256
//! of the serialized `routes` value. Restoring is all-or-nothing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::core::{MethodBucket, RouteRegistry};
use crate::error::RouteCacheError;
use crate::route::{normalize_path, HttpMethod, Route};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

type RouteTable = BTreeMap<HttpMethod, Vec<Route>>;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    checksum: String,
    routes: RouteTable,
}

fn checksum(routes: &RouteTable) -> Result<String, RouteCacheError> {
    let bytes = serde_json::to_vec(routes)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

impl RouteRegistry {
    fn table(&self) -> RouteTable {
        HttpMethod::ALL
            .into_iter()
            .map(|m| (m, self.routes_for(m).to_vec()))
            .collect()
    }

    /// Serializes the whole table into a snapshot document.
    pub fn serialize(&self) -> Result<Vec<u8>, RouteCacheError> {
        let routes = self.table();
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            checksum: checksum(&routes)?,
            routes,
        };
        Ok(serde_json::to_vec_pretty(&snapshot)?)
    }

    /// Replaces the table with the one stored in `bytes`.
    ///
    /// The document is fully validated first. On any error the current table
    /// is left untouched.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), RouteCacheError> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RouteCacheError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        if checksum(&snapshot.routes)? != snapshot.checksum {
            return Err(RouteCacheError::ChecksumMismatch);
        }

        let mut buckets: [MethodBucket; 6] = Default::default();
        for (method, routes) in snapshot.routes {
            let mut seen = HashSet::new();
            for route in routes {
                if route.method != method {
                    return Err(RouteCacheError::InvalidShape(format!(
                        "route '{}' is stored under {} but declares {}",
                        route.path, method, route.method
                    )));
                }
                if normalize_path(&route.path) != route.path {
                    return Err(RouteCacheError::InvalidShape(format!(
                        "route path '{}' is not normalized",
                        route.path
                    )));
                }
                if !seen.insert(route.path.clone()) {
                    return Err(RouteCacheError::InvalidShape(format!(
                        "duplicate {} route '{}'",
                        method, route.path
                    )));
                }
                buckets[method as usize].insert(route);
            }
        }

        self.buckets = buckets;
        Ok(())
    }

    /// Writes a snapshot to `path`, creating parent directories.
    ///
    /// The file is written next to its destination and then renamed over it,
    /// so readers never see a partial snapshot.
    pub fn cache_to_file(&self, path: impl AsRef<Path>) -> Result<(), RouteCacheError> {
        let path = path.as_ref();
        let bytes = self.serialize()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(format!(".{}.tmp", std::process::id()));
        let tmp = Path::new(&tmp_name);
        fs::write(tmp, &bytes)?;
        if let Err(e) = fs::rename(tmp, path) {
            if let Err(cleanup) = fs::remove_file(tmp) {
                debug!(path = %tmp.display(), error = %cleanup, "Stale route cache temp file");
            }
            return Err(e.into());
        }
        info!(
            path = %path.display(),
            routes_count = self.len(),
            bytes = bytes.len(),
            "Route cache written"
        );
        Ok(())
    }

    /// Restores the table from a cache file.
    ///
    /// Returns `Ok(false)` when the file does not exist.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<bool, RouteCacheError> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Route cache miss");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        self.restore(&bytes)?;
        debug!(path = %path.display(), routes_count = self.len(), "Route cache hit");
        Ok(true)
    }

    /// Restores from `path` when it holds a valid snapshot, otherwise builds
    /// the table with `builder` and rewrites the cache.
    ///
    /// The returned registry is always either the whole cached table or the
    /// whole declared one. A failed cache rewrite is logged and ignored.
    pub fn load_or_build<F>(path: impl AsRef<Path>, builder: F) -> Self
    where
        F: FnOnce(&mut RouteRegistry),
    {
        let path = path.as_ref();
        let mut registry = RouteRegistry::new();
        match registry.load_from_file(path) {
            Ok(true) => {
                registry.log_summary();
                return registry;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unusable route cache");
            }
        }

        builder(&mut registry);
        if let Err(e) = registry.cache_to_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to write route cache");
        }
        registry.log_summary();
        registry
    }
}
