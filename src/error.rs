//! Error types.
//!
//! Matching and validation failures never show up here: a candidate route that
//! does not match is simply skipped. These enums cover the faults that have to
//! reach a caller: patterns that cannot be compiled, configuration mistakes found
//! during dispatch, and route cache / manifest I/O.

use serde_json::json;
use std::fmt;

use crate::response::HandlerResponse;

/// A route pattern whose generated regex failed to compile.
///
/// Unknown placeholder types never produce this; they degrade to `any`.
/// It only happens for patterns the regex engine rejects outright, such as a
/// length bound above the engine's repetition limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// The route pattern as declared
    pub pattern: String,
    /// The regex engine's message
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "route pattern '{}' could not be compiled: {}",
            self.pattern, self.message
        )
    }
}

impl std::error::Error for PatternError {}

/// Configuration faults detected while dispatching a request.
///
/// These abort the request before any handler runs. Per-request errors such as
/// a missing controller or a 405 are outcomes, not `DispatchError`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A route names a middleware alias that was never registered.
    MiddlewareNotFound {
        /// The unresolved alias
        name: String,
    },
    /// Neither the context-specific nor the system "not found" controller
    /// exists (or lacks an `index` action).
    NotFoundControllerMissing {
        /// Controller ids that were looked up, in order
        tried: Vec<String>,
    },
}

impl DispatchError {
    /// Short machine-readable name of the fault.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::MiddlewareNotFound { .. } => "MiddlewareNotFound",
            DispatchError::NotFoundControllerMissing { .. } => "NotFoundControllerMissing",
        }
    }

    /// Renders the 500 reply the hosting layer sends for a configuration fault.
    ///
    /// With `debug` off the message is generic; with it on the real message and
    /// the fault kind are exposed.
    #[must_use]
    pub fn to_response(&self, debug: bool) -> HandlerResponse {
        if debug {
            HandlerResponse::json(
                500,
                json!({
                    "success": false,
                    "error": true,
                    "message": self.to_string(),
                    "exception": self.kind(),
                }),
            )
        } else {
            HandlerResponse::json(
                500,
                json!({
                    "success": false,
                    "error": true,
                    "message": "Internal Server Error",
                }),
            )
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MiddlewareNotFound { name } => {
                write!(f, "middleware '{}' not found", name)
            }
            DispatchError::NotFoundControllerMissing { tried } => {
                write!(
                    f,
                    "no not-found controller registered (tried: {})",
                    tried.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Failures while writing or restoring a route cache snapshot.
#[derive(Debug)]
pub enum RouteCacheError {
    /// Reading or writing the cache file failed
    Io(std::io::Error),
    /// The bytes are not a snapshot document
    Decode(serde_json::Error),
    /// The snapshot was written by an incompatible format version
    UnsupportedVersion {
        /// Version found in the snapshot
        found: u32,
    },
    /// The stored checksum does not match the route table
    ChecksumMismatch,
    /// The document decoded but is not a valid route table
    InvalidShape(String),
}

impl fmt::Display for RouteCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteCacheError::Io(e) => write!(f, "route cache I/O error: {}", e),
            RouteCacheError::Decode(e) => write!(f, "route cache is not valid JSON: {}", e),
            RouteCacheError::UnsupportedVersion { found } => {
                write!(f, "route cache format version {} is not supported", found)
            }
            RouteCacheError::ChecksumMismatch => {
                write!(f, "route cache checksum does not match its contents")
            }
            RouteCacheError::InvalidShape(reason) => {
                write!(f, "route cache has an invalid shape: {}", reason)
            }
        }
    }
}

impl std::error::Error for RouteCacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteCacheError::Io(e) => Some(e),
            RouteCacheError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RouteCacheError {
    fn from(e: std::io::Error) -> Self {
        RouteCacheError::Io(e)
    }
}

impl From<serde_json::Error> for RouteCacheError {
    fn from(e: serde_json::Error) -> Self {
        RouteCacheError::Decode(e)
    }
}

/// Failures while loading a YAML route manifest.
#[derive(Debug)]
pub enum ManifestError {
    /// Reading the manifest file failed
    Io(std::io::Error),
    /// The manifest is not valid YAML for the expected structure
    Parse(serde_yaml::Error),
    /// A route declares a verb outside the supported set
    InvalidMethod {
        /// The declared method
        method: String,
        /// The route path it was declared on
        path: String,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(e) => write!(f, "route manifest I/O error: {}", e),
            ManifestError::Parse(e) => write!(f, "route manifest parse error: {}", e),
            ManifestError::InvalidMethod { method, path } => {
                write!(f, "route '{}' declares unsupported method '{}'", path, method)
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io(e) => Some(e),
            ManifestError::Parse(e) => Some(e),
            ManifestError::InvalidMethod { .. } => None,
        }
    }
}

impl From<std::io::Error> for ManifestError {
    fn from(e: std::io::Error) -> Self {
        ManifestError::Io(e)
    }
}

impl From<serde_yaml::Error> for ManifestError {
    fn from(e: serde_yaml::Error) -> Self {
        ManifestError::Parse(e)
    }
}

/// Failures while loading `config/*.yaml` files.
#[derive(Debug)]
pub enum ConfigError {
    /// Listing or reading the config directory failed
    Io(std::io::Error),
    /// A config file is not valid YAML
    Parse {
        file: std::path::PathBuf,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {}", e),
            ConfigError::Parse { file, source } => {
                write!(f, "config file '{}' is invalid: {}", file.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_response_hides_details_without_debug() {
        let err = DispatchError::MiddlewareNotFound {
            name: "throttle".to_string(),
        };
        let resp = err.to_response(false);
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["message"], "Internal Server Error");
        assert!(resp.body.get("exception").is_none());

        let resp = err.to_response(true);
        assert_eq!(resp.body["message"], "middleware 'throttle' not found");
        assert_eq!(resp.body["exception"], "MiddlewareNotFound");
    }

    #[test]
    fn test_not_found_controller_missing_lists_ids() {
        let err = DispatchError::NotFoundControllerMissing {
            tried: vec!["a/B".into(), "c/D".into()],
        };
        assert_eq!(
            err.to_string(),
            "no not-found controller registered (tried: a/B, c/D)"
        );
    }
}
