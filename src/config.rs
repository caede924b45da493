//! # Config Module
//!
//! Dotted-key settings loaded from `config/*.yaml` files, plus the routing
//! settings the dispatcher reads.
//!
//! ## Files
//!
//! Every `config/<name>.yaml` (or `.yml`) under the base directory becomes the
//! top-level key `<name>`, so `config/routing.yaml` containing
//! `route_cache_file: var/routes.json` is read as `routing.route_cache_file`.
//!
//! ## Routing Settings
//!
//! [`RoutingConfig`] resolves each setting from the loaded files first, then
//! from the environment, then from a built-in default:
//!
//! | Key                                 | Env var                     | Default                       |
//! |-------------------------------------|-----------------------------|-------------------------------|
//! | `routing.default_system_content`    | `DEFAULT_SYSTEM_CONTENT`    | `App`                         |
//! | `routing.default_dashboard_content` | `DEFAULT_DASHBOARD_CONTENT` | `Dashboard`                   |
//! | `routing.default_website_content`   | `DEFAULT_WEBSITE_CONTENT`   | `Website`                     |
//! | `routing.route_cache_file`          | `ROUTE_CACHE_FILE`          | `bootstrap/cache/routes.json` |
//! | `app.domain`                        | `DEFAULT_DOMINIO`           | empty                         |
//! | `app.debug`                         | `APP_DEBUG`                 | `false`                       |
//!
//! ## Usage
//!
//! ```rust
//! use switchyard::config::{Config, RoutingConfig};
//!
//! let mut config = Config::default();
//! config.set("routing.default_system_content", "Core");
//! let routing = RoutingConfig::resolve_with(&config, |_| None);
//! assert_eq!(routing.system_content, "Core");
//! assert_eq!(routing.template_for(false), "Website");
//! ```

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;
use crate::router::parse_flag;

/// Settings tree keyed by config file stem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    items: BTreeMap<String, Value>,
}

impl Config {
    /// Loads every YAML file in `<base_dir>/config`.
    ///
    /// A missing `config` directory yields an empty config.
    pub fn load(base_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = base_dir.as_ref().join("config");
        let mut config = Config::default();
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "No config directory");
            return Ok(config);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && matches!(
                        p.extension().and_then(|e| e.to_str()),
                        Some("yaml") | Some("yml")
                    )
            })
            .collect();
        files.sort();

        for file in files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(&file)?;
            let value: Value =
                serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                    file: file.clone(),
                    source,
                })?;
            if value.is_mapping() {
                debug!(file = %file.display(), key = %stem, "Loaded config file");
                config.items.insert(stem.to_string(), value);
            }
        }
        Ok(config)
    }

    /// Raw value at a dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut value = self.items.get(segments.next()?)?;
        for segment in segments {
            value = value.as_mapping()?.get(segment)?;
        }
        Some(value)
    }

    /// String setting; numbers and booleans are rendered as text.
    #[must_use]
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.lookup_str(key).unwrap_or_else(|| default.to_string())
    }

    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_flag(s).unwrap_or(default),
            Some(Value::Number(n)) => n.as_i64().map_or(default, |n| n != 0),
            _ => default,
        }
    }

    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Sets a dotted key, creating intermediate maps and replacing any
    /// non-map value in the way.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        let root = self.items.entry((*first).to_string()).or_insert(Value::Null);
        insert_path(root, rest, value.into());
    }

    fn lookup_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn insert_path(node: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = node {
        let child = map.entry(Value::from(*head)).or_insert(Value::Null);
        insert_path(child, rest, value);
    }
}

/// Routing and namespace settings read by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Fallback namespace for controllers and the not-found handler
    pub system_content: String,
    /// Template context for authenticated callers
    pub dashboard_content: String,
    /// Template context for anonymous callers
    pub website_content: String,
    pub route_cache_file: PathBuf,
    /// Base domain used to derive the request subdomain
    pub domain: String,
    /// Expose fault details in 500 responses
    pub debug: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            system_content: "App".to_string(),
            dashboard_content: "Dashboard".to_string(),
            website_content: "Website".to_string(),
            route_cache_file: PathBuf::from("bootstrap/cache/routes.json"),
            domain: String::new(),
            debug: false,
        }
    }
}

impl RoutingConfig {
    /// Resolves from `config`, then the process environment, then defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::resolve_with(config, |name| env::var(name).ok())
    }

    /// Resolves from the process environment and defaults only.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_config(&Config::default())
    }

    /// Resolves with an explicit environment lookup.
    #[must_use]
    pub fn resolve_with<F>(config: &Config, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RoutingConfig::default();
        let text = |key: &str, var: &str, default: &str| -> String {
            config
                .lookup_str(key)
                .or_else(|| env_lookup(var))
                .unwrap_or_else(|| default.to_string())
        };

        let debug = match config.get("app.debug") {
            Some(_) => config.get_bool("app.debug", false),
            None => env_lookup("APP_DEBUG")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.debug),
        };

        Self {
            system_content: text(
                "routing.default_system_content",
                "DEFAULT_SYSTEM_CONTENT",
                &defaults.system_content,
            ),
            dashboard_content: text(
                "routing.default_dashboard_content",
                "DEFAULT_DASHBOARD_CONTENT",
                &defaults.dashboard_content,
            ),
            website_content: text(
                "routing.default_website_content",
                "DEFAULT_WEBSITE_CONTENT",
                &defaults.website_content,
            ),
            route_cache_file: PathBuf::from(text(
                "routing.route_cache_file",
                "ROUTE_CACHE_FILE",
                "bootstrap/cache/routes.json",
            )),
            domain: text("app.domain", "DEFAULT_DOMINIO", ""),
            debug,
        }
    }

    /// Template context: dashboard for authenticated callers, website otherwise.
    #[must_use]
    pub fn template_for(&self, authenticated: bool) -> &str {
        if authenticated {
            &self.dashboard_content
        } else {
            &self.website_content
        }
    }

    /// System-wide not-found controller id for a template context,
    /// e.g. `App/Website/NotFoundController`.
    #[must_use]
    pub fn not_found_controller(&self, context: &str) -> String {
        format!("{}/{}/NotFoundController", capitalize(&self.system_content), context)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_nested() {
        let mut config = Config::default();
        config.set("app.name", "demo");
        config.set("app.limits.max", 5);
        assert_eq!(config.get_str("app.name", ""), "demo");
        assert_eq!(config.get_int("app.limits.max", 0), 5);
        assert_eq!(config.get_str("app.missing", "fallback"), "fallback");
        assert_eq!(config.get_str("app.limits.max", ""), "5");
    }

    #[test]
    fn test_set_replaces_scalar_in_path() {
        let mut config = Config::default();
        config.set("a.b", "scalar");
        config.set("a.b.c", true);
        assert!(config.get_bool("a.b.c", false));
    }

    #[test]
    fn test_get_bool_accepts_text_flags() {
        let mut config = Config::default();
        config.set("app.debug", "on");
        assert!(config.get_bool("app.debug", false));
        config.set("app.debug", "nonsense");
        assert!(config.get_bool("app.debug", true));
    }

    #[test]
    fn test_env_debug_flag_uses_lenient_parse() {
        let config = Config::default();
        let debug_from = |raw: &'static str| {
            RoutingConfig::resolve_with(&config, move |name: &str| {
                (name == "APP_DEBUG").then(|| raw.to_string())
            })
            .debug
        };
        assert!(debug_from("yes"));
        assert!(!debug_from("off"));
        assert!(!debug_from("maybe"));
    }

    #[test]
    fn test_routing_precedence() {
        let mut config = Config::default();
        config.set("routing.default_website_content", "Site");
        let env = |name: &str| match name {
            "DEFAULT_WEBSITE_CONTENT" => Some("EnvSite".to_string()),
            "DEFAULT_SYSTEM_CONTENT" => Some("Core".to_string()),
            "APP_DEBUG" => Some("true".to_string()),
            _ => None,
        };
        let routing = RoutingConfig::resolve_with(&config, env);
        assert_eq!(routing.website_content, "Site");
        assert_eq!(routing.system_content, "Core");
        assert_eq!(routing.dashboard_content, "Dashboard");
        assert!(routing.debug);
    }

    #[test]
    fn test_template_for() {
        let routing = RoutingConfig::default();
        assert_eq!(routing.template_for(true), "Dashboard");
        assert_eq!(routing.template_for(false), "Website");
    }

    #[test]
    fn test_not_found_controller_capitalizes_system() {
        let routing = RoutingConfig {
            system_content: "core".to_string(),
            ..RoutingConfig::default()
        };
        assert_eq!(
            routing.not_found_controller("Website"),
            "Core/Website/NotFoundController"
        );
    }
}
