use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Config, RoutingConfig};
use crate::controller::ControllerTable;
use crate::dispatcher::{DispatchRequest, Dispatcher};
use crate::echo::EchoController;
use crate::manifest::{controller_ids, load_manifest};
use crate::middleware::MiddlewareRegistry;
use crate::registry::RouteRegistry;
use crate::response::HandlerResponse;
use crate::route::{HttpMethod, Route};
use crate::router::QueryParams;

/// Command-line interface for switchyard
#[derive(Debug, Parser)]
#[command(name = "switchyard", version)]
#[command(about = "Inspect, cache and exercise route tables", long_about = None)]
pub struct Cli {
    /// Directory holding `config/*.yaml`; relative cache paths resolve against it
    #[arg(long, global = true, env = "SWITCHYARD_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Route table operations
    Routes {
        #[command(subcommand)]
        command: RoutesCommand,
    },
    /// Dispatch one request against echo controllers and print the outcome
    Match {
        /// Route manifest (YAML)
        #[arg(short, long)]
        manifest: PathBuf,

        #[arg(long, default_value = "GET")]
        method: HttpMethod,

        #[arg(long)]
        path: String,

        /// Query entry as key=value; repeatable
        #[arg(long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,

        /// Dispatch as an authenticated caller
        #[arg(long, default_value_t = false)]
        auth: bool,

        /// Host header, for subdomain not-found handling
        #[arg(long)]
        host: Option<String>,

        /// Template context override
        #[arg(long)]
        context: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// Print the route table
    List {
        #[arg(short, long)]
        manifest: PathBuf,

        /// Only routes registered under this method
        #[arg(long)]
        method: Option<HttpMethod>,
    },
    /// Build the table from a manifest and write the route cache
    Cache {
        #[arg(short, long)]
        manifest: PathBuf,

        /// Cache file (default: `routing.route_cache_file`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete the route cache
    Clear {
        /// Cache file (default: `routing.route_cache_file`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Execute a parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the config or manifest cannot be loaded, the cache
/// cannot be written, or dispatch hits a configuration fault.
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = Config::load(&cli.base_dir)
        .with_context(|| format!("Failed to load config from {}", cli.base_dir.display()))?;
    let routing = RoutingConfig::from_config(&config);

    match &cli.command {
        Commands::Routes { command } => match command {
            RoutesCommand::List { manifest, method } => {
                let registry = load_registry(manifest)?;
                let routes: Vec<&Route> = match method {
                    Some(m) => registry.routes_for(*m).iter().collect(),
                    None => registry.routes().collect(),
                };
                for route in &routes {
                    writeln!(out, "{}", describe_route(route))?;
                }
                writeln!(out, "{} route(s)", routes.len())?;
                Ok(())
            }
            RoutesCommand::Cache { manifest, output } => {
                let registry = load_registry(manifest)?;
                let path = cache_path(&cli.base_dir, output.as_deref(), &routing);
                registry
                    .cache_to_file(&path)
                    .with_context(|| format!("Failed to write route cache {}", path.display()))?;
                writeln!(out, "Cached {} route(s) to {}", registry.len(), path.display())?;
                Ok(())
            }
            RoutesCommand::Clear { output } => {
                let path = cache_path(&cli.base_dir, output.as_deref(), &routing);
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        info!(cache = %path.display(), "Route cache cleared");
                        writeln!(out, "Removed {}", path.display())?;
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        writeln!(out, "No route cache at {}", path.display())?;
                    }
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("Failed to remove route cache {}", path.display())
                        })
                    }
                }
                Ok(())
            }
        },
        Commands::Match {
            manifest,
            method,
            path,
            query,
            auth,
            host,
            context,
        } => {
            let registry = load_registry(manifest)?;
            let dispatcher = echo_dispatcher(registry, routing, context.as_deref());

            let query: QueryParams = query.iter().cloned().collect();
            let mut req = DispatchRequest::new(*method, path)
                .with_query(query)
                .authenticated(*auth);
            if let Some(host) = host {
                req = req.with_host(host.as_str());
            }
            if let Some(context) = context {
                req = req.with_context(context.as_str());
            }

            let outcome = dispatcher
                .dispatch(&req)
                .with_context(|| format!("Dispatch of {} {} failed", req.method, req.path))?;
            let mut value = serde_json::to_value(&outcome)?;
            if let Some(response) = value.get_mut("response").and_then(Value::as_object_mut) {
                response.insert("headers".to_string(), headers_json(&outcome.response));
                response.insert(
                    "reason".to_string(),
                    Value::String(outcome.response.reason().to_string()),
                );
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            Ok(())
        }
    }
}

/// Builds a route table from a manifest file.
pub fn load_registry(manifest: &Path) -> Result<RouteRegistry> {
    let parsed = load_manifest(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
    let mut registry = RouteRegistry::new();
    parsed
        .apply(&mut registry)
        .with_context(|| format!("Invalid manifest {}", manifest.display()))?;
    registry.log_summary();
    Ok(registry)
}

/// Dispatcher whose controllers are all [`EchoController`]s: one per
/// controller id named in the table, plus the system not-found controllers
/// for the dashboard and website contexts (and `extra_context`, if given).
pub fn echo_dispatcher(
    registry: RouteRegistry,
    routing: RoutingConfig,
    extra_context: Option<&str>,
) -> Dispatcher {
    let mut controllers = ControllerTable::new();
    for id in controller_ids(registry.routes()) {
        controllers.register(&id, EchoController::new(id.as_str()));
    }
    let contexts = [
        Some(routing.dashboard_content.as_str()),
        Some(routing.website_content.as_str()),
        extra_context,
    ];
    for context in contexts.into_iter().flatten() {
        let id = routing.not_found_controller(context);
        controllers.register(&id, EchoController::new(id.as_str()));
    }
    Dispatcher::new(registry, controllers, MiddlewareRegistry::new(), routing)
}

fn cache_path(base_dir: &Path, output: Option<&Path>, routing: &RoutingConfig) -> PathBuf {
    let path = output.unwrap_or(&routing.route_cache_file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn describe_route(route: &Route) -> String {
    let target = match (&route.action, &route.options.redirect) {
        (_, Some(location)) => format!("-> {} ({})", location, route.redirect_status()),
        (Some(action), None) => action.clone(),
        (None, None) => "-".to_string(),
    };
    let mut line = format!("{:<7} {:<40} {}", route.method, route.path, target);
    if let Some(name) = &route.name {
        line.push_str(&format!("  as={name}"));
    }
    if route.options.auth {
        line.push_str("  auth");
    }
    if !route.options.middleware.is_empty() {
        line.push_str(&format!("  middleware={}", route.options.middleware.join(",")));
    }
    line
}

fn headers_json(response: &HandlerResponse) -> Value {
    let headers: Map<String, Value> = response
        .headers
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
        .collect();
    Value::Object(headers)
}
