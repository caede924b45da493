//! # CLI Module
//!
//! Command-line tools over a YAML route manifest (see [`crate::manifest`]).
//!
//! ## Commands
//!
//! ```bash
//! # Print the table, optionally for one method
//! switchyard routes list --manifest routes.yaml --method GET
//!
//! # Write the route cache (default path: routing.route_cache_file)
//! switchyard routes cache --manifest routes.yaml --output var/routes.json
//!
//! # Delete it again
//! switchyard routes clear --output var/routes.json
//!
//! # Dispatch one request against echo controllers
//! switchyard match --manifest routes.yaml --method GET --path /users/42 --query page=2 --auth
//! ```
//!
//! `match` prints the dispatch outcome as JSON: its `kind`, the selected
//! route pattern and the response status, headers and body.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use switchyard::cli::{run_cli, Cli};
//!
//! let cli = Cli::parse();
//! run_cli(&cli, &mut std::io::stdout())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{echo_dispatcher, load_registry, run_cli, Cli, Commands, RoutesCommand};
