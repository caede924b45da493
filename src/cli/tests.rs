//! Unit tests for CLI commands

use crate::cli::{run_cli, Cli, Commands, RoutesCommand};
use crate::route::HttpMethod;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"
routes:
  - method: GET
    path: /users/{id:int}
    action: UserController@show
  - method: DELETE
    path: /users/{id:int}
    action: UserController@destroy
"#;

fn workspace() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("routes.yaml");
    fs::write(&manifest, MANIFEST).unwrap();
    let manifest = manifest.to_string_lossy().into_owned();
    (dir, manifest)
}

fn run(dir: &TempDir, args: &[&str]) -> String {
    let base = dir.path().to_string_lossy().into_owned();
    let mut argv = vec!["switchyard", "--base-dir", base.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    run_cli(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from([
        "switchyard",
        "match",
        "--manifest",
        "routes.yaml",
        "--method",
        "post",
        "--path",
        "/x",
        "--query",
        "a=1",
        "--query",
        "b=",
        "--auth",
    ])
    .unwrap();

    match cli.command {
        Commands::Match {
            method, query, auth, ..
        } => {
            assert_eq!(method, HttpMethod::Post);
            assert_eq!(
                query,
                vec![("a".to_string(), "1".to_string()), ("b".to_string(), String::new())]
            );
            assert!(auth);
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_bad_query_and_method_rejected() {
    assert!(Cli::try_parse_from([
        "switchyard", "match", "--manifest", "m", "--path", "/", "--query", "novalue"
    ])
    .is_err());
    assert!(Cli::try_parse_from([
        "switchyard", "match", "--manifest", "m", "--path", "/", "--method", "TRACE"
    ])
    .is_err());
}

#[test]
fn test_routes_list_parses_method_filter() {
    let cli = Cli::try_parse_from([
        "switchyard", "routes", "list", "--manifest", "r.yaml", "--method", "DELETE",
    ])
    .unwrap();
    match cli.command {
        Commands::Routes {
            command: RoutesCommand::List { method, .. },
        } => assert_eq!(method, Some(HttpMethod::Delete)),
        _ => panic!("Expected routes list"),
    }
}

#[test]
fn test_list_prints_routes() {
    let (dir, manifest) = workspace();
    let out = run(&dir, &["routes", "list", "--manifest", &manifest]);
    assert!(out.contains("UserController@show"));
    assert!(out.contains("UserController@destroy"));
    assert!(out.ends_with("2 route(s)\n"));

    let out = run(&dir, &["routes", "list", "--manifest", &manifest, "--method", "GET"]);
    assert!(!out.contains("destroy"));
}

#[test]
fn test_cache_then_clear() {
    let (dir, manifest) = workspace();
    let out = run(&dir, &["routes", "cache", "--manifest", &manifest, "--output", "cache/r.json"]);
    assert!(out.starts_with("Cached 2 route(s)"));
    assert!(dir.path().join("cache/r.json").exists());

    let out = run(&dir, &["routes", "clear", "--output", "cache/r.json"]);
    assert!(out.starts_with("Removed"));
    assert!(!dir.path().join("cache/r.json").exists());

    let out = run(&dir, &["routes", "clear", "--output", "cache/r.json"]);
    assert!(out.starts_with("No route cache"));
}

#[test]
fn test_match_prints_outcome_json() {
    let (dir, manifest) = workspace();
    let out = run(&dir, &["match", "--manifest", &manifest, "--path", "/users/42"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["kind"], "handled");
    assert_eq!(value["route"], "/users/{id:int}");
    assert_eq!(value["response"]["status"], 200);
    assert_eq!(value["response"]["reason"], "OK");
    assert_eq!(value["response"]["body"]["params"]["id"], 42);
    assert_eq!(value["response"]["headers"]["content-type"], "application/json");

    let out = run(&dir, &["match", "--manifest", &manifest, "--method", "PUT", "--path", "/users/42"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["kind"], "method_not_allowed");
    assert_eq!(value["response"]["headers"]["allow"], "GET, DELETE");
    assert_eq!(value["response"]["reason"], "Method Not Allowed");

    let out = run(&dir, &["match", "--manifest", &manifest, "--path", "/nowhere"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["kind"], "not_found");
    assert_eq!(value["controller"], "App/Website/NotFoundController");
}
