use std::collections::HashMap;

use switchyard::registry::{GroupAttributes, Registrar, RouteRegistry};
use switchyard::route::{HttpMethod, RouteOptions};

#[test]
fn test_group_prefix_and_middleware() {
    let mut registry = RouteRegistry::new();
    registry.group(
        GroupAttributes::new().prefix("/admin").middleware(["auth"]),
        |admin| admin.get("/x", "AdminController@x", RouteOptions::new()),
    );
    let route = registry.find_route(HttpMethod::Get, "/admin/x").unwrap();
    assert_eq!(route.path, "/admin/x");
    assert!(route.options.middleware.contains(&"auth".to_string()));
}

#[test]
fn test_nested_groups_compose_outer_first() {
    let mut registry = RouteRegistry::new();
    registry.get("/admin/x", "Plain@x", RouteOptions::new());
    registry.group(
        GroupAttributes::new().prefix("/admin").middleware(["auth"]),
        |admin| {
            admin.group(
                GroupAttributes::new().prefix("reports/").middleware(["audit"]),
                |reports| {
                    reports.get("/{year:int}", "Reports@year", RouteOptions::new().middleware(["cache"]))
                },
            );
        },
    );

    let route = registry
        .find_route(HttpMethod::Get, "/admin/reports/{year:int}")
        .unwrap();
    assert_eq!(route.options.middleware, vec!["auth", "audit", "cache"]);

    // Routes declared outside the group are untouched.
    let plain = registry.find_route(HttpMethod::Get, "/admin/x").unwrap();
    assert!(plain.options.middleware.is_empty());
}

#[test]
fn test_identical_paths_in_two_groups() {
    let mut registry = RouteRegistry::new();
    registry.group(GroupAttributes::new().middleware(["a"]), |g| {
        g.get("/same", "A@run", RouteOptions::new())
    });
    registry.group(GroupAttributes::new().middleware(["b"]), |g| {
        g.get("/same", "B@run", RouteOptions::new())
    });
    assert_eq!(registry.len(), 1);
    let route = registry.find_route(HttpMethod::Get, "/same").unwrap();
    assert_eq!(route.action.as_deref(), Some("B@run"));
    assert_eq!(route.options.middleware, vec!["b"]);
}

#[test]
fn test_resource_routes() {
    let mut registry = RouteRegistry::new();
    registry.resource("/photos", "PhotoController", RouteOptions::new());
    let routes: Vec<(HttpMethod, &str, Option<&str>)> = registry
        .routes()
        .map(|r| (r.method, r.path.as_str(), r.name.as_deref()))
        .collect();
    assert_eq!(
        routes,
        vec![
            (HttpMethod::Get, "/photos", Some("photos.index")),
            (HttpMethod::Get, "/photos/create", Some("photos.create")),
            (HttpMethod::Get, "/photos/{id:int}", Some("photos.show")),
            (HttpMethod::Get, "/photos/{id:int}/edit", Some("photos.edit")),
            (HttpMethod::Post, "/photos", Some("photos.store")),
            (HttpMethod::Put, "/photos/{id:int}", Some("photos.update")),
            (HttpMethod::Delete, "/photos/{id:int}", Some("photos.destroy")),
        ]
    );
}

#[test]
fn test_url_for_named_route() {
    let mut registry = RouteRegistry::new();
    registry.get(
        "/posts/{year:int:4}/{slug}",
        "PostController@show",
        RouteOptions::new().name("post.show"),
    );
    let params = HashMap::from([
        ("year".to_string(), "2024".to_string()),
        ("slug".to_string(), "hello".to_string()),
    ]);
    assert_eq!(
        registry.url_for("post.show", &params).as_deref(),
        Some("/posts/2024/hello")
    );
    assert!(registry.url_for("missing", &params).is_none());
}

#[test]
fn test_match_methods_and_any() {
    let mut registry = RouteRegistry::new();
    registry.match_methods(&[HttpMethod::Get, HttpMethod::Post], "/form", "Form@handle", RouteOptions::new());
    registry.any("/ping", "Ping@index", RouteOptions::new());
    assert_eq!(registry.len(), 8);
    assert_eq!(registry.routes_for(HttpMethod::Head).len(), 1);
    assert!(registry.find_route(HttpMethod::Put, "/form").is_none());
}
