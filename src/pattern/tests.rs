use super::{
    compile, parse_placeholders, substitute, ParamType, PatternCache, MAX_REGEX_BOUND,
};
use std::sync::Arc;

#[test]
fn test_root_path() {
    let p = compile("/").unwrap();
    assert!(p.is_match("/"));
    assert!(!p.is_match("/x"));
    assert!(p.placeholders().is_empty());
}

#[test]
fn test_untyped_placeholder_is_any() {
    let p = compile("/items/{id}").unwrap();
    assert_eq!(p.placeholders()[0].param_type, ParamType::Any);
    assert!(p.is_match("/items/abc-123"));
    assert!(!p.is_match("/items/a/b"));
    assert!(!p.is_match("/items/"));
}

#[test]
fn test_anchored_both_ends() {
    let p = compile("/users/{id:int}").unwrap();
    assert!(p.is_match("/users/42"));
    assert!(!p.is_match("/api/users/42"));
    assert!(!p.is_match("/users/42/edit"));
}

#[test]
fn test_literal_text_is_escaped() {
    let p = compile("/feed.json").unwrap();
    assert!(p.is_match("/feed.json"));
    assert!(!p.is_match("/feedxjson"));
}

#[test]
fn test_int_with_length_bound() {
    let p = compile("/code/{n:int:3}").unwrap();
    assert!(p.is_match("/code/123"));
    assert!(!p.is_match("/code/1234"));
}

#[test]
fn test_string_with_length_bound() {
    let p = compile("/tag/{name:string:3}").unwrap();
    assert!(p.is_match("/tag/abc"));
    assert!(!p.is_match("/tag/abcd"));
}

#[test]
fn test_bound_above_cap_compiles_unbounded() {
    let p = compile("/tag/{name:string:20000}").unwrap();
    assert_eq!(p.regex().as_str(), "^/tag/([^/]+)$");
    assert_eq!(p.placeholders()[0].max_length, Some(20_000));
    assert!(p.is_match("/tag/abc"));

    let at_cap = compile(&format!("/n/{{v:int:{MAX_REGEX_BOUND}}}")).unwrap();
    assert_eq!(at_cap.regex().as_str(), format!("^/n/([0-9]{{1,{MAX_REGEX_BOUND}}})$"));
}

#[test]
fn test_zero_length_bound_is_ignored() {
    let p = compile("/tag/{name:string:0}").unwrap();
    assert_eq!(p.placeholders()[0].max_length, None);
    assert!(p.is_match("/tag/anything"));
}

#[test]
fn test_type_shapes() {
    let cases = [
        ("/{v:alpha}", "/abc", "/ab1"),
        ("/{v:float}", "/1.5", "/1."),
        ("/{v:decimal}", "/10", "/ten"),
        ("/{v:boolean}", "/true", "/yes"),
        ("/{v:date}", "/2024-01-31", "/2024-1-31"),
        ("/{v:time}", "/23:59:01", "/23:59"),
        ("/{v:email}", "/a@b.co", "/a@b"),
        ("/{v:ipv4}", "/10.0.0.1", "/10.0.1"),
        (
            "/{v:ipv6}",
            "/2001:0db8:0000:0000:0000:ff00:0042:8329",
            "/2001:db8::1",
        ),
    ];
    for (pattern, ok, bad) in cases {
        let p = compile(pattern).unwrap();
        assert!(p.is_match(ok), "{pattern} should match {ok}");
        assert!(!p.is_match(bad), "{pattern} should not match {bad}");
    }
}

#[test]
fn test_unknown_type_compiles_as_any() {
    let p = compile("/x/{v:color}").unwrap();
    assert_eq!(
        p.placeholders()[0].param_type,
        ParamType::Unknown("color".to_string())
    );
    assert!(p.is_match("/x/red"));
}

#[test]
fn test_captures_named_values() {
    let p = compile("/users/{user_id:int}/posts/{slug}").unwrap();
    let caps = p.captures("/users/7/posts/hello-world").unwrap();
    assert_eq!(caps.len(), 2);
    assert_eq!(caps["user_id"], "7");
    assert_eq!(caps["slug"], "hello-world");
}

#[test]
fn test_placeholders_inside_a_segment() {
    let p = compile("/files/{name:alpha}.{ext:alpha}").unwrap();
    let caps = p.captures("/files/report.pdf").unwrap();
    assert_eq!(caps["name"], "report");
    assert_eq!(caps["ext"], "pdf");
}

#[test]
fn test_compile_is_deterministic() {
    let a = compile("/a/{b:int:4}/{c}").unwrap();
    let b = compile("/a/{b:int:4}/{c}").unwrap();
    assert_eq!(a.regex().as_str(), b.regex().as_str());
    assert_eq!(a.regex().as_str(), "^/a/([0-9]{1,4})/([^/]+)$");
}

#[test]
fn test_parse_placeholders() {
    let list = parse_placeholders("/x/{a}/{b:int}/{c:string:8}");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].name, "a");
    assert_eq!(list[1].param_type, ParamType::Int);
    assert_eq!(list[2].max_length, Some(8));
}

#[test]
fn test_malformed_placeholder_stays_literal() {
    let p = compile("/x/{a-b}").unwrap();
    assert!(p.placeholders().is_empty());
    assert!(p.is_match("/x/{a-b}"));
}

#[test]
fn test_cache_returns_shared_matcher() {
    let cache = PatternCache::new();
    let a = cache.get_or_compile("/users/{id:int}").unwrap();
    let b = cache.get_or_compile("/users/{id:int}").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_substitute_fills_known_names() {
    let mut values = std::collections::HashMap::new();
    values.insert("id".to_string(), "42".to_string());
    values.insert("q".to_string(), "a b".to_string());
    assert_eq!(substitute("/users/{id:int}/edit", &values), "/users/42/edit");
    assert_eq!(substitute("/s/{q}/{page:int}", &values), "/s/a%20b/{page:int}");
}
