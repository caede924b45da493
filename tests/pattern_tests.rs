use std::collections::HashMap;
use std::sync::Arc;

use switchyard::pattern::{compile, parse_placeholders, substitute, ParamType, PatternCache};

#[test]
fn test_compiled_regex_shapes() {
    let cases = [
        ("/", "^/$"),
        ("/users/{id:int}", "^/users/([0-9]+)$"),
        ("/tag/{name:string:3}", "^/tag/([^/]{1,3})$"),
        ("/files/{path}", "^/files/([^/]+)$"),
        ("/v1.0/{slug:alpha}", r"^/v1\.0/([a-zA-Z]+)$"),
    ];
    for (pattern, expected) in cases {
        assert_eq!(compile(pattern).unwrap().regex().as_str(), expected, "{pattern}");
    }
}

#[test]
fn test_patterns_are_case_sensitive_and_anchored() {
    let compiled = compile("/Users/{id:int}").unwrap();
    assert!(compiled.is_match("/Users/1"));
    assert!(!compiled.is_match("/users/1"));
    assert!(!compiled.is_match("/Users/1/extra"));
    assert!(!compiled.is_match("/prefix/Users/1"));
}

#[test]
fn test_placeholder_metadata() {
    let placeholders = parse_placeholders("/a/{x}/{y:int:4}/{z:weird}");
    assert_eq!(placeholders.len(), 3);
    assert_eq!(placeholders[0].param_type, ParamType::Any);
    assert_eq!(placeholders[1].max_length, Some(4));
    assert_eq!(placeholders[2].param_type, ParamType::Unknown("weird".into()));

    // Unknown types still register and capture like `any`.
    let compiled = compile("/a/{z:weird}").unwrap();
    assert_eq!(compiled.captures("/a/q").unwrap()["z"], "q");
}

#[test]
fn test_cache_returns_shared_matcher() {
    let cache = PatternCache::new();
    let a = cache.get_or_compile("/users/{id:int}").unwrap();
    let b = cache.clone().get_or_compile("/users/{id:int}").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_substitute_encodes_values() {
    let values = HashMap::from([("q".to_string(), "a b/c".to_string())]);
    assert_eq!(substitute("/search/{q:string}", &values), "/search/a%20b%2Fc");
}
