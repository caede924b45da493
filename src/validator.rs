//! # Validator Module
//!
//! Exact per-type predicates for captured route parameters.
//!
//! The pattern compiler only narrows candidate text by shape. Every captured
//! value is re-checked here, and this pass decides whether a route matches.
//! `any` accepts everything; a type token outside the vocabulary accepts
//! nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

use crate::pattern::{parse_placeholders, ParamType, Placeholder};

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("float regex should be valid")
});

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date regex should be valid"));

static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("time regex should be valid"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email regex should be valid")
});

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid regex should be valid")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone regex should be valid"));

static MAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$").expect("mac regex should be valid")
});

static HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("hex regex should be valid"));

static BASE64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9+/=]+$").expect("base64 regex should be valid"));

/// Returns true when `value` is acceptable for `param_type`.
#[must_use]
pub fn is_valid(param_type: &ParamType, value: &str) -> bool {
    match param_type {
        ParamType::String | ParamType::Any => true,
        ParamType::Alpha => !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic()),
        ParamType::Int => is_int(value),
        ParamType::Float => FLOAT.is_match(value.trim()),
        ParamType::Decimal => is_numeric(value),
        ParamType::Boolean => matches!(value, "true" | "false" | "1" | "0"),
        ParamType::Date => DATE.is_match(value),
        ParamType::Time => TIME.is_match(value),
        ParamType::Email => value.len() <= 254 && EMAIL.is_match(value),
        ParamType::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
        ParamType::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
        ParamType::Uuid => UUID.is_match(value),
        ParamType::Phone => PHONE.is_match(value),
        ParamType::Url => url::Url::parse(value).is_ok_and(|u| u.has_host()),
        ParamType::Mac => MAC.is_match(value),
        ParamType::Hex => HEX.is_match(value),
        ParamType::Base64 => BASE64.is_match(value),
        ParamType::Json => serde_json::from_str::<serde_json::Value>(value)
            .is_ok_and(|v| !v.is_null()),
        ParamType::Unknown(_) => false,
    }
}

/// [`is_valid`] for a raw type token such as `"int"`.
#[must_use]
pub fn is_valid_type(type_token: &str, value: &str) -> bool {
    is_valid(&ParamType::parse(type_token), value)
}

/// Checks every placeholder declared in `pattern` against `params`.
///
/// Placeholders missing from `params` are skipped. Stops at the first value
/// that is too long or fails its type predicate.
#[must_use]
pub fn validate_all(pattern: &str, params: &HashMap<String, String>) -> bool {
    validate_placeholders(&parse_placeholders(pattern), params)
}

/// [`validate_all`] over an already parsed placeholder list.
#[must_use]
pub fn validate_placeholders(placeholders: &[Placeholder], params: &HashMap<String, String>) -> bool {
    for placeholder in placeholders {
        let Some(value) = params.get(&placeholder.name) else {
            continue;
        };
        if let Some(max) = placeholder.max_length {
            if value.len() > max {
                debug!(
                    param = %placeholder.name,
                    max_length = max,
                    actual = value.len(),
                    "Parameter exceeds declared length"
                );
                return false;
            }
        }
        if !is_valid(&placeholder.param_type, value) {
            debug!(
                param = %placeholder.name,
                param_type = %placeholder.param_type,
                "Parameter failed type validation"
            );
            return false;
        }
    }
    true
}

/// Base-10 integer with optional sign, no leading zeros, within `i64`.
fn is_int(value: &str) -> bool {
    let value = value.trim();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    value.parse::<i64>().is_ok()
}

/// Any numeric string: integer, decimal or exponent form, optionally
/// surrounded by whitespace.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && FLOAT.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_rules() {
        assert!(is_int("0"));
        assert!(is_int("-17"));
        assert!(is_int("+5"));
        assert!(!is_int("007"));
        assert!(!is_int("1.0"));
        assert!(!is_int("99999999999999999999"));
        assert!(!is_int("-"));
    }

    #[test]
    fn test_numeric_rules() {
        assert!(is_numeric("3"));
        assert!(is_numeric(" 3.25 "));
        assert!(is_numeric("1e3"));
        assert!(is_numeric(".5"));
        assert!(!is_numeric("1,5"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn test_unknown_type_fails_closed() {
        assert!(!is_valid_type("color", "red"));
        assert!(is_valid_type("any", ""));
    }

    #[test]
    fn test_validate_all_skips_missing() {
        let params = HashMap::new();
        assert!(validate_all("/users/{id:int}", &params));
    }

    #[test]
    fn test_validate_all_length_counts_bytes() {
        let mut params = HashMap::new();
        params.insert("name".to_string(), "äb".to_string());
        assert!(!validate_all("/tag/{name:string:2}", &params));
    }
}
