use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::pattern::{compile, CompiledPattern, ParamType, PatternCache};
use crate::validator::validate_placeholders;

/// Raw query string values, already percent-decoded.
pub type QueryParams = HashMap<String, String>;

/// Extracted, validated and cast parameters of one matched route.
pub type Params = HashMap<String, ParamValue>;

/// Query key the front controller uses to carry the request path.
const ROUTING_KEY: &str = "url";

/// A parameter value after casting to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// `None` when the text is not a recognizable boolean
    Bool(Option<bool>),
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(n) => Some(*n),
            ParamValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => *b,
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(Some(b)) => write!(f, "{b}"),
            ParamValue::Bool(None) => f.write_str("null"),
        }
    }
}

/// Pattern matcher plus validator and caster, backed by a shared compile cache.
#[derive(Debug, Clone, Default)]
pub struct ParamExtractor {
    patterns: PatternCache,
}

impl ParamExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.patterns
    }

    /// Match `path` against `pattern` and return the typed parameters.
    ///
    /// Returns `None` when the path does not match, when any value fails
    /// validation, or when the pattern cannot be compiled.
    #[must_use]
    pub fn extract(
        &self,
        pattern: &str,
        path: &str,
        query: &QueryParams,
        include_query: bool,
    ) -> Option<Params> {
        match self.patterns.get_or_compile(pattern) {
            Ok(compiled) => extract_compiled(&compiled, path, query, include_query),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping route with uncompilable pattern");
                None
            }
        }
    }
}

/// Uncached [`ParamExtractor::extract`].
#[must_use]
pub fn extract(pattern: &str, path: &str, query: &QueryParams, include_query: bool) -> Option<Params> {
    match compile(pattern) {
        Ok(compiled) => extract_compiled(&compiled, path, query, include_query),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Skipping route with uncompilable pattern");
            None
        }
    }
}

fn extract_compiled(
    compiled: &CompiledPattern,
    path: &str,
    query: &QueryParams,
    include_query: bool,
) -> Option<Params> {
    let mut raw = compiled.captures(path)?;
    if include_query {
        for (key, value) in query {
            raw.insert(key.clone(), value.clone());
        }
    }
    raw.remove(ROUTING_KEY);

    if !validate_placeholders(compiled.placeholders(), &raw) {
        return None;
    }

    let mut params = Params::with_capacity(raw.len());
    for (key, text) in raw {
        // Later declarations of a repeated name win, as with captures.
        let declared = compiled.placeholders().iter().rev().find(|p| p.name == key);
        let value = match declared {
            Some(placeholder) => cast(&text, &placeholder.param_type),
            None => ParamValue::Str(text),
        };
        params.insert(key, value);
    }
    Some(params)
}

fn cast(text: &str, param_type: &ParamType) -> ParamValue {
    match param_type {
        ParamType::Int => text
            .trim()
            .parse::<i64>()
            .map_or_else(|_| ParamValue::Str(text.to_string()), ParamValue::Int),
        // Out-of-range values would serialize as JSON null; keep the text.
        ParamType::Float | ParamType::Decimal => match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => ParamValue::Float(n),
            _ => ParamValue::Str(text.to_string()),
        },
        ParamType::Boolean => ParamValue::Bool(parse_flag(text)),
        _ => ParamValue::Str(text.to_string()),
    }
}

/// Lenient boolean parse: `1/true/on/yes` and `0/false/off/no/""`, case-insensitive.
///
/// Shared by parameter casting and the config flag readers.
pub(crate) fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}
