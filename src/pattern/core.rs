use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::error::PatternError;

/// Matches one placeholder: `{name}`, `{name:type}` or `{name:type:max}`.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+)(?::([A-Za-z0-9_]+))?(?::([0-9]+))?\}")
        .expect("placeholder grammar regex should be valid")
});

/// Largest length bound written into a compiled regex as a counted repetition.
pub const MAX_REGEX_BOUND: usize = 255;

/// Declared type of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Alpha,
    Int,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    Email,
    Ipv4,
    Ipv6,
    Uuid,
    Phone,
    Url,
    Mac,
    Hex,
    Base64,
    Json,
    Any,
    /// A type token outside the vocabulary. Captures like `any`, never validates.
    Unknown(String),
}

impl ParamType {
    /// Parses a type token. Matching is exact (tokens are lowercase).
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "string" => ParamType::String,
            "alpha" => ParamType::Alpha,
            "int" => ParamType::Int,
            "float" => ParamType::Float,
            "decimal" => ParamType::Decimal,
            "boolean" => ParamType::Boolean,
            "date" => ParamType::Date,
            "time" => ParamType::Time,
            "email" => ParamType::Email,
            "ipv4" => ParamType::Ipv4,
            "ipv6" => ParamType::Ipv6,
            "uuid" => ParamType::Uuid,
            "phone" => ParamType::Phone,
            "url" => ParamType::Url,
            "mac" => ParamType::Mac,
            "hex" => ParamType::Hex,
            "base64" => ParamType::Base64,
            "json" => ParamType::Json,
            "any" => ParamType::Any,
            other => ParamType::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Alpha => "alpha",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Decimal => "decimal",
            ParamType::Boolean => "boolean",
            ParamType::Date => "date",
            ParamType::Time => "time",
            ParamType::Email => "email",
            ParamType::Ipv4 => "ipv4",
            ParamType::Ipv6 => "ipv6",
            ParamType::Uuid => "uuid",
            ParamType::Phone => "phone",
            ParamType::Url => "url",
            ParamType::Mac => "mac",
            ParamType::Hex => "hex",
            ParamType::Base64 => "base64",
            ParamType::Json => "json",
            ParamType::Any => "any",
            ParamType::Unknown(token) => token,
        }
    }

    /// Regex fragment for the capture. Only non-capturing groups are used so
    /// that group `n` of the compiled regex is always placeholder `n`.
    ///
    /// Bounds above [`MAX_REGEX_BOUND`] compile unbounded; the validator
    /// still enforces the declared length.
    fn fragment(&self, max_length: Option<usize>) -> String {
        let bound = max_length.filter(|n| *n <= MAX_REGEX_BOUND);
        match self {
            ParamType::String => match bound {
                Some(n) => format!("[^/]{{1,{n}}}"),
                None => "[^/]+".to_string(),
            },
            ParamType::Int => match bound {
                Some(n) => format!("[0-9]{{1,{n}}}"),
                None => "[0-9]+".to_string(),
            },
            ParamType::Alpha => "[a-zA-Z]+".to_string(),
            ParamType::Float | ParamType::Decimal => r"[0-9]+(?:\.[0-9]+)?".to_string(),
            ParamType::Boolean => "(?:true|false|1|0)".to_string(),
            ParamType::Date => "[0-9]{4}-[0-9]{2}-[0-9]{2}".to_string(),
            ParamType::Time => "[0-9]{2}:[0-9]{2}:[0-9]{2}".to_string(),
            ParamType::Email => r"[^@/]+@[^@/]+\.[a-zA-Z]{2,}".to_string(),
            ParamType::Ipv4 => r"\b[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\b".to_string(),
            ParamType::Ipv6 => "(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}".to_string(),
            _ => "[^/]+".to_string(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{name:type:max}` occurrence in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// `Any` when the placeholder declares no type
    pub param_type: ParamType,
    /// Declared maximum length; a declared `0` counts as no bound
    pub max_length: Option<usize>,
}

/// Extracts the placeholder list from a pattern, in declaration order.
#[must_use]
pub fn parse_placeholders(pattern: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(pattern)
        .map(|caps| placeholder_from(&caps))
        .collect()
}

fn placeholder_from(caps: &regex::Captures<'_>) -> Placeholder {
    let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
    let param_type = caps
        .get(2)
        .map_or(ParamType::Any, |m| ParamType::parse(m.as_str()));
    let max_length = caps
        .get(3)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| *n > 0);
    Placeholder {
        name,
        param_type,
        max_length,
    }
}

/// Replaces placeholders with the supplied values, percent-encoding each one.
///
/// Placeholders without a value are left in place.
#[must_use]
pub fn substitute(pattern: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &regex::Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            match values.get(name) {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => caps.get(0).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .into_owned()
}

/// An anchored matcher built from one route pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<Placeholder>,
}

impl CompiledPattern {
    /// The pattern this matcher was compiled from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The generated regex, e.g. `^/users/([0-9]+)$`
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and returns the named captures.
    ///
    /// When a name is declared twice the later capture wins.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut out = HashMap::with_capacity(self.placeholders.len());
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                out.insert(placeholder.name.clone(), m.as_str().to_string());
            }
        }
        Some(out)
    }
}

/// Compiles a route pattern into an anchored regex with one capture group per
/// placeholder. Literal text is escaped, so `.` or `+` in a path only match
/// themselves.
///
/// Pure and deterministic: the same pattern always yields the same regex.
pub fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let mut source = String::with_capacity(pattern.len() + 16);
    source.push('^');
    let mut placeholders = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        source.push_str(&regex::escape(&pattern[last..whole.start()]));
        let placeholder = placeholder_from(&caps);
        source.push('(');
        source.push_str(&placeholder.param_type.fragment(placeholder.max_length));
        source.push(')');
        placeholders.push(placeholder);
        last = whole.end();
    }
    source.push_str(&regex::escape(&pattern[last..]));
    source.push('$');

    let regex = Regex::new(&source).map_err(|e| PatternError {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(CompiledPattern {
        source: pattern.to_string(),
        regex,
        placeholders,
    })
}
