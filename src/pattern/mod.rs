//! # Pattern Module
//!
//! Compiles route path templates into anchored regexes.
//!
//! ## Placeholder Grammar
//!
//! - `{name}` - any non-slash text
//! - `{name:type}` - text accepted by `type`
//! - `{name:type:max}` - as above, with a maximum length
//!
//! `name` and `type` are ASCII word characters, `max` is an unsigned integer.
//! Supported types: `string, alpha, int, float, decimal, boolean, date, time,
//! email, ipv4, ipv6, uuid, phone, url, mac, hex, base64, json, any`.
//!
//! ## Two-Phase Matching
//!
//! The regex built here is a loose pre-filter: `email`, `ipv4` and friends only
//! narrow the candidate text by shape. The [`crate::validator`] module re-checks
//! every captured value with an exact predicate, and that second pass decides.
//!
//! Types the regex has no special shape for (`uuid`, `url`, `json`, ...) and
//! unrecognized type tokens capture like `any`. An unrecognized type never
//! passes validation, so such a route registers but never matches while the
//! placeholder is present.
//!
//! ## Example
//!
//! ```rust
//! use switchyard::pattern::compile;
//!
//! let pattern = compile("/users/{id:int}/posts/{slug}").unwrap();
//! let caps = pattern.captures("/users/42/posts/hello").unwrap();
//! assert_eq!(caps["id"], "42");
//! assert_eq!(caps["slug"], "hello");
//! assert!(pattern.captures("/users/abc/posts/hello").is_none());
//! ```

mod cache;
mod core;
#[cfg(test)]
mod tests;

pub use cache::PatternCache;
pub use core::{
    compile, parse_placeholders, substitute, CompiledPattern, ParamType, Placeholder,
    MAX_REGEX_BOUND,
};
