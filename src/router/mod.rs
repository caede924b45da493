//! # Router Module
//!
//! Matches one route pattern against one request path and produces typed
//! parameters.
//!
//! ## Overview
//!
//! Extraction runs in four steps:
//!
//! 1. Compile the pattern (memoized in a [`crate::pattern::PatternCache`]) and
//!    match the path. No match means `None`.
//! 2. Collect the named captures and, when requested, merge the query string
//!    over them. A query key equal to a placeholder name overwrites the value
//!    captured from the path. The front-controller `url` key is dropped.
//! 3. Validate the merged values against their declared types
//!    ([`crate::validator`]). Any failure means `None`.
//! 4. Cast placeholder values: `int` to `i64`, `float`/`decimal` to `f64`,
//!    `boolean` to a tri-state. Everything else stays a string.
//!
//! Extraction has no side effects beyond warming the pattern cache, so the
//! dispatcher can probe as many routes as it needs.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use switchyard::router::{ParamExtractor, ParamValue};
//!
//! let extractor = ParamExtractor::new();
//! let params = extractor
//!     .extract("/users/{id:int}", "/users/42", &HashMap::new(), true)
//!     .unwrap();
//! assert_eq!(params["id"], ParamValue::Int(42));
//! assert!(extractor
//!     .extract("/users/{id:int}", "/users/abc", &HashMap::new(), true)
//!     .is_none());
//! ```

mod core;

pub(crate) use core::parse_flag;
pub use core::{extract, ParamExtractor, ParamValue, Params, QueryParams};
