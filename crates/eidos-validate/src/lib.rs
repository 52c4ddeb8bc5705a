//! # Eidos Validate
//!
//! Schema validation for the Eidos core: a recursive structural walk over a
//! value and its schema that accumulates an ordered flat list of structured
//! failures.
//!
//! Failures are data, never exceptions. A pass always runs to completion,
//! and the caller decides whether a non-empty list is an error (via
//! [`Validator::finish`]) or just information.
//!
//! Types participate through a capability set probed by type identity:
//! per-type [`ValidationOptions`], a full-validation hook that replaces the
//! structural walk, and a post-validation hook that runs after it. The
//! [`TypeRegistry`] is the standard registration surface.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use eidos_schema::{NoSchemas, Schema};
//! use eidos_validate::{validate_at, NoOptions, Rule, Validator};
//! use serde_json::json;
//!
//! let schema = Schema {
//!     minimum: Some(0.0),
//!     ..Default::default()
//! };
//!
//! let mut v = Validator::new(Arc::new(NoOptions), Arc::new(NoSchemas));
//! validate_at(&schema, &json!(-1), None, &mut v);
//!
//! let failures = v.failures();
//! assert_eq!(failures.len(), 1);
//! assert_eq!(failures[0].rule, Rule::Minimum);
//! assert_eq!(failures[0].message, "-1 is below the minimum of 0");
//! ```

mod failure;
mod options;
mod validate;

pub use failure::{Rule, Validation, ValidationFailed};
pub use options::{
    NoOptions, TypeRegistry, ValidationHook, ValidationOptions, ValidationProvider,
};
pub use validate::{validate, validate_at, Validator};
