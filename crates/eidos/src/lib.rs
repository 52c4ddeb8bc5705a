//! # Eidos
//!
//! Eidos derives machine-readable schemas from statically declared data
//! types, binds scattered wire-format values (URL path segments, query
//! strings, headers, form and multipart fields, JSON bodies) into typed
//! instances, and validates those instances against the derived schema with
//! a JSON-Schema-compatible rule set extensible via per-type hooks.
//!
//! The crate is a facade over the three core crates:
//!
//! | Crate | Provides |
//! |-------|----------|
//! | `eidos-schema` | [`Describe`] descriptors, [`SchemaBuilder`], annotations, formats |
//! | `eidos-bind` | [`ValueNode`] trees, coercion, the per-source `bind_*` functions |
//! | `eidos-validate` | [`Validator`] cursors, [`validate`], per-type options and hooks |
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use eidos::{
//!     bind_query, validate, Describe, FieldDescriptor, NoOptions, SchemaBuilder,
//!     TypeDescriptor, TypeRef, Validator,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ListParams {
//!     limit: u32,
//! }
//!
//! impl Describe for ListParams {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
//!             "limit",
//!             "limit",
//!             TypeRef::of::<u32>(),
//!         )
//!         .with_annotation("maximum=100")])
//!     }
//! }
//!
//! // Derive the schema once; it is cached for the process lifetime.
//! let builder = Arc::new(SchemaBuilder::new());
//! let schema = builder.build::<ListParams>().unwrap();
//!
//! // Bind wire pairs into a typed instance.
//! let params: ListParams = bind_query([("limit", "250")]).unwrap();
//! assert_eq!(params.limit, 250);
//!
//! // Validate the bound value against the derived schema.
//! let value = serde_json::json!({"limit": params.limit});
//! let mut v = Validator::new(Arc::new(NoOptions), builder);
//! validate::<ListParams>(&schema, &value, &mut v);
//! assert_eq!(v.failures().len(), 1);
//! ```

pub use eidos_bind::{
    bind_form, bind_headers, bind_json, bind_multipart, bind_path, bind_query, bind_tree, coerce,
    form_tree, header_tree, multipart_tree, parse_bool_literal, path_tree, query_tree, split_key,
    transfer, BindError, ValueNode,
};
pub use eidos_schema::{
    apply_annotations, descriptor_of, escape_ref_part, find_struct_field, fix_name,
    format_pattern, parse_wire_marker, split_escaped, unescape_ref_part, AdditionalProperties,
    Describe, DescriptorKind, FieldDescriptor, NoSchemas, ScalarKind, Schema, SchemaBuilder,
    SchemaResolver, SchemaType, TypeDescriptor, TypeRef, REF_PREFIX,
};
pub use eidos_validate::{
    validate, validate_at, NoOptions, Rule, TypeRegistry, Validation, ValidationFailed,
    ValidationHook, ValidationOptions, ValidationProvider, Validator,
};
