//! # Eidos Schema
//!
//! Type descriptors and JSON-Schema derivation for the Eidos core.
//!
//! This crate provides:
//! - **Type descriptors** — structural facts about data types (fields, wire
//!   names, nesting, optionality), supplied via the [`Describe`] trait and
//!   memoized process-wide.
//! - **Schema building** — conversion of descriptors into [`Schema`] nodes,
//!   with named-schema promotion, cycle breaking, collision fallback, and
//!   per-type overrides.
//! - **Annotations** — the `key=value[,key=value]` field annotation language
//!   for overriding computed property schemas.
//! - **Formats** — the fixed named-format registry used by opt-in format
//!   validation.
//!
//! ## Example
//!
//! ```rust
//! use eidos_schema::{
//!     Describe, FieldDescriptor, SchemaBuilder, SchemaType, TypeDescriptor, TypeRef,
//! };
//!
//! struct User {
//!     id: u64,
//!     name: Option<String>,
//! }
//!
//! impl Describe for User {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure::<Self>(vec![
//!             FieldDescriptor::new("id", "id", TypeRef::of::<u64>()),
//!             FieldDescriptor::new("name", "name,omitempty", TypeRef::of::<Option<String>>()),
//!         ])
//!     }
//! }
//!
//! let builder = SchemaBuilder::new();
//! let schema = builder.build::<User>().unwrap();
//!
//! assert_eq!(schema.name(), Some("User"));
//! assert_eq!(schema.schema_type, Some(SchemaType::Object));
//! assert_eq!(schema.required, vec!["id"]);
//! ```

// TODO: a derive macro for Describe, so struct impls stop being written by
// hand.

mod annotation;
mod builder;
mod descriptor;
mod format;
mod schema;

pub use annotation::{apply_annotations, split_escaped};
pub use builder::{fix_name, SchemaBuilder};
pub use descriptor::{
    descriptor_of, find_struct_field, parse_wire_marker, Describe, DescriptorKind,
    FieldDescriptor, ScalarKind, TypeDescriptor, TypeRef,
};
pub use format::format_pattern;
pub use schema::{
    escape_ref_part, unescape_ref_part, AdditionalProperties, NoSchemas, Schema, SchemaResolver,
    SchemaType, REF_PREFIX,
};
