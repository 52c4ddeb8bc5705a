//! # Eidos Bind
//!
//! Wire value binding for the Eidos core: assembles scattered wire-format
//! values into an untyped value tree, coerces the tree toward a destination
//! type, and transfers the result into a concrete instance through the
//! strict structural decoder shared with body decoding.
//!
//! ## Sources
//!
//! | Function | Source | Key handling |
//! |----------|--------|--------------|
//! | [`bind_path`] | Matched route segments | Flat keys, last value wins |
//! | [`bind_query`] | Query-string pairs | `.`/`[index]`/`[name]` grammar |
//! | [`bind_headers`] | Header pairs | Flat keys, first value per name |
//! | [`bind_form`] | Form fields | `.`/`[index]`/`[name]` grammar |
//! | [`bind_multipart`] | Multipart fields + files | Field grammar, `key::count` for files |
//! | [`bind_json`] | JSON body | Strict decode, no tree |
//!
//! ## Example
//!
//! ```rust
//! use eidos_bind::bind_query;
//! use eidos_schema::{Describe, FieldDescriptor, TypeDescriptor, TypeRef};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ListParams {
//!     limit: u32,
//!     search: Option<String>,
//! }
//!
//! impl Describe for ListParams {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure::<Self>(vec![
//!             FieldDescriptor::new("limit", "limit", TypeRef::of::<u32>()),
//!             FieldDescriptor::new(
//!                 "search",
//!                 "search,omitempty",
//!                 TypeRef::of::<Option<String>>(),
//!             ),
//!         ])
//!     }
//! }
//!
//! let params: ListParams = bind_query([("limit", "10"), ("search", "rust")]).unwrap();
//! assert_eq!(params.limit, 10);
//! assert_eq!(params.search.as_deref(), Some("rust"));
//! ```
//!
//! Coercion is best-effort: a leaf that fails to parse keeps its original
//! string, and the wrong-type error surfaces from the final strict decode
//! with the same shape it would have for a JSON body.

mod bind;
mod coerce;
mod error;
mod key;
mod sources;
mod tree;

pub use bind::{
    bind_form, bind_headers, bind_json, bind_multipart, bind_path, bind_query, bind_tree,
    transfer,
};
pub use coerce::{coerce, parse_bool_literal};
pub use error::BindError;
pub use key::split_key;
pub use sources::{form_tree, header_tree, multipart_tree, path_tree, query_tree};
pub use tree::ValueNode;
