//! The binding pipeline: tree construction, coercion, and the strict
//! structural transfer into a concrete typed instance.
//!
//! Every source goes through the same three steps, and the final transfer
//! uses the same strict decoder as JSON bodies, so a wrong-typed leaf
//! produces the identical error no matter which source carried it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use eidos_schema::{Describe, TypeRef};

use crate::coerce::coerce;
use crate::error::BindError;
use crate::sources::{form_tree, header_tree, multipart_tree, path_tree, query_tree};
use crate::tree::ValueNode;

/// Transfers a coerced value into a concrete instance via the strict
/// structural decoder. The decode error, if any, is propagated verbatim.
pub fn transfer<T: DeserializeOwned>(value: Value) -> Result<T, BindError> {
    Ok(serde_json::from_value(value)?)
}

/// Coerces a value tree toward `T` and transfers it.
pub fn bind_tree<T>(tree: &ValueNode) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
{
    tracing::trace!(target_type = std::any::type_name::<T>(), "binding value tree");
    transfer(coerce(tree, TypeRef::of::<T>()))
}

/// Binds matched route segments into `T`.
pub fn bind_path<T, I, K, V>(params: I) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_tree(&path_tree(params))
}

/// Binds ordered query-string pairs into `T`.
pub fn bind_query<T, I, K, V>(pairs: I) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_tree(&query_tree(pairs))
}

/// Binds header pairs into `T`; only the first value per name contributes.
pub fn bind_headers<T, I, K, V>(headers: I) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_tree(&header_tree(headers))
}

/// Binds form fields into `T`.
pub fn bind_form<T, I, K, V>(pairs: I) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_tree(&form_tree(pairs))
}

/// Binds multipart form data into `T`: text fields plus `(key, file count)`
/// entries for uploaded files.
pub fn bind_multipart<T, I, K, V, F, N>(fields: I, files: F) -> Result<T, BindError>
where
    T: Describe + DeserializeOwned,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    F: IntoIterator<Item = (N, usize)>,
    N: AsRef<str>,
{
    bind_tree(&multipart_tree(fields, files))
}

/// Decodes a JSON body into `T` with the same strict decoder the other
/// sources transfer through.
pub fn bind_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, BindError> {
    Ok(serde_json::from_slice(body)?)
}
