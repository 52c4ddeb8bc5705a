//! Binding error types.

use thiserror::Error;

/// Errors surfaced by the binding pipeline.
///
/// Coercion itself never fails; the only error source is the strict
/// structural decode shared with body decoding, and its error is passed
/// through unwrapped.
#[derive(Debug, Error)]
pub enum BindError {
    /// The strict decoder rejected the coerced value or body.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
