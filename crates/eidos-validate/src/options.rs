//! Per-type validation options and hooks.
//!
//! Types participate in validation through a capability set probed by
//! `TypeId`: options tuning the structural walk, a full-validation hook
//! that replaces it, and a post-validation hook that runs after it. The
//! [`TypeRegistry`] is the standard provider; it is registered before any
//! validation runs and read concurrently afterwards.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use eidos_schema::{Describe, TypeRef};

use crate::validate::Validator;

/// Options for validating a particular type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Skip all validation for the type.
    pub skip: bool,
    /// Check the string representation against the schema's named format.
    pub enforce_format: bool,
    /// Fail when a deprecated schema receives a non-default value.
    pub fail_deprecated: bool,
}

/// A validation hook: receives the value being validated and the cursor,
/// and appends failures to the cursor's shared list.
pub type ValidationHook = Arc<dyn Fn(&Value, &mut Validator) + Send + Sync>;

/// Supplies per-type options and hooks to the validator.
pub trait ValidationProvider: Send + Sync {
    /// Options for the given type. Defaults to all-off.
    fn options(&self, type_id: TypeId) -> ValidationOptions {
        let _ = type_id;
        ValidationOptions::default()
    }

    /// A hook that handles all validation for the type, short-circuiting
    /// the structural walk.
    fn full_validate(&self, type_id: TypeId) -> Option<ValidationHook> {
        let _ = type_id;
        None
    }

    /// A hook that runs after the structural walk, appending to the same
    /// failure list.
    fn post_validate(&self, type_id: TypeId) -> Option<ValidationHook> {
        let _ = type_id;
        None
    }
}

/// A provider with no options and no hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOptions;

impl ValidationProvider for NoOptions {}

/// The standard provider: a concurrent registry of options and hooks keyed
/// by type.
#[derive(Default)]
pub struct TypeRegistry {
    options: DashMap<TypeId, ValidationOptions>,
    full: DashMap<TypeId, ValidationHook>,
    post: DashMap<TypeId, ValidationHook>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options for `T`.
    pub fn set_options<T: Describe>(&self, options: ValidationOptions) {
        self.options.insert(TypeRef::of::<T>().id(), options);
    }

    /// Registers a full-validation hook for `T`.
    pub fn on_full_validate<T, F>(&self, hook: F)
    where
        T: Describe,
        F: Fn(&Value, &mut Validator) + Send + Sync + 'static,
    {
        self.full.insert(TypeRef::of::<T>().id(), Arc::new(hook));
    }

    /// Registers a post-validation hook for `T`.
    pub fn on_post_validate<T, F>(&self, hook: F)
    where
        T: Describe,
        F: Fn(&Value, &mut Validator) + Send + Sync + 'static,
    {
        self.post.insert(TypeRef::of::<T>().id(), Arc::new(hook));
    }
}

impl ValidationProvider for TypeRegistry {
    fn options(&self, type_id: TypeId) -> ValidationOptions {
        self.options
            .get(&type_id)
            .map(|entry| *entry.value())
            .unwrap_or_default()
    }

    fn full_validate(&self, type_id: TypeId) -> Option<ValidationHook> {
        self.full.get(&type_id).map(|entry| Arc::clone(entry.value()))
    }

    fn post_validate(&self, type_id: TypeId) -> Option<ValidationHook> {
        self.post.get(&type_id).map(|entry| Arc::clone(entry.value()))
    }
}
