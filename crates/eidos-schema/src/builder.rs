//! Schema derivation from type descriptors.
//!
//! The [`SchemaBuilder`] converts descriptors into [`Schema`] nodes,
//! promoting struct-like and custom-named types to named schemas that are
//! referenced wherever they recur. Promotion registers a placeholder
//! *before* recursing into fields, so self-referential types resolve to a
//! reference instead of recursing forever.
//!
//! Building is idempotent: repeated builds for the same type return the
//! registered node. The internal registries are concurrent maps, so a
//! builder can be shared across request handlers; racing first builds do
//! duplicate work but produce structurally identical results.

use std::any::TypeId;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use indexmap::IndexMap;

use crate::annotation::apply_annotations;
use crate::descriptor::{
    descriptor_of, Describe, DescriptorKind, FieldDescriptor, ScalarKind, TypeDescriptor, TypeRef,
};
use crate::schema::{AdditionalProperties, Schema, SchemaResolver, SchemaType};

/// Builds and registers schemas for described types.
pub struct SchemaBuilder {
    nullable_is_optional: bool,
    optional_is_nullable: bool,
    full: DashMap<TypeId, Schema>,
    base: DashMap<TypeId, Schema>,
    registry: DashMap<TypeId, Schema>,
    names: DashMap<String, TypeId>,
    collisions: DashMap<TypeId, String>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nullable_is_optional: false,
            optional_is_nullable: false,
            full: DashMap::new(),
            base: DashMap::new(),
            registry: DashMap::new(),
            names: DashMap::new(),
            collisions: DashMap::new(),
        }
    }

    /// When set, a nullable field is also treated as optional (dropped from
    /// the `required` list).
    #[must_use]
    pub fn nullable_is_optional(mut self, enabled: bool) -> Self {
        self.nullable_is_optional = enabled;
        self
    }

    /// When set, an optional field also accepts `null`.
    #[must_use]
    pub fn optional_is_nullable(mut self, enabled: bool) -> Self {
        self.optional_is_nullable = enabled;
        self
    }

    /// Registers a complete schema for `T`, used verbatim without
    /// introspection. Register overrides before any building is done.
    pub fn set_full_schema<T: Describe>(&self, schema: Schema) {
        self.full.insert(TypeRef::of::<T>().id(), schema);
    }

    /// Registers starting schema values for `T`; introspection fills in only
    /// the keywords the override leaves unset. Register overrides before any
    /// building is done.
    pub fn set_base_schema<T: Describe>(&self, schema: Schema) {
        self.base.insert(TypeRef::of::<T>().id(), schema);
    }

    /// Gets or builds the schema for `T`. Returns `None` for types with no
    /// wire representation, which signals callers to drop the field.
    pub fn build<T: Describe>(&self) -> Option<Schema> {
        self.build_ref(TypeRef::of::<T>())
    }

    /// Gets or builds the schema for a type handle.
    pub fn build_ref(&self, tref: TypeRef) -> Option<Schema> {
        if let Some(registered) = self.registry.get(&tref.id()) {
            return Some(registered.clone());
        }
        self.build_schema(tref, true)
    }

    /// Named schemas registered so far, keyed by schema name, sorted for
    /// deterministic export. Consumed by document assemblers.
    #[must_use]
    pub fn named_schemas(&self) -> IndexMap<String, Schema> {
        let mut entries: Vec<(String, Schema)> = self
            .names
            .iter()
            .filter_map(|entry| {
                self.registry
                    .get(entry.value())
                    .map(|schema| (entry.key().clone(), schema.clone()))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().collect()
    }

    /// Schemas whose fully-qualified fallback name also collided. They are
    /// excluded from [`named_schemas`](Self::named_schemas) rather than
    /// overwriting a prior registration.
    #[must_use]
    pub fn collisions(&self) -> Vec<(String, Schema)> {
        let mut entries: Vec<(String, Schema)> = self
            .collisions
            .iter()
            .filter_map(|entry| {
                self.registry
                    .get(entry.key())
                    .map(|schema| (entry.value().clone(), schema.clone()))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn build_schema(&self, tref: TypeRef, register: bool) -> Option<Schema> {
        let desc = descriptor_of(tref);

        // An optional wrapper resolves to the pointee's schema wrapped in a
        // nullable combinator.
        if let DescriptorKind::Optional(inner) = desc.kind() {
            let pointee = self.build_ref(*inner)?;
            return Some(self.make_nullable(&pointee));
        }

        let mut schema = Schema::default();
        let mut is_defined =
            matches!(desc.kind(), DescriptorKind::Struct(_)) || desc.custom_name().is_some();
        let mut continue_defining = true;

        if let Some(full) = self.full.get(&desc.id()) {
            schema = full.clone();
            continue_defining = false;
        } else if let Some(base) = self.base.get(&desc.id()) {
            schema = base.clone();
        } else if let Some(full) = desc.full_schema() {
            schema = full.clone();
            is_defined = true;
            continue_defining = false;
        } else if let Some(base) = desc.base_schema() {
            schema = base.clone();
            is_defined = true;
        }

        // Kinds with no wire representation yield no schema unless a full
        // override was supplied.
        if continue_defining && matches!(desc.kind(), DescriptorKind::Unsupported) {
            return None;
        }

        // Promote before recursing into fields so self references resolve to
        // the registered name.
        if is_defined && register {
            self.promote(&desc, &mut schema);
        }

        if !continue_defining {
            return Some(schema);
        }

        if schema.enum_values.is_empty() {
            if let Some(values) = desc.enum_values() {
                schema.enum_values = values.to_vec();
            }
        }
        if schema.example.is_none() {
            schema.example = desc.example().cloned();
        }
        if schema.description.is_none() {
            schema.description = desc.description().map(str::to_owned);
        }

        // Introspected values fill in only what overrides left unset.
        match desc.kind() {
            DescriptorKind::Scalar(kind) => {
                if schema.schema_type.is_none() {
                    schema.schema_type = Some(match kind {
                        ScalarKind::String => SchemaType::String,
                        ScalarKind::Integer => SchemaType::Integer,
                        ScalarKind::Float => SchemaType::Number,
                        ScalarKind::Boolean => SchemaType::Boolean,
                    });
                }
            }
            DescriptorKind::Any | DescriptorKind::Optional(_) | DescriptorKind::Unsupported => {}
            DescriptorKind::FixedList(element, len) => {
                if schema.schema_type.is_none() {
                    schema.schema_type = Some(SchemaType::Array);
                }
                if schema.min_items.is_none() {
                    schema.min_items = Some(*len as u64);
                }
                if schema.max_items.is_none() {
                    schema.max_items = Some(*len as u64);
                }
                if schema.items.is_none() {
                    if let Some(element_schema) = self.build_ref(*element) {
                        schema.items = Some(Box::new(element_schema.as_reference()));
                    }
                }
            }
            DescriptorKind::List(element) => {
                if schema.schema_type.is_none() {
                    schema.schema_type = Some(SchemaType::Array);
                }
                if schema.items.is_none() {
                    if let Some(element_schema) = self.build_ref(*element) {
                        schema.items = Some(Box::new(element_schema.as_reference()));
                    }
                }
            }
            DescriptorKind::Map(values) => {
                if schema.schema_type.is_none() {
                    schema.schema_type = Some(SchemaType::Object);
                }
                if schema.additional_properties.is_none() {
                    if let Some(value_schema) = self.build_ref(*values) {
                        schema.additional_properties = Some(AdditionalProperties::Schema(
                            Box::new(value_schema.as_reference()),
                        ));
                    }
                }
            }
            DescriptorKind::Struct(fields) => {
                if schema.schema_type.is_none() {
                    schema.schema_type = Some(SchemaType::Object);
                }
                // Explicitly overridden properties are kept as given.
                if schema.properties.is_empty() {
                    if schema.additional_properties.is_none() {
                        schema.additional_properties = Some(AdditionalProperties::Allowed(false));
                    }
                    self.add_properties(&mut schema, false, fields);
                }
            }
        }

        // Replace the placeholder with the completed schema.
        if is_defined && register {
            self.registry.insert(desc.id(), schema.clone());
        }

        Some(schema)
    }

    fn promote(&self, desc: &TypeDescriptor, schema: &mut Schema) {
        let short = fix_name(desc.short_name());
        let name = match self.claim(&short, desc.id()) {
            Some(name) => name,
            None => {
                let qualified = fix_name(desc.type_name());
                match self.claim(&qualified, desc.id()) {
                    Some(name) => name,
                    None => {
                        tracing::warn!(
                            type_name = desc.type_name(),
                            name = %qualified,
                            "schema name collision, excluding from named schemas"
                        );
                        self.collisions.insert(desc.id(), qualified.clone());
                        qualified
                    }
                }
            }
        };

        tracing::debug!(type_name = desc.type_name(), name = %name, "promoted schema");
        schema.named = Some(name);
        self.registry.insert(desc.id(), schema.clone());
    }

    /// Claims `name` for the given type. Returns `None` when a different
    /// type already holds the name.
    fn claim(&self, name: &str, id: TypeId) -> Option<String> {
        match self.names.entry(name.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(id);
                Some(name.to_owned())
            }
            Entry::Occupied(existing) if *existing.get() == id => Some(name.to_owned()),
            Entry::Occupied(_) => None,
        }
    }

    /// Wraps a schema in its nullable form. A named schema cannot be mutated
    /// in place without corrupting other referents, so it is wrapped as
    /// `oneOf(reference, null)`; an inline schema gets the nullable flag.
    fn make_nullable(&self, schema: &Schema) -> Schema {
        if schema.name().is_some() {
            return Schema {
                one_of: vec![schema.as_reference(), Schema::null()],
                ..Default::default()
            };
        }
        if schema.all_of.len() == 1 {
            let mut wrapped = schema.clone();
            if let Some(inner) = wrapped.all_of.pop() {
                wrapped.one_of = vec![inner, Schema::null()];
            }
            return wrapped;
        }
        let mut wrapped = schema.clone();
        wrapped.nullable = true;
        wrapped
    }

    fn add_properties(
        &self,
        object: &mut Schema,
        parent_optional: bool,
        fields: &[FieldDescriptor],
    ) {
        for field in fields {
            if field.is_skipped() {
                continue;
            }
            let field_optional = field.is_optional() || parent_optional;

            // Embedded fields splice their properties into the parent at the
            // same nesting level.
            if field.is_embedded() {
                let nested = descriptor_of(field.value());
                if let DescriptorKind::Struct(inner) = nested.kind() {
                    self.add_properties(object, field_optional, inner);
                }
                continue;
            }

            let Some(mut property) = self.build_ref(field.value()) else {
                continue;
            };

            let mut optional = field_optional;
            let mut nullable = property.is_nullable();
            if optional && self.optional_is_nullable {
                nullable = true;
            }
            if nullable && self.nullable_is_optional {
                optional = true;
            }
            if nullable && !property.is_nullable() {
                property = self.make_nullable(&property);
            }

            if let Some(annotation) = field.annotation() {
                // A named schema is wrapped so the options apply to the
                // wrapper, not the shared registration.
                if property.name().is_some() {
                    property = Schema {
                        all_of: vec![property.as_reference()],
                        ..Default::default()
                    };
                }
                apply_annotations(&mut property, annotation);
            }

            object
                .properties
                .insert(field.wire_name().to_owned(), property.as_reference());

            if !optional {
                object.required.push(field.wire_name().to_owned());
            }
        }
    }
}

impl SchemaResolver for SchemaBuilder {
    fn resolve(&self, name: &str) -> Option<Schema> {
        let id = *self.names.get(name)?;
        self.registry.get(&id).map(|schema| schema.clone())
    }
}

/// Normalizes a name for schema registration: non-word runs split the name
/// into parts, each part is capitalized, and the parts are concatenated.
#[must_use]
pub fn fix_name(name: &str) -> String {
    let mut fixed = String::new();
    for part in name.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-')) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            fixed.extend(first.to_uppercase());
            fixed.push_str(chars.as_str());
        }
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;
    use serde_json::json;

    #[test]
    fn test_fix_name() {
        assert_eq!(fix_name("User"), "User");
        assert_eq!(fix_name("my_crate::api::User"), "My_crateApiUser");
        assert_eq!(fix_name("Vec<u32>"), "VecU32");
        assert_eq!(fix_name(""), "");
    }

    #[test]
    fn test_scalar_schemas() {
        let builder = SchemaBuilder::new();
        assert_eq!(
            builder.build::<i64>().unwrap().schema_type,
            Some(SchemaType::Integer)
        );
        assert_eq!(
            builder.build::<f64>().unwrap().schema_type,
            Some(SchemaType::Number)
        );
        assert_eq!(
            builder.build::<String>().unwrap().schema_type,
            Some(SchemaType::String)
        );
        assert_eq!(
            builder.build::<bool>().unwrap().schema_type,
            Some(SchemaType::Boolean)
        );
    }

    #[test]
    fn test_list_schema() {
        let builder = SchemaBuilder::new();
        let schema = builder.build::<Vec<i64>>().unwrap();
        assert_eq!(schema.schema_type, Some(SchemaType::Array));
        assert_eq!(
            schema.items.as_deref().and_then(|s| s.schema_type),
            Some(SchemaType::Integer)
        );
    }

    #[test]
    fn test_fixed_list_pins_bounds() {
        let builder = SchemaBuilder::new();
        let schema = builder.build::<[bool; 4]>().unwrap();
        assert_eq!(schema.min_items, Some(4));
        assert_eq!(schema.max_items, Some(4));
    }

    #[test]
    fn test_map_schema() {
        let builder = SchemaBuilder::new();
        let schema = builder
            .build::<std::collections::HashMap<String, i64>>()
            .unwrap();
        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        let values = schema
            .additional_properties
            .as_ref()
            .and_then(AdditionalProperties::schema)
            .expect("value schema");
        assert_eq!(values.schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_struct_promotion_and_properties() {
        struct Account {
            _id: u64,
            _email: String,
        }
        impl Describe for Account {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::new("_id", "id", TypeRef::of::<u64>()),
                    FieldDescriptor::new("_email", "email", TypeRef::of::<String>()),
                ])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Account>().unwrap();

        assert_eq!(schema.name(), Some("Account"));
        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(
            schema.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        );
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(
            schema.properties["id"].schema_type,
            Some(SchemaType::Integer)
        );
        assert_eq!(schema.required, vec!["id", "email"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        struct Widget;
        impl Describe for Widget {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "size",
                    "size",
                    TypeRef::of::<u32>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        let first = builder.build::<Widget>().unwrap();
        let second = builder.build::<Widget>().unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.named_schemas().len(), 1);
    }

    #[test]
    fn test_optional_scalar_field_sets_inline_nullable() {
        struct Filters {
            _limit: Option<u32>,
        }
        impl Describe for Filters {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "_limit",
                    "limit",
                    TypeRef::of::<Option<u32>>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Filters>().unwrap();
        let limit = &schema.properties["limit"];
        assert!(limit.nullable);
        assert!(limit.one_of.is_empty());
        assert_eq!(limit.schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_optional_named_field_uses_one_of_combinator() {
        struct Address;
        impl Describe for Address {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "city",
                    "city",
                    TypeRef::of::<String>(),
                )])
            }
        }
        struct Customer {
            _home: Option<Address>,
        }
        impl Describe for Customer {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "_home",
                    "home",
                    TypeRef::of::<Option<Address>>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Customer>().unwrap();
        let home = &schema.properties["home"];
        assert!(!home.nullable);
        assert_eq!(home.one_of.len(), 2);
        assert_eq!(
            home.one_of[0].reference.as_deref(),
            Some("#/components/schemas/Address")
        );
        assert_eq!(home.one_of[1].schema_type, Some(SchemaType::Null));
    }

    #[test]
    fn test_self_referential_type_builds_finite_schema() {
        struct TreeNode {
            _label: String,
            _child: Option<Box<TreeNode>>,
        }
        impl Describe for TreeNode {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::new("_label", "label", TypeRef::of::<String>()),
                    FieldDescriptor::new(
                        "_child",
                        "child,omitempty",
                        TypeRef::of::<Option<Box<TreeNode>>>(),
                    ),
                ])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<TreeNode>().unwrap();

        let child = &schema.properties["child"];
        assert_eq!(
            child.one_of[0].reference.as_deref(),
            Some("#/components/schemas/TreeNode")
        );
        assert_eq!(child.one_of[1].schema_type, Some(SchemaType::Null));
        assert_eq!(schema.required, vec!["label"]);
    }

    #[test]
    fn test_named_struct_property_stored_as_reference() {
        struct Item;
        impl Describe for Item {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "sku",
                    "sku",
                    TypeRef::of::<String>(),
                )])
            }
        }
        struct Cart {
            _first: Item,
        }
        impl Describe for Cart {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "_first",
                    "first",
                    TypeRef::of::<Item>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Cart>().unwrap();
        assert_eq!(
            schema.properties["first"].reference.as_deref(),
            Some("#/components/schemas/Item")
        );
    }

    #[test]
    fn test_embedded_fields_splice_into_parent() {
        struct Timestamps;
        impl Describe for Timestamps {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::new("created", "created", TypeRef::of::<String>()),
                    FieldDescriptor::new("updated", "updated,omitempty", TypeRef::of::<String>()),
                ])
            }
        }
        struct Post;
        impl Describe for Post {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::embed("Timestamps", TypeRef::of::<Timestamps>()),
                    FieldDescriptor::new("title", "title", TypeRef::of::<String>()),
                ])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Post>().unwrap();

        assert!(schema.properties.contains_key("created"));
        assert!(schema.properties.contains_key("updated"));
        assert!(schema.properties.contains_key("title"));
        assert_eq!(schema.required, vec!["created", "title"]);
    }

    #[test]
    fn test_skip_marked_field_omitted() {
        struct Credentials;
        impl Describe for Credentials {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::new("user", "user", TypeRef::of::<String>()),
                    FieldDescriptor::new("password", "-", TypeRef::of::<String>()),
                ])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Credentials>().unwrap();
        assert_eq!(schema.properties.len(), 1);
        assert!(!schema.properties.contains_key("password"));
    }

    #[test]
    fn test_unsupported_field_dropped_without_error() {
        struct Callback;
        impl Describe for Callback {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::unsupported::<Self>()
            }
        }
        struct Handler;
        impl Describe for Handler {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![
                    FieldDescriptor::new("name", "name", TypeRef::of::<String>()),
                    FieldDescriptor::new("on_change", "onChange", TypeRef::of::<Callback>()),
                ])
            }
        }

        let builder = SchemaBuilder::new();
        assert!(builder.build::<Callback>().is_none());

        let schema = builder.build::<Handler>().unwrap();
        assert_eq!(schema.properties.len(), 1);
        assert!(!schema.properties.contains_key("onChange"));
    }

    #[test]
    fn test_annotation_overrides_property_schema() {
        struct Signup;
        impl Describe for Signup {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "age",
                    "age",
                    TypeRef::of::<u32>(),
                )
                .with_annotation("minimum=13,maximum=120,desc=Age in years")])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Signup>().unwrap();
        let age = &schema.properties["age"];
        assert_eq!(age.minimum, Some(13.0));
        assert_eq!(age.maximum, Some(120.0));
        assert_eq!(age.description.as_deref(), Some("Age in years"));
    }

    #[test]
    fn test_annotation_on_named_property_wraps_reference() {
        struct Money;
        impl Describe for Money {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "cents",
                    "cents",
                    TypeRef::of::<i64>(),
                )])
            }
        }
        struct Invoice;
        impl Describe for Invoice {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "total",
                    "total",
                    TypeRef::of::<Money>(),
                )
                .with_annotation("desc=Grand total")])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Invoice>().unwrap();
        let total = &schema.properties["total"];
        assert_eq!(total.all_of.len(), 1);
        assert_eq!(
            total.all_of[0].reference.as_deref(),
            Some("#/components/schemas/Money")
        );
        assert_eq!(total.description.as_deref(), Some("Grand total"));
    }

    #[test]
    fn test_nullable_is_optional_coupling() {
        struct Patch;
        impl Describe for Patch {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "note",
                    "note",
                    TypeRef::of::<Option<String>>(),
                )])
            }
        }

        let strict = SchemaBuilder::new();
        let schema = strict.build::<Patch>().unwrap();
        assert_eq!(schema.required, vec!["note"]);

        let coupled = SchemaBuilder::new().nullable_is_optional(true);
        let schema = coupled.build::<Patch>().unwrap();
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_optional_is_nullable_coupling() {
        struct Draft;
        impl Describe for Draft {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "tag",
                    "tag,omitempty",
                    TypeRef::of::<String>(),
                )])
            }
        }

        let coupled = SchemaBuilder::new().optional_is_nullable(true);
        let schema = coupled.build::<Draft>().unwrap();
        assert!(schema.properties["tag"].nullable);
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_full_schema_override_used_verbatim() {
        struct Opaque;
        impl Describe for Opaque {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "ignored",
                    "ignored",
                    TypeRef::of::<String>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        builder.set_full_schema::<Opaque>(Schema::string());

        let schema = builder.build::<Opaque>().unwrap();
        assert_eq!(schema.schema_type, Some(SchemaType::String));
        assert!(schema.properties.is_empty());
    }

    #[test]
    fn test_base_schema_values_win_over_introspection() {
        struct Count;
        impl Describe for Count {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::scalar::<Self>(ScalarKind::Integer).with_name("Count")
            }
        }

        let builder = SchemaBuilder::new();
        builder.set_base_schema::<Count>(Schema {
            description: Some("How many".to_owned()),
            minimum: Some(0.0),
            ..Default::default()
        });

        let schema = builder.build::<Count>().unwrap();
        assert_eq!(schema.description.as_deref(), Some("How many"));
        assert_eq!(schema.minimum, Some(0.0));
        // Introspection still fills the unset type keyword.
        assert_eq!(schema.schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_type_level_capabilities() {
        struct Status;
        impl Describe for Status {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::scalar::<Self>(ScalarKind::String)
                    .with_name("Status")
                    .with_description("Lifecycle state")
                    .with_enum(vec![json!("active"), json!("disabled")])
            }
        }

        let builder = SchemaBuilder::new();
        let schema = builder.build::<Status>().unwrap();
        assert_eq!(schema.name(), Some("Status"));
        assert_eq!(schema.description.as_deref(), Some("Lifecycle state"));
        assert_eq!(schema.enum_values, vec![json!("active"), json!("disabled")]);
    }

    #[test]
    fn test_name_collision_falls_back_to_qualified_name() {
        mod first {
            use super::*;
            pub struct Event;
            impl Describe for Event {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::structure::<Self>(Vec::new())
                }
            }
        }
        mod second {
            use super::*;
            pub struct Event;
            impl Describe for Event {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::structure::<Self>(Vec::new())
                }
            }
        }

        let builder = SchemaBuilder::new();
        let a = builder.build::<first::Event>().unwrap();
        let b = builder.build::<second::Event>().unwrap();

        assert_eq!(a.name(), Some("Event"));
        let qualified = b.name().expect("qualified name");
        assert_ne!(qualified, "Event");
        assert!(qualified.ends_with("Event"));

        let named = builder.named_schemas();
        assert!(named.contains_key("Event"));
        assert!(named.contains_key(qualified));
        assert!(builder.collisions().is_empty());
    }

    #[test]
    fn test_resolver_resolves_registered_names() {
        struct Profile;
        impl Describe for Profile {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::structure::<Self>(vec![FieldDescriptor::new(
                    "bio",
                    "bio",
                    TypeRef::of::<String>(),
                )])
            }
        }

        let builder = SchemaBuilder::new();
        builder.build::<Profile>();

        let resolved = builder.resolve("Profile").expect("registered schema");
        assert!(resolved.properties.contains_key("bio"));
        assert!(builder.resolve("Unknown").is_none());
    }
}
