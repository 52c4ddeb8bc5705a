//! Type descriptors and the process-wide descriptor cache.
//!
//! A [`TypeDescriptor`] captures the structural facts about a data type that
//! schema derivation and value binding need: its kind (scalar, list, map,
//! struct, ...), its fields with their wire names, and the optional
//! capability values a type can expose (custom name, description, enum
//! values, example, base or full schema).
//!
//! Descriptors are supplied by the [`Describe`] trait. Field descriptors
//! refer to other types through lazy [`TypeRef`] handles, so descriptor
//! graphs with cycles stay finite. Built descriptors are memoized for the
//! process lifetime in a concurrent cache; duplicate population under
//! concurrency is benign since two builds of the same type are structurally
//! identical.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use serde_json::Value;

use crate::Schema;

/// A cheap, copyable handle to a describable type.
///
/// Carries the type's identity and a thunk producing its descriptor. The
/// thunk is only invoked through [`descriptor_of`], never at handle
/// construction, which is what keeps self-referential types finite.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    describe: fn() -> TypeDescriptor,
}

impl TypeRef {
    /// Returns the handle for `T`.
    #[must_use]
    pub fn of<T: Describe>() -> Self {
        T::type_ref()
    }

    /// The identity of the described type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl std::hash::Hash for TypeRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.id).finish()
    }
}

/// The scalar leaf kinds a wire value can be coerced toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// UTF-8 text.
    String,
    /// Whole numbers, signed or unsigned.
    Integer,
    /// Floating point numbers.
    Float,
    /// Booleans.
    Boolean,
}

/// The structural shape of a described type.
#[derive(Debug, Clone)]
pub enum DescriptorKind {
    /// A scalar leaf.
    Scalar(ScalarKind),
    /// An optional wrapper around another type (`Option<T>`).
    Optional(TypeRef),
    /// A growable sequence (`Vec<T>`).
    List(TypeRef),
    /// A fixed-length sequence (`[T; N]`).
    FixedList(TypeRef, usize),
    /// A string-keyed map with homogeneous values.
    Map(TypeRef),
    /// A struct with named fields.
    Struct(Vec<FieldDescriptor>),
    /// A type with no structural information (dynamic values).
    Any,
    /// A type that cannot be represented on the wire. Yields no schema,
    /// which signals callers to drop the field rather than fail.
    Unsupported,
}

/// Structural facts about a single type, built once and cached.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    type_name: &'static str,
    custom_name: Option<&'static str>,
    description: Option<&'static str>,
    enum_values: Option<Vec<Value>>,
    example: Option<Value>,
    base_schema: Option<Schema>,
    full_schema: Option<Schema>,
    kind: DescriptorKind,
}

impl TypeDescriptor {
    fn new<T: 'static>(kind: DescriptorKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            custom_name: None,
            description: None,
            enum_values: None,
            example: None,
            base_schema: None,
            full_schema: None,
            kind,
        }
    }

    /// A scalar descriptor for `T`.
    #[must_use]
    pub fn scalar<T: 'static>(kind: ScalarKind) -> Self {
        Self::new::<T>(DescriptorKind::Scalar(kind))
    }

    /// An optional-wrapper descriptor for `T`.
    #[must_use]
    pub fn optional<T: 'static>(inner: TypeRef) -> Self {
        Self::new::<T>(DescriptorKind::Optional(inner))
    }

    /// A list descriptor for `T`.
    #[must_use]
    pub fn list<T: 'static>(element: TypeRef) -> Self {
        Self::new::<T>(DescriptorKind::List(element))
    }

    /// A fixed-length list descriptor for `T`.
    #[must_use]
    pub fn fixed_list<T: 'static>(element: TypeRef, len: usize) -> Self {
        Self::new::<T>(DescriptorKind::FixedList(element, len))
    }

    /// A string-keyed map descriptor for `T`.
    #[must_use]
    pub fn map<T: 'static>(values: TypeRef) -> Self {
        Self::new::<T>(DescriptorKind::Map(values))
    }

    /// A struct descriptor for `T` with the given fields, in declaration
    /// order.
    #[must_use]
    pub fn structure<T: 'static>(fields: Vec<FieldDescriptor>) -> Self {
        Self::new::<T>(DescriptorKind::Struct(fields))
    }

    /// A descriptor for a dynamically shaped type.
    #[must_use]
    pub fn any<T: 'static>() -> Self {
        Self::new::<T>(DescriptorKind::Any)
    }

    /// A descriptor for a type with no wire representation.
    #[must_use]
    pub fn unsupported<T: 'static>() -> Self {
        Self::new::<T>(DescriptorKind::Unsupported)
    }

    /// Registers a custom schema name. Custom-named types are promoted to
    /// named schemas even when they are not structs.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.custom_name = Some(name);
        self
    }

    /// Attaches a type-level description.
    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Restricts the type to a fixed set of values.
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Attaches an example value.
    #[must_use]
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Supplies starting schema values that introspection builds on.
    #[must_use]
    pub fn with_base_schema(mut self, schema: Schema) -> Self {
        self.base_schema = Some(schema);
        self
    }

    /// Supplies the complete schema; introspection is skipped entirely.
    #[must_use]
    pub fn with_full_schema(mut self, schema: Schema) -> Self {
        self.full_schema = Some(schema);
        self
    }

    /// The identity of the described type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full Rust path of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The custom schema name, if one was registered.
    #[must_use]
    pub fn custom_name(&self) -> Option<&'static str> {
        self.custom_name
    }

    /// The type-level description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        self.description
    }

    /// The fixed value set, if any.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    /// The example value, if any.
    #[must_use]
    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    /// The type-level base schema, if any.
    #[must_use]
    pub fn base_schema(&self) -> Option<&Schema> {
        self.base_schema.as_ref()
    }

    /// The type-level full schema, if any.
    #[must_use]
    pub fn full_schema(&self) -> Option<&Schema> {
        self.full_schema.as_ref()
    }

    /// The structural shape.
    #[must_use]
    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    /// The unqualified name used when the type is promoted: the custom name
    /// when present, the last path segment of the Rust type name otherwise.
    #[must_use]
    pub fn short_name(&self) -> &str {
        if let Some(name) = self.custom_name {
            return name;
        }
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }
}

/// A single struct field: declared name, parsed wire marker, optional
/// schema annotation, embedding flag, and the field type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    wire_name: String,
    optional: bool,
    skip: bool,
    embedded: bool,
    annotation: Option<&'static str>,
    value: TypeRef,
}

impl FieldDescriptor {
    /// Creates a field from its declared name and wire marker.
    ///
    /// The marker follows the serialization convention: its first
    /// comma-separated token is the wire name (`-` omits the field, an empty
    /// token keeps the declared name), and a second token equal to
    /// `omitempty` (case-insensitive) marks the field optional.
    #[must_use]
    pub fn new(name: &'static str, marker: &str, value: TypeRef) -> Self {
        let (wire_name, optional, skip) = parse_wire_marker(name, marker);
        Self {
            name,
            wire_name,
            optional,
            skip,
            embedded: false,
            annotation: None,
            value,
        }
    }

    /// Creates an embedded field whose properties are spliced into the
    /// parent object at the same nesting level.
    #[must_use]
    pub fn embed(name: &'static str, value: TypeRef) -> Self {
        Self {
            name,
            wire_name: name.to_owned(),
            optional: false,
            skip: false,
            embedded: true,
            annotation: None,
            value,
        }
    }

    /// Attaches a schema annotation (`key=value[,key=value]` mini-language).
    #[must_use]
    pub fn with_annotation(mut self, annotation: &'static str) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// The declared field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wire name derived from the marker.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// Whether the field is optional (wire marker `omitempty`).
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the field is omitted from the wire entirely.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Whether the field is embedded.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// The schema annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&'static str> {
        self.annotation
    }

    /// The field's type handle.
    #[must_use]
    pub fn value(&self) -> TypeRef {
        self.value
    }
}

/// Parses a wire marker into `(wire name, optional, skip)`.
#[must_use]
pub fn parse_wire_marker(name: &str, marker: &str) -> (String, bool, bool) {
    let mut tokens = marker.split(',');
    let first = tokens.next().unwrap_or("");
    let optional = tokens
        .next()
        .is_some_and(|t| t.eq_ignore_ascii_case("omitempty"));

    let skip = first == "-";
    let wire_name = if first.is_empty() || skip {
        name.to_owned()
    } else {
        first.to_owned()
    };

    (wire_name, optional, skip)
}

/// Finds a struct field by wire name, case-insensitively, descending into
/// embedded fields. Returns the declared wire name and the field type.
#[must_use]
pub fn find_struct_field(fields: &[FieldDescriptor], key: &str) -> Option<(String, TypeRef)> {
    for field in fields {
        if field.is_skipped() {
            continue;
        }
        if field.is_embedded() {
            let nested = descriptor_of(field.value());
            if let DescriptorKind::Struct(inner) = nested.kind() {
                if let Some(hit) = find_struct_field(inner, key) {
                    return Some(hit);
                }
            }
            continue;
        }
        if field.wire_name().eq_ignore_ascii_case(key) {
            return Some((field.wire_name().to_owned(), field.value()));
        }
    }
    None
}

/// Supplies the structural facts for a type.
///
/// Implemented for the common scalar, container, and wrapper types; struct
/// types implement it by listing their fields.
pub trait Describe: Sized + 'static {
    /// Builds the descriptor. Called at most a handful of times per process;
    /// results are cached by [`descriptor_of`].
    fn describe() -> TypeDescriptor;

    /// The lazy handle for this type. Transparent wrappers (such as `Box`)
    /// override this to forward to the wrapped type.
    #[must_use]
    fn type_ref() -> TypeRef {
        TypeRef {
            id: TypeId::of::<Self>(),
            describe: Self::describe,
        }
    }
}

static DESCRIPTORS: OnceLock<DashMap<TypeId, Arc<TypeDescriptor>>> = OnceLock::new();

/// Returns the cached descriptor for a type handle, building it on first
/// use. Concurrent first uses may build twice; the results are equivalent
/// and one wins the cache slot.
#[must_use]
pub fn descriptor_of(tref: TypeRef) -> Arc<TypeDescriptor> {
    let cache = DESCRIPTORS.get_or_init(DashMap::new);
    if let Some(found) = cache.get(&tref.id) {
        return Arc::clone(&found);
    }
    let built = Arc::new((tref.describe)());
    Arc::clone(cache.entry(tref.id).or_insert(built).value())
}

macro_rules! describe_scalar {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::scalar::<$ty>($kind)
                }
            }
        )+
    };
}

describe_scalar!(ScalarKind::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
describe_scalar!(ScalarKind::Float => f32, f64);
describe_scalar!(ScalarKind::Boolean => bool);
describe_scalar!(ScalarKind::String => String);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::optional::<Self>(TypeRef::of::<T>())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::list::<Self>(TypeRef::of::<T>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::fixed_list::<Self>(TypeRef::of::<T>(), N)
    }
}

impl<T: Describe> Describe for HashMap<String, T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Self>(TypeRef::of::<T>())
    }
}

impl<T: Describe> Describe for BTreeMap<String, T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Self>(TypeRef::of::<T>())
    }
}

impl<T: Describe> Describe for indexmap::IndexMap<String, T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Self>(TypeRef::of::<T>())
    }
}

// Box is a transparent wrapper: it has the wrapped type's identity, so
// descriptor caching and per-type registration see through it.
impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }

    fn type_ref() -> TypeRef {
        T::type_ref()
    }
}

impl Describe for Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::any::<Self>()
    }
}
