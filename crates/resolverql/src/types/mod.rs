//! Wire types.
//!
//! A [`WireType`] is a handle to a schema-level type: a named type
//! (scalar, object, input object, enum) optionally wrapped in list and
//! non-null layers. Named types are immutable and shared through `Arc`;
//! the four built-in scalars are process-wide singletons.
//!
//! Custom named types are converted to `async_graphql::dynamic` types when
//! the schema is built. Object fields resolve by key lookup in the parent
//! value, so resolvers simply return objects (maps) for object types.

mod registry;

pub use registry::TypeRegistry;

use std::fmt;
use std::sync::{Arc, LazyLock};

use async_graphql::Value;
use async_graphql::dynamic::{
    Enum, Field, FieldFuture, InputObject, InputValue, Object, Scalar, Type, TypeRef,
};

use crate::value::into_field_value;

/// Built-in scalar names, as understood by the GraphQL engine.
pub const BUILTIN_SCALARS: [&str; 4] = [
    TypeRef::STRING,
    TypeRef::INT,
    TypeRef::BOOLEAN,
    TypeRef::FLOAT,
];

static STRING: LazyLock<Arc<NamedType>> = LazyLock::new(|| NamedType::builtin(TypeRef::STRING));
static INT: LazyLock<Arc<NamedType>> = LazyLock::new(|| NamedType::builtin(TypeRef::INT));
static BOOLEAN: LazyLock<Arc<NamedType>> = LazyLock::new(|| NamedType::builtin(TypeRef::BOOLEAN));
static FLOAT: LazyLock<Arc<NamedType>> = LazyLock::new(|| NamedType::builtin(TypeRef::FLOAT));

/// A schema-level type reference.
#[derive(Debug, Clone)]
pub enum WireType {
    /// A named type.
    Named(Arc<NamedType>),
    /// A list of the inner type.
    List(Box<WireType>),
    /// A non-null wrapper around the inner type.
    NonNull(Box<WireType>),
}

impl WireType {
    /// The built-in `String` scalar.
    #[must_use]
    pub fn string() -> Self {
        Self::Named(Arc::clone(&STRING))
    }

    /// The built-in `Int` scalar.
    #[must_use]
    pub fn int() -> Self {
        Self::Named(Arc::clone(&INT))
    }

    /// The built-in `Boolean` scalar.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Named(Arc::clone(&BOOLEAN))
    }

    /// The built-in `Float` scalar.
    #[must_use]
    pub fn float() -> Self {
        Self::Named(Arc::clone(&FLOAT))
    }

    /// A by-name reference to a type defined elsewhere.
    ///
    /// Used for object fields that point at types which cannot be
    /// constructed first, e.g. self-referencing objects.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Named(Arc::new(NamedType {
            name: name.into(),
            description: None,
            kind: TypeKind::Reference,
        }))
    }

    /// Wraps this type in a list.
    #[must_use]
    pub fn list_of(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps this type in non-null. Already non-null types are returned as-is.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Strips one outer non-null layer, if any.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// Returns whether the outermost layer is non-null.
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns the innermost named type.
    #[must_use]
    pub fn base(&self) -> &Arc<NamedType> {
        match self {
            Self::Named(named) => named,
            Self::List(inner) | Self::NonNull(inner) => inner.base(),
        }
    }

    /// Name of the innermost named type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// Returns whether both handles point at the same named-type instance
    /// with identical wrapping.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) | (Self::NonNull(a), Self::NonNull(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Converts to an engine type reference.
    #[must_use]
    pub fn to_type_ref(&self) -> TypeRef {
        match self {
            Self::Named(named) => TypeRef::Named(named.name.clone().into()),
            Self::List(inner) => TypeRef::List(Box::new(inner.to_type_ref())),
            Self::NonNull(inner) => TypeRef::NonNull(Box::new(inner.to_type_ref())),
        }
    }
}

impl PartialEq for WireType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a.name == b.name,
            (Self::List(a), Self::List(b)) | (Self::NonNull(a), Self::NonNull(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for WireType {}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => write!(f, "{}", named.name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A named type definition.
#[derive(Debug)]
pub struct NamedType {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
}

/// What a named type is.
#[derive(Debug)]
pub enum TypeKind {
    Scalar,
    Object(Vec<ObjectField>),
    InputObject(Vec<InputField>),
    Enum(Vec<String>),
    /// Name-only reference; the definition lives elsewhere.
    Reference,
}

impl NamedType {
    fn builtin(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            description: None,
            kind: TypeKind::Scalar,
        })
    }

    /// Returns whether this is one of the engine's built-in scalars.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar) && BUILTIN_SCALARS.contains(&self.name.as_str())
    }

    /// Converts the definition to an engine type.
    ///
    /// Returns `None` for built-in scalars and name-only references, which
    /// the engine must not see as new definitions.
    #[must_use]
    pub fn to_dynamic(&self) -> Option<Type> {
        if self.is_builtin() {
            return None;
        }

        match &self.kind {
            TypeKind::Scalar => {
                let mut scalar = Scalar::new(&self.name);
                if let Some(description) = &self.description {
                    scalar = scalar.description(description);
                }
                Some(Type::Scalar(scalar))
            }
            TypeKind::Object(fields) => {
                let mut object = Object::new(&self.name);
                if let Some(description) = &self.description {
                    object = object.description(description);
                }
                for field in fields {
                    object = object.field(field.to_dynamic());
                }
                Some(Type::Object(object))
            }
            TypeKind::InputObject(fields) => {
                let mut input = InputObject::new(&self.name);
                if let Some(description) = &self.description {
                    input = input.description(description);
                }
                for field in fields {
                    let mut value = InputValue::new(&field.name, field.ty.to_type_ref());
                    if let Some(description) = &field.description {
                        value = value.description(description);
                    }
                    input = input.field(value);
                }
                Some(Type::InputObject(input))
            }
            TypeKind::Enum(items) => {
                let mut enum_type = Enum::new(&self.name).items(items.iter().cloned());
                if let Some(description) = &self.description {
                    enum_type = enum_type.description(description);
                }
                Some(Type::Enum(enum_type))
            }
            TypeKind::Reference => None,
        }
    }
}

/// A field of an object type.
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub name: String,
    pub ty: WireType,
    pub description: Option<String>,
}

impl ObjectField {
    pub fn new(name: impl Into<String>, ty: WireType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds an engine field that reads `name` from the parent object value.
    fn to_dynamic(&self) -> Field {
        let key = self.name.clone();
        let mut field = Field::new(&self.name, self.ty.to_type_ref(), move |ctx| {
            let key = key.clone();
            FieldFuture::new(async move {
                let value = match ctx.parent_value.as_value() {
                    Some(Value::Object(obj)) => obj.get(key.as_str()).cloned(),
                    _ => None,
                };
                Ok(value.and_then(into_field_value))
            })
        });
        if let Some(description) = &self.description {
            field = field.description(description);
        }
        field
    }
}

/// A field of an input object type.
#[derive(Debug, Clone)]
pub struct InputField {
    pub name: String,
    pub ty: WireType,
    pub description: Option<String>,
}

impl InputField {
    pub fn new(name: impl Into<String>, ty: WireType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Builder for custom scalar types.
#[derive(Debug)]
pub struct ScalarType {
    name: String,
    description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<ScalarType> for WireType {
    fn from(value: ScalarType) -> Self {
        WireType::Named(Arc::new(NamedType {
            name: value.name,
            description: value.description,
            kind: TypeKind::Scalar,
        }))
    }
}

/// Builder for object types.
#[derive(Debug)]
pub struct ObjectType {
    name: String,
    description: Option<String>,
    fields: Vec<ObjectField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: ObjectField) -> Self {
        self.fields.push(field);
        self
    }
}

impl From<ObjectType> for WireType {
    fn from(value: ObjectType) -> Self {
        WireType::Named(Arc::new(NamedType {
            name: value.name,
            description: value.description,
            kind: TypeKind::Object(value.fields),
        }))
    }
}

/// Builder for input object types.
#[derive(Debug)]
pub struct InputObjectType {
    name: String,
    description: Option<String>,
    fields: Vec<InputField>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: InputField) -> Self {
        self.fields.push(field);
        self
    }
}

impl From<InputObjectType> for WireType {
    fn from(value: InputObjectType) -> Self {
        WireType::Named(Arc::new(NamedType {
            name: value.name,
            description: value.description,
            kind: TypeKind::InputObject(value.fields),
        }))
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumType {
    name: String,
    description: Option<String>,
    items: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }
}

impl From<EnumType> for WireType {
    fn from(value: EnumType) -> Self {
        WireType::Named(Arc::new(NamedType {
            name: value.name,
            description: value.description,
            kind: TypeKind::Enum(value.items),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_singletons() {
        assert!(WireType::string().ptr_eq(&WireType::string()));
        assert!(WireType::int().ptr_eq(&WireType::int()));
        assert!(!WireType::int().ptr_eq(&WireType::float()));
        assert!(WireType::boolean().base().is_builtin());
    }

    #[test]
    fn test_wrapping_display() {
        let ty = WireType::int().non_null().list_of().non_null();
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(ty.name(), "Int");

        let ty = WireType::string().list_of();
        assert_eq!(ty.to_string(), "[String]");
    }

    #[test]
    fn test_non_null_is_idempotent() {
        let ty = WireType::int().non_null().non_null();
        assert_eq!(ty.to_string(), "Int!");
    }

    #[test]
    fn test_nullable_strips_one_layer() {
        let ty = WireType::int().non_null().list_of().non_null().nullable();
        assert_eq!(ty.to_string(), "[Int!]");
        assert_eq!(WireType::int().nullable().to_string(), "Int");
    }

    #[test]
    fn test_type_ref_conversion() {
        let ty = WireType::from(ObjectType::new("User")).list_of().non_null();
        assert_eq!(ty.to_type_ref().to_string(), "[User]!");
    }

    #[test]
    fn test_builtin_and_reference_have_no_definition() {
        assert!(WireType::string().base().to_dynamic().is_none());
        assert!(WireType::reference("User").base().to_dynamic().is_none());
        assert!(
            WireType::from(ScalarType::new("Json"))
                .base()
                .to_dynamic()
                .is_some()
        );
    }

    #[test]
    fn test_equality_is_by_name() {
        let a = WireType::from(ObjectType::new("User"));
        let b = WireType::reference("User");
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }
}
