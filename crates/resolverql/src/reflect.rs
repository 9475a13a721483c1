//! Method tables describing resolvers.
//!
//! Resolvers describe their methods explicitly: each [`Method`] lists its
//! attributes, its parameters (with their declared types) and an invoker
//! closure that calls the real Rust method. This is the information the
//! compiler needs to infer argument types and to build dispatch handlers.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::metadata::{Annotated, Attribute};
use crate::value::json_to_graphql_value;

/// The type a parameter or property is declared with in Rust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Type name resolved through the registry (`int`, `string`, `User`, ...).
    pub name: Cow<'static, str>,
    /// Whether the declared type admits an absent value.
    pub nullable: bool,
}

impl DeclaredType {
    /// A non-nullable declared type with the given name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
        }
    }

    /// The declared type of `T`.
    #[must_use]
    pub fn of<T: TypeHint + ?Sized>() -> Self {
        T::declared_type()
    }

    /// Marks the declared type as nullable.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Maps a Rust type to its declared schema type name.
pub trait TypeHint {
    fn declared_type() -> DeclaredType;
}

macro_rules! type_hint {
    ($name:literal => $($ty:ty),+) => {
        $(
            impl TypeHint for $ty {
                fn declared_type() -> DeclaredType {
                    DeclaredType::named($name)
                }
            }
        )+
    };
}

type_hint!("int" => i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
type_hint!("float" => f32, f64);
type_hint!("bool" => bool);
type_hint!("string" => String, str, char);

impl<T: TypeHint> TypeHint for Option<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type().optional()
    }
}

impl<T: TypeHint + ?Sized> TypeHint for &T {
    fn declared_type() -> DeclaredType {
        T::declared_type()
    }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    declared: Option<DeclaredType>,
    default: Option<Value>,
    attributes: Vec<Attribute>,
}

impl Parameter {
    /// Creates a parameter with a declared type.
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared),
            default: None,
            attributes: Vec::new(),
        }
    }

    /// Creates a parameter whose declared type is derived from `T`.
    pub fn typed<T: TypeHint + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared_type())
    }

    /// Creates a parameter without a declared type.
    ///
    /// Such a parameter needs an [`ArgType`](crate::ArgType) override or a
    /// [`Group`](crate::Group) attribute.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            default: None,
            attributes: Vec::new(),
        }
    }

    /// Makes the parameter optional with the given default.
    #[must_use]
    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(json_to_graphql_value(value));
        self
    }

    /// Attaches an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> Option<&DeclaredType> {
        self.declared.as_ref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// A parameter with a default value is optional.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

impl Annotated for Parameter {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// A property of an argument group class.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    declared: Option<DeclaredType>,
    attributes: Vec<Attribute>,
}

impl Property {
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared),
            attributes: Vec::new(),
        }
    }

    pub fn typed<T: TypeHint + ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared_type())
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> Option<&DeclaredType> {
        self.declared.as_ref()
    }
}

impl Annotated for Property {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// A container class that grouped parameters are reassembled into.
///
/// Its properties are exposed as flat operation arguments; at dispatch time
/// the matching arguments are collected into one object value keyed by
/// property name.
#[derive(Debug, Clone)]
pub struct GroupClass {
    name: String,
    properties: Vec<Property>,
}

impl GroupClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// The group class described by `T`.
    #[must_use]
    pub fn of<T: ArgumentGroup>() -> Self {
        Self {
            name: T::CLASS.to_string(),
            properties: T::properties(),
        }
    }

    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// A Rust struct usable as an argument group container.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct AddressInput {
///     street: String,
///     zip: Option<String>,
/// }
///
/// impl ArgumentGroup for AddressInput {
///     const CLASS: &'static str = "AddressInput";
///
///     fn properties() -> Vec<Property> {
///         vec![
///             Property::typed::<String>("street"),
///             Property::typed::<Option<String>>("zip"),
///         ]
///     }
/// }
/// ```
pub trait ArgumentGroup: DeserializeOwned {
    const CLASS: &'static str;

    fn properties() -> Vec<Property>;
}

/// Name, attributes and parameters of a method.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    name: String,
    attributes: Vec<Attribute>,
    parameters: Vec<Parameter>,
}

impl MethodSignature {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl Annotated for MethodSignature {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

type Invoker<R> = Arc<dyn Fn(&R, &Arguments) -> async_graphql::Result<Value> + Send + Sync>;

/// A resolver method: its signature plus a closure that calls it.
pub struct Method<R> {
    signature: MethodSignature,
    invoker: Invoker<R>,
}

impl<R> Method<R> {
    /// Creates a method from a closure.
    ///
    /// The closure receives the resolver and the final argument set; its
    /// return value is serialized into a GraphQL value.
    pub fn new<F, T>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R, &Arguments) -> async_graphql::Result<T> + Send + Sync + 'static,
        T: Serialize,
    {
        let invoker: Invoker<R> = Arc::new(move |resolver: &R, args: &Arguments| {
            let output = f(resolver, args)?;
            async_graphql::to_value(output).map_err(|e| {
                async_graphql::Error::new(format!("Failed to serialize result: {e}"))
            })
        });

        Self {
            signature: MethodSignature {
                name: name.into(),
                attributes: Vec::new(),
                parameters: Vec::new(),
            },
            invoker,
        }
    }

    /// Attaches an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.signature.attributes.push(attribute.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.signature.parameters.push(parameter);
        self
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    /// Binds the method to a resolver instance.
    pub(crate) fn bind(self, resolver: Arc<R>) -> BoundMethod
    where
        R: Send + Sync + 'static,
    {
        let invoker = self.invoker;
        BoundMethod {
            owner: type_name::<R>(),
            signature: self.signature,
            call: Arc::new(move |args: &Arguments| invoker(&resolver, args)),
        }
    }
}

impl<R> Clone for Method<R> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            invoker: Arc::clone(&self.invoker),
        }
    }
}

impl<R> Annotated for Method<R> {
    fn attributes(&self) -> &[Attribute] {
        &self.signature.attributes
    }
}

impl<R> fmt::Debug for Method<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

pub(crate) type BoundCall = Arc<dyn Fn(&Arguments) -> async_graphql::Result<Value> + Send + Sync>;

/// A method bound to its resolver instance.
#[derive(Clone)]
pub(crate) struct BoundMethod {
    pub(crate) owner: &'static str,
    pub(crate) signature: MethodSignature,
    pub(crate) call: BoundCall,
}

impl Annotated for BoundMethod {
    fn attributes(&self) -> &[Attribute] {
        &self.signature.attributes
    }
}

/// Argument values passed to a resolver method, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, Value>,
}

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from a JSON object. Non-object values yield no arguments.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| (name, json_to_graphql_value(value)))
                .collect(),
            _ => Self::default(),
        }
    }

    /// Deserializes the argument `name` into `T`.
    ///
    /// A missing argument deserializes from `null`, so `Option<T>` yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> async_graphql::Result<T> {
        let value = self.values.get(name).cloned().unwrap_or(Value::Null);
        async_graphql::from_value(value).map_err(|e| {
            async_graphql::Error::new(format!("Invalid value for argument '{name}': {e}"))
        })
    }

    /// Returns the raw value of the argument `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Removes an argument, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_type_hints() {
        assert_eq!(DeclaredType::of::<i32>(), DeclaredType::named("int"));
        assert_eq!(DeclaredType::of::<String>(), DeclaredType::named("string"));
        assert_eq!(DeclaredType::of::<bool>(), DeclaredType::named("bool"));
        assert_eq!(DeclaredType::of::<f64>(), DeclaredType::named("float"));
        assert_eq!(DeclaredType::of::<&str>(), DeclaredType::named("string"));

        let optional = DeclaredType::of::<Option<i64>>();
        assert_eq!(optional.name, "int");
        assert!(optional.nullable);
    }

    #[test]
    fn test_parameter_optional_only_with_default() {
        let required = Parameter::typed::<i32>("id");
        assert!(!required.is_optional());

        let optional = Parameter::typed::<i32>("limit").default_value(json!(10));
        assert!(optional.is_optional());
        assert_eq!(optional.default(), Some(&Value::Number(10.into())));
    }

    #[test]
    fn test_arguments_get() {
        let args = Arguments::from_json(json!({"id": 7, "name": "Ann"}));
        assert_eq!(args.get::<i32>("id").unwrap(), 7);
        assert_eq!(args.get::<String>("name").unwrap(), "Ann");
        assert_eq!(args.get::<Option<String>>("missing").unwrap(), None);
        assert!(args.get::<i32>("name").is_err());
        assert!(args.get::<i32>("missing").is_err());
    }

    #[test]
    fn test_arguments_from_non_object() {
        assert!(Arguments::from_json(json!([1, 2])).is_empty());
    }

    #[allow(dead_code)]
    #[derive(Debug, Deserialize, PartialEq)]
    struct AddressInput {
        street: String,
        zip: Option<String>,
    }

    impl ArgumentGroup for AddressInput {
        const CLASS: &'static str = "AddressInput";

        fn properties() -> Vec<Property> {
            vec![
                Property::typed::<String>("street"),
                Property::typed::<Option<String>>("zip"),
            ]
        }
    }

    #[test]
    fn test_group_class_of() {
        let class = GroupClass::of::<AddressInput>();
        assert_eq!(class.name(), "AddressInput");
        let names: Vec<_> = class.properties().iter().map(Property::name).collect();
        assert_eq!(names, ["street", "zip"]);
        assert!(class.properties()[1].declared().unwrap().nullable);
    }

    struct Greeter {
        greeting: &'static str,
    }

    #[test]
    fn test_bound_method_calls_resolver() {
        let method = Method::new("greet", |this: &Greeter, args: &Arguments| {
            let name: String = args.get("name")?;
            Ok(format!("{}, {name}", this.greeting))
        })
        .param(Parameter::typed::<String>("name"));

        assert_eq!(method.signature().parameters().len(), 1);

        let bound = method.bind(Arc::new(Greeter { greeting: "Hello" }));
        let out = (bound.call)(&Arguments::from_json(json!({"name": "Ann"}))).unwrap();
        assert_eq!(out, Value::String("Hello, Ann".into()));
        assert!(bound.owner.ends_with("Greeter"));
    }
}
