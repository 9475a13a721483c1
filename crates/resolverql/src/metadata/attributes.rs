//! Metadata attached to resolver methods, parameters and group properties.

/// Operation metadata shared by [`Query`] and [`Mutation`].
///
/// Declares the intent of an operation; the realized return type is
/// computed by the compiler from `return_type`, `list` and `nullable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMeta {
    /// Operation name as exposed in the schema. May differ from the method name.
    pub name: String,
    /// Name of a built-in or registered type.
    pub return_type: String,
    /// Whether the result may be null. Default: true
    pub nullable: bool,
    /// Whether the result is a list of `return_type`. Default: false
    pub list: bool,
    /// Operation description.
    pub description: String,
}

impl OperationMeta {
    /// Creates nullable, non-list operation metadata.
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            nullable: true,
            list: false,
            description: String::new(),
        }
    }

    /// Marks the result as non-null.
    #[must_use]
    pub fn non_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets nullability of the result.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks the result as a list.
    #[must_use]
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Marks a resolver method as a query operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(pub OperationMeta);

/// Marks a resolver method as a mutation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation(pub OperationMeta);

impl Query {
    /// Shorthand for `Query(OperationMeta::new(name, return_type))`.
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self(OperationMeta::new(name, return_type))
    }
}

impl Mutation {
    /// Shorthand for `Mutation(OperationMeta::new(name, return_type))`.
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self(OperationMeta::new(name, return_type))
    }
}

impl From<OperationMeta> for Query {
    fn from(meta: OperationMeta) -> Self {
        Self(meta)
    }
}

impl From<OperationMeta> for Mutation {
    fn from(meta: OperationMeta) -> Self {
        Self(meta)
    }
}

/// Explicit type information for an argument or a group property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgType {
    /// Overrides the type name inferred from the declared type.
    pub type_name: Option<String>,
    /// Wraps the resolved type in a list.
    pub list: bool,
    /// Argument description.
    pub description: String,
}

impl ArgType {
    /// Creates empty argument metadata (no override, not a list).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates argument metadata overriding the type name.
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Marks the argument as a list.
    #[must_use]
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the override type name, ignoring empty strings.
    pub fn override_name(&self) -> Option<&str> {
        self.type_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Collects several flat arguments into one container value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Name of a registered [`GroupClass`](crate::GroupClass).
    pub class_name: String,
}

impl Group {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

/// Any metadata that can be attached to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Query(Query),
    Mutation(Mutation),
    ArgType(ArgType),
    Group(Group),
}

impl From<Query> for Attribute {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}

impl From<Mutation> for Attribute {
    fn from(value: Mutation) -> Self {
        Self::Mutation(value)
    }
}

impl From<ArgType> for Attribute {
    fn from(value: ArgType) -> Self {
        Self::ArgType(value)
    }
}

impl From<Group> for Attribute {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}
