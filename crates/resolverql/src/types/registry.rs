//! Name-keyed registry of wire types and argument group classes.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{trace, warn};

use super::{NamedType, WireType};
use crate::error::LoaderError;
use crate::reflect::GroupClass;

/// Maps type names to wire types.
///
/// The four built-in scalars are always resolvable under both a short alias
/// and their canonical name (`int` / `Int`, `string` / `String`,
/// `bool` / `Boolean`, `float` / `Float`). Custom types are looked up in the
/// registered table; registering a name twice replaces the earlier type.
///
/// The registry also owns the argument group classes that grouped
/// parameters refer to by name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<NamedType>>,
    groups: IndexMap<String, GroupClass>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom type under its name, replacing any previous one.
    ///
    /// List and non-null wrappers are ignored; the innermost named type is
    /// stored. Names taken by a built-in scalar always resolve to the
    /// built-in, so types registered under them are not stored.
    pub fn register(&mut self, ty: impl Into<WireType>) {
        let named = Arc::clone(ty.into().base());
        if builtin(&named.name).is_some() {
            if !named.is_builtin() {
                warn!(
                    type_name = %named.name,
                    "Type name is taken by a built-in scalar, ignoring registration"
                );
            }
            return;
        }
        trace!(type_name = %named.name, "Registering type");
        self.types.insert(named.name.clone(), named);
    }

    /// Returns the type registered or built in under `name`.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::TypeNotFound` if the name is unknown.
    pub fn resolve(&self, name: &str) -> Result<WireType, LoaderError> {
        match builtin(name) {
            Some(ty) => Ok(ty),
            None => self
                .types
                .get(name)
                .map(|named| WireType::Named(Arc::clone(named)))
                .ok_or_else(|| LoaderError::type_not_found(name)),
        }
    }

    /// Returns whether `name` resolves to a type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Registered custom types in first-registration order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<NamedType>> {
        self.types.values()
    }

    /// Number of registered custom types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns whether no custom type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registers an argument group class, replacing any previous one.
    pub fn register_group(&mut self, group: GroupClass) {
        trace!(class = %group.name(), "Registering argument group");
        self.groups.insert(group.name().to_string(), group);
    }

    /// Returns the group class registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::GroupNotFound` if the class is unknown.
    pub fn group(&self, name: &str) -> Result<&GroupClass, LoaderError> {
        self.groups
            .get(name)
            .ok_or_else(|| LoaderError::GroupNotFound(name.to_string()))
    }
}

/// Built-in scalar for an alias or canonical name.
fn builtin(name: &str) -> Option<WireType> {
    match name {
        "string" | "String" => Some(WireType::string()),
        "int" | "Int" => Some(WireType::int()),
        "bool" | "Boolean" => Some(WireType::boolean()),
        "float" | "Float" => Some(WireType::float()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectField, ObjectType, ScalarType};

    #[test]
    fn test_builtin_aliases() {
        let registry = TypeRegistry::new();
        for (alias, canonical) in [
            ("string", "String"),
            ("int", "Int"),
            ("bool", "Boolean"),
            ("float", "Float"),
        ] {
            let a = registry.resolve(alias).unwrap();
            let b = registry.resolve(canonical).unwrap();
            assert!(a.ptr_eq(&b), "{alias} and {canonical} should be the same type");
            assert_eq!(a.name(), canonical);
        }
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        for name in ["User", "integer", "STRING", ""] {
            assert_eq!(
                registry.resolve(name).unwrap_err(),
                LoaderError::TypeNotFound(name.to_string())
            );
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = TypeRegistry::new();
        let first = WireType::from(ObjectType::new("User"));
        let second = WireType::from(
            ObjectType::new("User").field(ObjectField::new("id", WireType::int())),
        );
        registry.register(first.clone());
        registry.register(second.clone());

        let resolved = registry.resolve("User").unwrap();
        assert!(resolved.ptr_eq(&second));
        assert!(!resolved.ptr_eq(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_strips_wrappers() {
        let mut registry = TypeRegistry::new();
        registry.register(WireType::from(ScalarType::new("Json")).list_of().non_null());
        let resolved = registry.resolve("Json").unwrap();
        assert_eq!(resolved.to_string(), "Json");
    }

    #[test]
    fn test_types_keep_registration_order() {
        let mut registry = TypeRegistry::new();
        registry.register(ScalarType::new("B"));
        registry.register(ScalarType::new("A"));
        registry.register(ScalarType::new("B"));
        let names: Vec<_> = registry.types().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_builtin_names_cannot_be_shadowed() {
        let mut registry = TypeRegistry::new();
        registry.register(ObjectType::new("Int").field(ObjectField::new("id", WireType::int())));
        registry.register(ScalarType::new("bool"));
        registry.register(WireType::string());

        assert!(registry.is_empty());
        assert!(registry.resolve("Int").unwrap().ptr_eq(&WireType::int()));
        assert!(registry.resolve("bool").unwrap().ptr_eq(&WireType::boolean()));
    }

    #[test]
    fn test_missing_group() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.group("AddressInput").unwrap_err(),
            LoaderError::GroupNotFound("AddressInput".into())
        );
    }
}
