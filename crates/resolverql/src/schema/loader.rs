//! Schema assembly across registered resolvers.

use std::borrow::Cow;

use tracing::{debug, warn};

use super::executor::{OperationMap, ResolverExecutor};
use crate::error::LoaderError;
use crate::metadata::OperationKind;
use crate::reflect::GroupClass;
use crate::resolver::GraphQLResolver;
use crate::types::{TypeRegistry, WireType};

/// Collects resolvers and custom types, and assembles the root objects.
///
/// Resolvers are kept in registration order. When two resolvers declare an
/// operation with the same name, the one registered later wins.
///
/// # Example
///
/// ```ignore
/// let mut loader = Loader::new();
/// loader.register_resolver(UserResolver)?;
/// loader.register_resolver(AddressResolver)?;
///
/// let service = Service::new(loader)?;
/// ```
#[derive(Default)]
pub struct Loader {
    registry: TypeRegistry,
    executors: Vec<ResolverExecutor>,
}

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver and the types and group classes it provides.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by the resolver's `types` method.
    pub fn register_resolver<R: GraphQLResolver>(
        &mut self,
        resolver: R,
    ) -> Result<(), LoaderError> {
        let executor = ResolverExecutor::new(resolver, &mut self.registry)?;
        self.executors.push(executor);
        Ok(())
    }

    /// Registers a custom type without a resolver.
    pub fn register_type(&mut self, ty: impl Into<WireType>) {
        self.registry.register(ty);
    }

    /// Registers an argument group class without a resolver.
    pub fn register_group(&mut self, group: GroupClass) {
        self.registry.register_group(group);
    }

    /// Resolves a type by name.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::TypeNotFound` for unknown names.
    pub fn resolve_type(&self, name: &str) -> Result<WireType, LoaderError> {
        self.registry.resolve(name)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Number of registered resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.executors.len()
    }

    /// Queries of all resolvers, merged by name.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn queries(&self) -> Result<OperationMap, LoaderError> {
        self.merge(OperationKind::Query)
    }

    /// Mutations of all resolvers, merged by name.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn mutations(&self) -> Result<OperationMap, LoaderError> {
        self.merge(OperationKind::Mutation)
    }

    /// The `Query` root. Its fields are compiled when first requested.
    #[must_use]
    pub fn root_query(&self) -> RootObject<'_> {
        RootObject {
            kind: OperationKind::Query,
            fields: RootFields::Lazy(self),
        }
    }

    /// The `Mutation` root, compiled immediately.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn root_mutation(&self) -> Result<RootObject<'_>, LoaderError> {
        Ok(RootObject {
            kind: OperationKind::Mutation,
            fields: RootFields::Eager(self.mutations()?),
        })
    }

    fn merge(&self, kind: OperationKind) -> Result<OperationMap, LoaderError> {
        let mut merged = OperationMap::new();
        for executor in &self.executors {
            let operations = match kind {
                OperationKind::Query => executor.queries(&self.registry)?,
                OperationKind::Mutation => executor.mutations(&self.registry)?,
            };
            for (name, operation) in operations {
                if let Some(previous) = merged.get(&name) {
                    warn!(
                        root = kind.root_name(),
                        operation = %name,
                        previous = previous.handler.target().resolver,
                        resolver = executor.resolver_name(),
                        "Operation overridden by a later resolver"
                    );
                }
                merged.insert(name, operation);
            }
        }

        debug!(
            root = kind.root_name(),
            fields = merged.len(),
            "Merged root fields"
        );
        Ok(merged)
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resolvers: Vec<_> = self
            .executors
            .iter()
            .map(ResolverExecutor::resolver_name)
            .collect();
        f.debug_struct("Loader")
            .field("registry", &self.registry)
            .field("resolvers", &resolvers)
            .finish()
    }
}

/// A root object type (`Query` or `Mutation`).
pub struct RootObject<'a> {
    kind: OperationKind,
    fields: RootFields<'a>,
}

enum RootFields<'a> {
    Eager(OperationMap),
    Lazy(&'a Loader),
}

impl RootObject<'_> {
    /// Type name of the root.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.root_name()
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the root fields, compiling them if the root is lazy.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error of a lazy root.
    pub fn fields(&self) -> Result<Cow<'_, OperationMap>, LoaderError> {
        match &self.fields {
            RootFields::Eager(fields) => Ok(Cow::Borrowed(fields)),
            RootFields::Lazy(loader) => loader.merge(self.kind).map(Cow::Owned),
        }
    }

    /// Returns whether the field map was computed at construction.
    #[must_use]
    pub fn is_eager(&self) -> bool {
        matches!(self.fields, RootFields::Eager(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Mutation, Query};
    use crate::reflect::{Arguments, Method, Parameter};
    use crate::types::{ObjectField, ObjectType};
    use async_graphql::Value;

    struct PingA;

    impl GraphQLResolver for PingA {
        fn methods(&self) -> Vec<Method<Self>> {
            vec![
                Method::new("ping", |_: &Self, _: &Arguments| Ok("A"))
                    .attribute(Query::new("ping", "String")),
            ]
        }
    }

    struct PingB;

    impl GraphQLResolver for PingB {
        fn methods(&self) -> Vec<Method<Self>> {
            vec![
                Method::new("ping", |_: &Self, _: &Arguments| Ok("B"))
                    .attribute(Query::new("ping", "String")),
            ]
        }
    }

    struct Pong;

    impl GraphQLResolver for Pong {
        fn methods(&self) -> Vec<Method<Self>> {
            vec![
                Method::new("pong", |_: &Self, _: &Arguments| Ok("pong"))
                    .attribute(Query::new("pong", "String")),
                Method::new("reset", |_: &Self, _: &Arguments| Ok(true))
                    .attribute(Mutation::new("reset", "Boolean")),
            ]
        }
    }

    #[test]
    fn test_later_resolver_wins() {
        let mut loader = Loader::new();
        loader.register_resolver(PingA).unwrap();
        loader.register_resolver(PingB).unwrap();

        let queries = loader.queries().unwrap();
        assert_eq!(queries.len(), 1);
        let out = queries["ping"].handler.call(Arguments::new()).unwrap();
        assert_eq!(out, Value::String("B".into()));
    }

    #[test]
    fn test_distinct_names_are_merged() {
        let mut loader = Loader::new();
        loader.register_resolver(PingA).unwrap();
        loader.register_resolver(Pong).unwrap();

        let queries = loader.queries().unwrap();
        assert_eq!(queries.keys().collect::<Vec<_>>(), ["ping", "pong"]);
        assert_eq!(loader.resolver_count(), 2);
    }

    #[test]
    fn test_roots() {
        let mut loader = Loader::new();
        loader.register_resolver(Pong).unwrap();

        let query = loader.root_query();
        assert_eq!(query.name(), "Query");
        assert!(!query.is_eager());
        assert!(query.fields().unwrap().contains_key("pong"));

        let mutation = loader.root_mutation().unwrap();
        assert_eq!(mutation.name(), "Mutation");
        assert_eq!(mutation.kind(), OperationKind::Mutation);
        assert!(mutation.is_eager());
        assert!(mutation.fields().unwrap().contains_key("reset"));
    }

    struct LateUser;

    impl GraphQLResolver for LateUser {
        fn methods(&self) -> Vec<Method<Self>> {
            vec![
                Method::new("me", |_: &Self, _: &Arguments| Ok(serde_json::json!({"id": 1})))
                    .attribute(Query::new("me", "User")),
            ]
        }
    }

    struct UserTypes;

    impl GraphQLResolver for UserTypes {
        fn types(&self, _registry: &TypeRegistry) -> Result<Vec<WireType>, LoaderError> {
            Ok(vec![
                ObjectType::new("User")
                    .field(ObjectField::new("id", WireType::int()))
                    .into(),
            ])
        }

        fn methods(&self) -> Vec<Method<Self>> {
            Vec::new()
        }
    }

    #[test]
    fn test_query_root_sees_types_registered_later() {
        let mut loader = Loader::new();
        loader.register_resolver(LateUser).unwrap();
        let query = loader.root_query();
        assert_eq!(
            query.fields().unwrap_err(),
            LoaderError::TypeNotFound("User".into())
        );
        drop(query);

        loader.register_resolver(UserTypes).unwrap();
        let queries = loader.root_query().fields().unwrap().into_owned();
        assert_eq!(queries["me"].return_type.to_string(), "User");
    }

    #[test]
    fn test_mutation_root_fails_eagerly() {
        struct Broken;

        impl GraphQLResolver for Broken {
            fn methods(&self) -> Vec<Method<Self>> {
                vec![
                    Method::new("save", |_: &Self, _: &Arguments| Ok(()))
                        .attribute(Mutation::new("save", "Receipt"))
                        .param(Parameter::typed::<i32>("id")),
                ]
            }
        }

        let mut loader = Loader::new();
        loader.register_resolver(Broken).unwrap();
        assert_eq!(
            loader.root_mutation().err(),
            Some(LoaderError::TypeNotFound("Receipt".into()))
        );
        assert!(loader.root_query().fields().unwrap().is_empty());
    }

    #[test]
    fn test_direct_type_registration() {
        let mut loader = Loader::new();
        loader.register_type(ObjectType::new("Address"));
        assert_eq!(loader.resolve_type("Address").unwrap().name(), "Address");
        assert!(loader.resolve_type("Unknown").is_err());
    }
}
