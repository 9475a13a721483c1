//! Compilation of one resolver's method table into operation descriptors.

use std::sync::Arc;

use async_graphql::Value;
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::dispatch::{DispatchHandler, DispatchTarget, GroupArgumentPlan};
use crate::error::LoaderError;
use crate::metadata::{
    ArgType, Group, Mutation, OperationAttribute, OperationMeta, Query, get_attached,
};
use crate::reflect::{BoundMethod, DeclaredType, Parameter};
use crate::resolver::GraphQLResolver;
use crate::types::{TypeRegistry, WireType};

/// A compiled argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    pub ty: WireType,
    pub description: Option<String>,
}

/// A compiled query or mutation.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Operation name as exposed in the schema.
    pub name: String,
    pub return_type: WireType,
    /// Arguments in declaration order, grouped properties flattened in place.
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    pub description: String,
    pub handler: DispatchHandler,
}

/// Name-keyed operations of one kind.
pub type OperationMap = IndexMap<String, OperationDescriptor>;

/// Executor for one registered resolver.
///
/// Creating the executor registers the resolver's contributed types and
/// group classes. Operations are compiled on request, so they can refer to
/// types contributed by resolvers registered later.
pub struct ResolverExecutor {
    resolver: &'static str,
    methods: Vec<BoundMethod>,
}

impl ResolverExecutor {
    /// Creates an executor for `resolver`, registering its types and groups.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by [`GraphQLResolver::types`].
    pub fn new<R: GraphQLResolver>(
        resolver: R,
        registry: &mut TypeRegistry,
    ) -> Result<Self, LoaderError> {
        let resolver_name = std::any::type_name::<R>();

        for ty in resolver.types(registry)? {
            registry.register(ty);
        }
        for group in resolver.groups() {
            registry.register_group(group);
        }

        let methods = resolver.methods();
        let resolver = Arc::new(resolver);
        let methods: Vec<BoundMethod> = methods
            .into_iter()
            .map(|method| method.bind(Arc::clone(&resolver)))
            .collect();

        debug!(
            resolver = resolver_name,
            methods = methods.len(),
            "Registered resolver"
        );

        Ok(Self {
            resolver: resolver_name,
            methods,
        })
    }

    /// Type name of the resolver.
    #[must_use]
    pub fn resolver_name(&self) -> &'static str {
        self.resolver
    }

    /// Compiles the resolver's queries.
    ///
    /// # Errors
    ///
    /// Returns an error if a type or group cannot be resolved.
    pub fn queries(&self, registry: &TypeRegistry) -> Result<OperationMap, LoaderError> {
        self.operations::<Query>(registry)
    }

    /// Compiles the resolver's mutations.
    ///
    /// # Errors
    ///
    /// Returns an error if a type or group cannot be resolved.
    pub fn mutations(&self, registry: &TypeRegistry) -> Result<OperationMap, LoaderError> {
        self.operations::<Mutation>(registry)
    }

    /// Compiles every method carrying attribute kind `K`.
    fn operations<K: OperationAttribute>(
        &self,
        registry: &TypeRegistry,
    ) -> Result<OperationMap, LoaderError> {
        let mut operations = OperationMap::new();

        for method in &self.methods {
            let Some(attribute) = get_attached::<K>(method) else {
                continue;
            };
            let meta = attribute.meta();

            let descriptor = self.compile(method, meta, registry)?;
            trace!(
                kind = K::KIND.root_name(),
                operation = %descriptor.name,
                method = %method.signature.name(),
                return_type = %descriptor.return_type,
                "Compiled operation"
            );

            if operations.contains_key(&meta.name) {
                warn!(
                    resolver = self.resolver,
                    operation = %meta.name,
                    "Operation declared twice; the later method wins"
                );
            }
            operations.insert(meta.name.clone(), descriptor);
        }

        Ok(operations)
    }

    fn compile(
        &self,
        method: &BoundMethod,
        meta: &OperationMeta,
        registry: &TypeRegistry,
    ) -> Result<OperationDescriptor, LoaderError> {
        let owner = format!("{}::{}", self.resolver, method.signature.name());

        let mut arguments = IndexMap::new();
        let mut groups = Vec::new();
        let mut defaults = Vec::new();
        for parameter in method.signature.parameters() {
            collect_parameter(
                &owner,
                parameter,
                registry,
                &mut arguments,
                &mut groups,
                &mut defaults,
            )?;
        }

        let handler = DispatchHandler::new(
            Arc::clone(&method.call),
            groups,
            defaults,
            DispatchTarget {
                resolver: method.owner,
                method: method.signature.name().to_string(),
                operation: meta.name.clone(),
            },
        );

        Ok(OperationDescriptor {
            name: meta.name.clone(),
            return_type: infer_return_type(meta, registry)?,
            arguments,
            description: meta.description.clone(),
            handler,
        })
    }
}

/// Return type: base type, then list wrap, then non-null wrap.
fn infer_return_type(
    meta: &OperationMeta,
    registry: &TypeRegistry,
) -> Result<WireType, LoaderError> {
    let mut ty = registry.resolve(&meta.return_type)?;
    if meta.list {
        ty = ty.list_of();
    }
    if !meta.nullable {
        ty = ty.non_null();
    }
    Ok(ty)
}

/// Argument type: override or declared name, then list wrap, then
/// non-null unless the declared type is nullable.
fn infer_argument_type(
    owner: &str,
    member: &str,
    declared: Option<&DeclaredType>,
    arg_type: Option<&ArgType>,
    registry: &TypeRegistry,
) -> Result<WireType, LoaderError> {
    let name = arg_type
        .and_then(ArgType::override_name)
        .or_else(|| declared.map(|d| d.name.as_ref()))
        .ok_or_else(|| LoaderError::UntypedMember {
            owner: owner.to_string(),
            member: member.to_string(),
        })?;

    let mut ty = registry.resolve(name)?;
    if arg_type.is_some_and(|a| a.list) {
        ty = ty.list_of();
    }
    // Without a declared type only the override is known; treat it as nullable.
    if declared.is_some_and(|d| !d.nullable) {
        ty = ty.non_null();
    }
    Ok(ty)
}

fn describe(arg_type: Option<&ArgType>) -> Option<String> {
    arg_type
        .map(|a| a.description.clone())
        .filter(|d| !d.is_empty())
}

fn collect_parameter(
    owner: &str,
    parameter: &Parameter,
    registry: &TypeRegistry,
    arguments: &mut IndexMap<String, ArgumentDescriptor>,
    groups: &mut Vec<GroupArgumentPlan>,
    defaults: &mut Vec<(String, Value)>,
) -> Result<(), LoaderError> {
    if let Some(group) = get_attached::<Group>(parameter) {
        return collect_group(group, parameter, registry, arguments, groups);
    }

    let arg_type = get_attached::<ArgType>(parameter);
    let mut ty = infer_argument_type(
        owner,
        parameter.name(),
        parameter.declared(),
        arg_type,
        registry,
    )?;
    if let Some(default) = parameter.default() {
        ty = ty.nullable();
        defaults.push((parameter.name().to_string(), default.clone()));
    }

    trace!(argument = %parameter.name(), ty = %ty, "Compiled argument");
    arguments.insert(
        parameter.name().to_string(),
        ArgumentDescriptor {
            ty,
            description: describe(arg_type),
        },
    );
    Ok(())
}

fn collect_group(
    group: &Group,
    parameter: &Parameter,
    registry: &TypeRegistry,
    arguments: &mut IndexMap<String, ArgumentDescriptor>,
    groups: &mut Vec<GroupArgumentPlan>,
) -> Result<(), LoaderError> {
    let class = registry.group(&group.class_name)?;

    let mut names = Vec::with_capacity(class.properties().len());
    for property in class.properties() {
        let arg_type = get_attached::<ArgType>(property);
        let ty = infer_argument_type(
            class.name(),
            property.name(),
            property.declared(),
            arg_type,
            registry,
        )?;

        trace!(
            argument = %property.name(),
            group = %class.name(),
            ty = %ty,
            "Compiled grouped argument"
        );
        arguments.insert(
            property.name().to_string(),
            ArgumentDescriptor {
                ty,
                description: describe(arg_type),
            },
        );
        names.push(property.name().to_string());
    }

    groups.push(GroupArgumentPlan {
        class_name: class.name().to_string(),
        arguments: names,
        target: parameter.name().to_string(),
    });
    Ok(())
}
