//! Resolver schema builder.
//!
//! This module provides `ResolverSchemaBuilder`, which turns the root objects
//! of a [`Loader`] into an executable schema. The builder uses async-graphql's
//! dynamic schema API to construct the schema at runtime.

use async_graphql::dynamic::{Field, FieldFuture, InputValue, Object, Schema};
use tracing::{debug, trace};

use super::executor::OperationDescriptor;
use super::loader::{Loader, RootObject};
use crate::error::LoaderError;
use crate::reflect::Arguments;
use crate::value::into_field_value;

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds a GraphQL schema from the resolvers registered in a [`Loader`].
///
/// The schema contains:
/// - every custom type in the loader's registry
/// - the `Query` root with the merged query operations
/// - the `Mutation` root with the merged mutation operations, if any
///
/// # Example
///
/// ```ignore
/// let schema = ResolverSchemaBuilder::new(&loader, SchemaBuilderConfig::default()).build()?;
/// ```
pub struct ResolverSchemaBuilder<'a> {
    loader: &'a Loader,
    config: SchemaBuilderConfig,
}

impl<'a> ResolverSchemaBuilder<'a> {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(loader: &'a Loader, config: SchemaBuilderConfig) -> Self {
        Self { loader, config }
    }

    /// Builds the GraphQL schema.
    ///
    /// # Errors
    ///
    /// Returns an error if an operation cannot be compiled or the engine
    /// rejects the schema.
    pub fn build(&self) -> Result<Schema, LoaderError> {
        debug!("Starting GraphQL schema build");

        let mutation = self.loader.root_mutation()?;
        let query = build_root(&self.loader.root_query())?.ok_or_else(|| {
            LoaderError::SchemaBuildFailed("Query root has no fields".to_string())
        })?;
        let mutation = build_root(&mutation)?;

        let mut schema_builder =
            Schema::build("Query", mutation.as_ref().map(|_| "Mutation"), None);

        // Custom types, in registration order
        for named in self.loader.registry().types() {
            if let Some(ty) = named.to_dynamic() {
                trace!(type_name = %named.name, "Registering schema type");
                schema_builder = schema_builder.register(ty);
            }
        }

        schema_builder = schema_builder.register(query);
        if let Some(mutation) = mutation {
            schema_builder = schema_builder.register(mutation);
        }

        // Configure limits
        let mut schema_builder = schema_builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| LoaderError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }
}

/// Builds the engine object for a root. Returns `None` for a root without
/// fields, which the engine would reject.
fn build_root(root: &RootObject<'_>) -> Result<Option<Object>, LoaderError> {
    let fields = root.fields()?;
    if fields.is_empty() {
        debug!(root = root.name(), "Root has no fields, skipping");
        return Ok(None);
    }

    let mut object = Object::new(root.name());
    for operation in fields.values() {
        object = object.field(build_field(operation));
    }
    Ok(Some(object))
}

/// Builds a root field that dispatches to the operation's handler.
///
/// A handler error on a nullable operation is recorded against the field's
/// path and the field resolves to `null`. On a non-null operation the error
/// is returned to the engine, which drops the field from the result.
fn build_field(operation: &OperationDescriptor) -> Field {
    let handler = operation.handler.clone();
    let nullable = !operation.return_type.is_non_null();

    let mut field = Field::new(
        &operation.name,
        operation.return_type.to_type_ref(),
        move |ctx| {
            let handler = handler.clone();
            FieldFuture::new(async move {
                let args: Arguments = ctx
                    .args
                    .as_index_map()
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.clone()))
                    .collect();
                match handler.call(args) {
                    Ok(value) => Ok(into_field_value(value)),
                    Err(err) if nullable => {
                        ctx.add_error(ctx.set_error_path(err.into_server_error(ctx.item.pos)));
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            })
        },
    );

    if !operation.description.is_empty() {
        field = field.description(&operation.description);
    }

    for (name, argument) in &operation.arguments {
        let mut input = InputValue::new(name, argument.ty.to_type_ref());
        if let Some(description) = &argument.description {
            input = input.description(description);
        }
        field = field.argument(input);
    }

    field
}
