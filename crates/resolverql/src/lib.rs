//! # resolverql
//!
//! Builds GraphQL schemas from resolver method tables.
//!
//! Resolvers describe their methods together with the operation metadata
//! that belongs to them: which methods are queries or mutations, under which
//! names, with which return types. This crate compiles those tables into
//! root `Query` and `Mutation` types, infers argument types from declared
//! parameter types, and dispatches incoming requests back to the resolver
//! methods. It supports:
//!
//! - Type inference for arguments and return values, with list and
//!   nullability wrapping
//! - Explicit type overrides for arguments
//! - Grouped arguments: several flat arguments collected into one value
//! - Merging several resolvers into one schema, later resolvers winning
//!
//! ## Configuration
//!
//! ```toml
//! debug = false
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`metadata`] - Operation, argument and group attributes
//! - [`reflect`] - Method tables, parameters and argument values
//! - [`types`] - Wire types and the type registry
//! - [`schema`] - Operation compilation, dispatch and schema building
//! - [`service`] - Request execution facade
//! - [`config`] - Configuration options
//! - [`error`] - Error types for schema construction

pub mod config;
pub mod error;
pub mod metadata;
pub mod reflect;
pub mod resolver;
pub mod response;
pub mod schema;
pub mod service;
pub mod types;
pub mod value;

// Re-export main types
pub use config::ServiceConfig;
pub use error::LoaderError;
pub use metadata::{
    Annotated, ArgType, Attribute, Group, Mutation, OperationKind, OperationMeta, Query,
    get_attached,
};
pub use reflect::{
    ArgumentGroup, Arguments, DeclaredType, GroupClass, Method, Parameter, Property, TypeHint,
};
pub use resolver::GraphQLResolver;
pub use response::{DebugFlags, ExecutionResult};
pub use schema::{Loader, OperationDescriptor, ResolverSchemaBuilder, SchemaBuilderConfig};
pub use service::{Service, ServiceBuilder, ServiceBuilderError};
pub use types::{
    EnumType, InputField, InputObjectType, ObjectField, ObjectType, ScalarType, TypeRegistry,
    WireType,
};

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, LoaderError>;
