//! Schema assembly.
//!
//! ## Components
//!
//! - [`ResolverExecutor`] - Compiles one resolver's methods into operations
//! - [`DispatchHandler`] - Calls a resolver method with engine arguments
//! - [`Loader`] - Merges all resolvers into the `Query` and `Mutation` roots
//! - [`ResolverSchemaBuilder`] - Builds the executable schema
//!
//! ## Architecture
//!
//! The schema building process:
//! 1. Each registered resolver contributes its types and group classes
//! 2. Methods carrying `Query`/`Mutation` attributes are compiled into
//!    operation descriptors with inferred argument and return types
//! 3. Operations of all resolvers are merged by name, later resolvers winning
//! 4. The roots and every registered type are handed to the engine

mod builder;
mod dispatch;
mod executor;
mod loader;

pub use builder::{ResolverSchemaBuilder, SchemaBuilderConfig};
pub use dispatch::{
    DEBUG_MESSAGE_KEY, DispatchHandler, DispatchTarget, GroupArgumentPlan, TRACE_KEY,
};
pub use executor::{ArgumentDescriptor, OperationDescriptor, OperationMap, ResolverExecutor};
pub use loader::{Loader, RootObject};
