//! The resolver contract.

use crate::error::LoaderError;
use crate::reflect::{GroupClass, Method};
use crate::types::{TypeRegistry, WireType};

/// Resolvers define types and the queries/mutations working with them.
///
/// # Example
///
/// ```ignore
/// struct UserResolver;
///
/// impl GraphQLResolver for UserResolver {
///     fn types(&self, _registry: &TypeRegistry) -> Result<Vec<WireType>, LoaderError> {
///         Ok(vec![
///             ObjectType::new("User")
///                 .field(ObjectField::new("id", WireType::int().non_null()))
///                 .into(),
///         ])
///     }
///
///     fn methods(&self) -> Vec<Method<Self>> {
///         vec![
///             Method::new("find", |this: &Self, args: &Arguments| this.find(args.get("id")?))
///                 .attribute(Query(OperationMeta::new("getUser", "User").non_null()))
///                 .param(Parameter::typed::<i32>("id")),
///         ]
///     }
/// }
/// ```
pub trait GraphQLResolver: Send + Sync + Sized + 'static {
    /// Types provided by this resolver.
    ///
    /// Called once when the resolver is registered; every returned type is
    /// registered before any operation is compiled. `registry` holds the
    /// types registered so far.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced type cannot be resolved.
    fn types(&self, registry: &TypeRegistry) -> Result<Vec<WireType>, LoaderError> {
        let _ = registry;
        Ok(Vec::new())
    }

    /// Argument group classes used by this resolver's grouped parameters.
    fn groups(&self) -> Vec<GroupClass> {
        Vec::new()
    }

    /// The method table. Methods without a query or mutation attribute are
    /// ignored.
    fn methods(&self) -> Vec<Method<Self>>;
}
