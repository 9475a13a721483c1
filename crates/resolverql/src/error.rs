//! Error types for schema construction.
//!
//! Everything in here is a configuration error: it is raised while resolvers
//! are registered or while the schema is assembled, and it aborts the build.
//! Errors raised by resolver code during execution are plain
//! [`async_graphql::Error`] values and end up in the response payload instead.

use std::fmt;

/// Errors that can occur while compiling resolvers into a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// A type name is neither a built-in scalar nor a registered type.
    TypeNotFound(String),

    /// A grouped argument names a container class that was never registered.
    GroupNotFound(String),

    /// A parameter or property has neither a declared type nor a type override.
    UntypedMember {
        /// Owner of the member (`Resolver::method` or group class name).
        owner: String,
        /// Member name.
        member: String,
    },

    /// The GraphQL engine rejected the assembled schema.
    SchemaBuildFailed(String),

    /// Service configuration is invalid.
    InvalidConfig(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNotFound(name) => {
                write!(f, "Type '{name}' is not found!")
            }
            Self::GroupNotFound(name) => {
                write!(f, "Group class '{name}' is not registered")
            }
            Self::UntypedMember { owner, member } => {
                write!(
                    f,
                    "{owner}.{member} has no declared type and no type override"
                )
            }
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidConfig(msg) => {
                write!(f, "Invalid configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for LoaderError {}

impl LoaderError {
    /// Creates a `TypeNotFound` error for the given name.
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound(name.into())
    }

    /// Returns a stable error code, recorded when the error is logged.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TypeNotFound(_) => "TYPE_NOT_FOUND",
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::UntypedMember { .. } => "UNTYPED_MEMBER",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
