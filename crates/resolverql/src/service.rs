//! The service facade.
//!
//! A [`Service`] owns a fully populated [`Loader`] and the schema built from
//! it. The schema is built once, when the service is created; afterwards the
//! service only executes requests against it.

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response, Variables};
use tracing::{debug, error, info};

use crate::config::ServiceConfig;
use crate::error::LoaderError;
use crate::response::{DebugFlags, ExecutionResult};
use crate::schema::{Loader, ResolverSchemaBuilder};

/// Executes GraphQL requests against the schema built from a loader.
///
/// # Example
///
/// ```ignore
/// let mut loader = Loader::new();
/// loader.register_resolver(UserResolver)?;
///
/// let service = Service::new(loader)?;
/// let result = service
///     .process_query("query($id: Int!) { getUser(id: $id) { id } }", Some(json!({"id": 7})))
///     .await;
/// ```
pub struct Service {
    loader: Loader,
    schema: Schema,
    config: ServiceConfig,
    debug_mode: bool,
}

impl Service {
    /// Builds the schema with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be built.
    pub fn new(loader: Loader) -> Result<Self, LoaderError> {
        Self::with_config(loader, ServiceConfig::default())
    }

    /// Builds the schema with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the schema cannot
    /// be built.
    pub fn with_config(loader: Loader, config: ServiceConfig) -> Result<Self, LoaderError> {
        config.validate()?;

        let schema = ResolverSchemaBuilder::new(&loader, config.to_schema_builder_config())
            .build()
            .inspect_err(|e| {
                error!(code = e.error_code(), error = %e, "Failed to build GraphQL schema");
            })?;

        info!(
            resolvers = loader.resolver_count(),
            types = loader.registry().len(),
            "GraphQL service ready"
        );

        Ok(Self {
            loader,
            schema,
            debug_mode: config.debug,
            config,
        })
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }

    /// Executes a query or mutation and returns the JSON result.
    ///
    /// Errors raised while executing end up in the `errors` list of the
    /// result. Debug details are included only in debug mode.
    pub async fn process_query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> serde_json::Value {
        let mut request = Request::new(query);
        if let Some(variables) = variables {
            request = request.variables(Variables::from_json(variables));
        }

        self.execute_result(request).await.to_json()
    }

    /// Executes a request and converts the response, applying debug mode.
    pub async fn execute_result(&self, request: impl Into<Request>) -> ExecutionResult {
        let response = self.execute(request).await;
        ExecutionResult::from_response(response, DebugFlags::for_debug_mode(self.debug_mode))
    }

    /// Executes a request and returns the raw engine response.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into();
        debug!(
            operation_name = ?request.operation_name,
            "Executing GraphQL request"
        );
        self.schema.execute(request).await
    }

    /// Turns debug mode on or off.
    pub fn set_debug_mode(&mut self, value: bool) {
        self.debug_mode = value;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the schema in SDL form.
    #[must_use]
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("loader", &self.loader)
            .field("config", &self.config)
            .field("debug_mode", &self.debug_mode)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Service`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    loader: Option<Loader>,
    config: Option<ServiceConfig>,
    debug_mode: Option<bool>,
}

impl ServiceBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the loader.
    #[must_use]
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the configured debug mode.
    #[must_use]
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = Some(debug_mode);
        self
    }

    /// Builds the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader is missing or the schema cannot be
    /// built.
    pub fn build(self) -> Result<Service, ServiceBuilderError> {
        let loader = self
            .loader
            .ok_or(ServiceBuilderError::MissingField("loader"))?;

        let mut config = self.config.unwrap_or_default();
        if let Some(debug_mode) = self.debug_mode {
            config.debug = debug_mode;
        }

        Ok(Service::with_config(loader, config)?)
    }
}

/// Errors that can occur when building a Service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The schema could not be built.
    #[error(transparent)]
    Loader(#[from] LoaderError),
}
