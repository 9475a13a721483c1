//! Service configuration.
//!
//! Configuration is read from TOML. Every field is optional.
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LoaderError;
use crate::schema::SchemaBuilderConfig;

/// Configuration for [`Service`](crate::Service).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Include debug message and trace details in error responses.
    /// Default: false
    #[serde(default)]
    pub debug: bool,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl ServiceConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::InvalidConfig` if the text is not valid TOML or
    /// the values fail validation.
    pub fn from_toml_str(text: &str) -> Result<Self, LoaderError> {
        let config: Self =
            toml::from_str(text).map_err(|e| LoaderError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is zero.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.max_depth == 0 {
            return Err(LoaderError::InvalidConfig("max_depth must be > 0".into()));
        }
        if self.max_complexity == 0 {
            return Err(LoaderError::InvalidConfig(
                "max_complexity must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Converts this config to a `SchemaBuilderConfig`.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert!(!config.debug);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_limits() {
        let mut config = ServiceConfig::default();
        config.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.max_complexity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ServiceConfig::from_toml_str(
            r#"
            debug = true
            max_depth = 20
        "#,
        )
        .unwrap();
        assert!(config.debug);
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
    }

    #[test]
    fn test_from_toml_rejects_zero_depth() {
        let err = ServiceConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_schema_builder_config() {
        let config = ServiceConfig {
            introspection: false,
            ..Default::default()
        };
        let builder_config = config.to_schema_builder_config();
        assert!(!builder_config.introspection_enabled);
        assert_eq!(builder_config.max_depth, 15);
    }
}
