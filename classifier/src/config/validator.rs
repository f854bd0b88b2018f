use crate::config::error::{ConfigError, Result};
use crate::config::loader::ScreenConfig;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// Validates merged configuration against the embedded JSON Schema.
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    pub fn new() -> Result<Self> {
        let schema_str = include_str!("schemas/screen_config.schema.json");
        let schema_value: Value = serde_json::from_str(schema_str).map_err(|e| {
            ConfigError::SchemaValidationError(format!("Failed to parse config schema: {e}"))
        })?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| {
                ConfigError::SchemaValidationError(format!("Failed to compile config schema: {e}"))
            })?;

        Ok(Self { schema })
    }

    /// Validate a configuration, reporting every failure with its path.
    pub fn validate(&self, config: &ScreenConfig) -> Result<()> {
        let value = serde_json::to_value(config).map_err(|e| {
            ConfigError::SchemaValidationError(format!("Failed to serialize config: {e}"))
        })?;

        if let Err(errors) = self.schema.validate(&value) {
            let messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    let path = if path.is_empty() {
                        "root".to_string()
                    } else {
                        path
                    };
                    format!("{e} at '{path}'")
                })
                .collect();

            return Err(ConfigError::SchemaValidationError(format!(
                "Configuration validation failed ({} error{}):\n  - {}",
                messages.len(),
                if messages.len() == 1 { "" } else { "s" },
                messages.join("\n  - ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let validator = SchemaValidator::new().expect("schema compiles");
        let result = validator.validate(&ScreenConfig::default());
        assert!(result.is_ok(), "default config should be valid: {result:?}");
    }

    #[test]
    fn threshold_above_one_is_rejected() {
        let mut config = ScreenConfig::default();
        config.review.confidence_threshold = 1.5;
        let err = SchemaValidator::new()
            .expect("schema compiles")
            .validate(&config)
            .unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidationError(_)));
        assert!(err.to_string().contains("/review/confidence_threshold"));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let mut config = ScreenConfig::default();
        config.review.confidence_threshold = -0.1;
        let validator = SchemaValidator::new().expect("schema compiles");
        assert!(validator.validate(&config).is_err());
    }

    #[test]
    fn empty_log_filter_is_rejected() {
        let mut config = ScreenConfig::default();
        config.logging.filter = String::new();
        let err = SchemaValidator::new()
            .expect("schema compiles")
            .validate(&config)
            .unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn multiple_errors_are_reported_together() {
        let mut config = ScreenConfig::default();
        config.review.confidence_threshold = 2.0;
        config.logging.filter = String::new();
        let err = SchemaValidator::new()
            .expect("schema compiles")
            .validate(&config)
            .unwrap_err();
        assert!(err.to_string().contains("2 errors"));
    }
}
