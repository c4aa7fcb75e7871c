//! Configurable value types that can load from environment variables or plain values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configurable value that can be loaded from environment variables or plain values.
///
/// Credentials accept exactly two shapes: `{"type": "env", "value": "VAR"}`
/// reads the named environment variable at resolve time, `{"type": "plain",
/// "value": "..."}` uses the value directly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	/// Type of value: "env" for environment variable, "plain" for direct value
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// The value: either environment variable name or the actual value
	pub value: String,
}

/// Type of configurable value
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	/// Load value from environment variable (name specified in `value` field)
	Env,
	/// Use the value directly from the `value` field
	Plain,
}

impl ConfigurableValue {
	/// Create a new environment variable reference
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	/// Create a new plain value
	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve the actual value based on the type
	///
	/// For `Env` type, reads from environment variable.
	/// For `Plain` type, returns the value directly.
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			}),
			ValueType::Plain => {
				if self.value.is_empty() {
					Err(ConfigurableValueError::EmptyValue)
				} else {
					Ok(self.value.clone())
				}
			},
		}
	}

	/// Get a description of this configurable value for logging
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

/// Errors that can occur when resolving configurable values
#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Configured value is empty")]
	EmptyValue,
}

// Custom Display implementation to avoid showing sensitive data in logs
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		// If the string starts with "env:", treat it as an environment variable
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}

impl From<String> for ConfigurableValue {
	fn from(value: String) -> Self {
		ConfigurableValue::from(value.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn test_plain_value() {
		let config = ConfigurableValue::from_plain("test-key");
		assert_eq!(config.value_type, ValueType::Plain);
		assert_eq!(config.resolve().unwrap(), "test-key");
	}

	#[test]
	fn test_env_value() {
		env::set_var("FLEETMON_TEST_KEY", "key-from-env");

		let config = ConfigurableValue::from_env("FLEETMON_TEST_KEY");
		assert_eq!(config.value_type, ValueType::Env);
		assert_eq!(config.resolve().unwrap(), "key-from-env");

		env::remove_var("FLEETMON_TEST_KEY");
	}

	#[test]
	fn test_env_value_not_found() {
		let config = ConfigurableValue::from_env("FLEETMON_NON_EXISTENT_VAR");
		assert!(config.resolve().is_err());
	}

	#[test]
	fn test_empty_plain_value_is_an_error() {
		let config = ConfigurableValue::from_plain("");
		assert!(matches!(
			config.resolve(),
			Err(ConfigurableValueError::EmptyValue)
		));
	}

	#[test]
	fn test_from_string_conversion() {
		let plain_config = ConfigurableValue::from("plain-value");
		assert_eq!(plain_config.value_type, ValueType::Plain);

		let env_config = ConfigurableValue::from("env:MY_KEY");
		assert_eq!(env_config.value_type, ValueType::Env);
		assert_eq!(env_config.value, "MY_KEY");
	}

	#[test]
	fn test_display_redacts_plain_values() {
		let plain = ConfigurableValue::from_plain("secret");
		assert_eq!(plain.to_string(), "plain:[REDACTED]");

		let env_ref = ConfigurableValue::from_env("MY_KEY");
		assert_eq!(env_ref.to_string(), "env:MY_KEY");
	}
}
