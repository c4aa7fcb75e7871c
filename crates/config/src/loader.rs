//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File};

/// Load configuration from a config file plus `FLEETMON_*` environment
/// overrides.
///
/// With no explicit path the default `config/config.*` file is optional and
/// built-in defaults apply; an explicitly requested file must exist.
pub fn load_config(path: Option<&str>) -> Result<Settings, ConfigError> {
	let builder = match path {
		Some(path) => Config::builder().add_source(File::with_name(path)),
		None => Config::builder().add_source(File::with_name("config/config").required(false)),
	};

	let s = builder
		.add_source(
			Environment::with_prefix("FLEETMON")
				.separator("__")
				.try_parsing(true),
		)
		.build()?;

	s.try_deserialize()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_default_file_falls_back_to_defaults() {
		let settings = load_config(None).expect("defaults should load");
		assert_eq!(settings.fetch.chunk_days, 3);
		assert_eq!(settings.fetch.period, "7200");
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		assert!(load_config(Some("definitely/not/a/config")).is_err());
	}
}
