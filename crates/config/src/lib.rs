//! fleetmon configuration
//!
//! Settings structures plus file/environment loading. Everything the
//! collector and calendar need - rosters, metric tables, sprint anchor,
//! credentials - is explicit configuration passed in from here rather than
//! process-wide constants, so tests can run against synthetic rosters.

pub mod configurable_value;
pub mod loader;
pub mod settings;

pub use config::ConfigError;
pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::load_config;
pub use settings::{
	ApiSettings, CredentialSettings, FetchSettings, InstanceEntry, LogFormat, LoggingSettings,
	MetricDefinitionEntry, MetricTables, ReportSettings, RosterSettings, Settings, SettingsError,
	SprintSettings,
};
