//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use chrono::NaiveDate;
use fleetmon_types::{Instance, MetricDefinition, MetricKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub credentials: CredentialSettings,
	pub api: ApiSettings,
	pub sprint: SprintSettings,
	pub fetch: FetchSettings,
	/// Environment name -> static instance roster
	pub environments: BTreeMap<String, RosterSettings>,
	pub metrics: MetricTables,
	pub report: ReportSettings,
	pub logging: LoggingSettings,
}

/// Monitoring API credentials
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CredentialSettings {
	pub access_key_id: ConfigurableValue,
	pub access_key_secret: ConfigurableValue,
}

impl Default for CredentialSettings {
	fn default() -> Self {
		Self {
			access_key_id: ConfigurableValue::from_env("FLEETMON_ACCESS_KEY_ID"),
			access_key_secret: ConfigurableValue::from_env("FLEETMON_ACCESS_KEY_SECRET"),
		}
	}
}

/// Monitoring API endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
	/// Base URL of the metrics RPC endpoint
	pub endpoint: String,
	pub region: String,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			endpoint: "https://metrics.cn-hongkong.aliyuncs.com".to_string(),
			region: "cn-hongkong".to_string(),
		}
	}
}

/// Sprint calendar anchor configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SprintSettings {
	/// Sprint number of the reference anchor
	pub reference_number: i64,
	/// First day of the reference sprint
	pub reference_start: NaiveDate,
	/// Whole days per sprint
	pub length_days: i64,
}

impl Default for SprintSettings {
	fn default() -> Self {
		Self {
			reference_number: 15,
			// Sprint 15 started on 13 Feb 2025
			reference_start: NaiveDate::from_ymd_opt(2025, 2, 13)
				.unwrap_or(NaiveDate::MIN),
			length_days: 14,
		}
	}
}

/// Fetcher and HTTP client tuning
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FetchSettings {
	/// Chunk length for range-limited metric requests, in days
	pub chunk_days: i64,
	/// Aggregation period forwarded to the API verbatim
	pub period: String,
	/// Per-request timeout in milliseconds
	pub request_timeout_ms: u64,
	/// Ceiling on concurrently in-flight metric requests
	pub max_concurrent_requests: usize,
}

impl Default for FetchSettings {
	fn default() -> Self {
		Self {
			chunk_days: 3,
			period: "7200".to_string(),
			request_timeout_ms: 10_000,
			max_concurrent_requests: 4,
		}
	}
}

/// One instance entry in the roster
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstanceEntry {
	pub id: String,
	pub name: String,
}

impl From<&InstanceEntry> for Instance {
	fn from(entry: &InstanceEntry) -> Self {
		Instance::new(entry.id.clone(), entry.name.clone())
	}
}

/// Static roster for one environment, split by role
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RosterSettings {
	pub web: Vec<InstanceEntry>,
	pub app: Vec<InstanceEntry>,
	pub database: Vec<InstanceEntry>,
}

impl RosterSettings {
	/// Web and app instances combined, in declaration order
	pub fn servers(&self) -> Vec<Instance> {
		self.web.iter().chain(self.app.iter()).map(Instance::from).collect()
	}

	pub fn databases(&self) -> Vec<Instance> {
		self.database.iter().map(Instance::from).collect()
	}
}

/// One metric definition entry in the metric tables
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricDefinitionEntry {
	pub namespace: String,
	pub metric_name: String,
	pub unit: String,
}

impl From<&MetricDefinitionEntry> for MetricDefinition {
	fn from(entry: &MetricDefinitionEntry) -> Self {
		MetricDefinition::new(&entry.namespace, &entry.metric_name, &entry.unit)
	}
}

/// Metric tables per target kind, keyed by metric kind ("cpu", "memory")
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MetricTables {
	pub server: BTreeMap<String, MetricDefinitionEntry>,
	pub database: BTreeMap<String, MetricDefinitionEntry>,
}

impl Default for MetricTables {
	fn default() -> Self {
		let mut server = BTreeMap::new();
		server.insert(
			"cpu".to_string(),
			MetricDefinitionEntry {
				namespace: "acs_ecs_dashboard".to_string(),
				metric_name: "CPUUtilization".to_string(),
				unit: "%".to_string(),
			},
		);
		server.insert(
			"memory".to_string(),
			MetricDefinitionEntry {
				namespace: "acs_ecs_dashboard".to_string(),
				metric_name: "memory_usedutilization".to_string(),
				unit: "%".to_string(),
			},
		);

		let mut database = BTreeMap::new();
		database.insert(
			"cpu".to_string(),
			MetricDefinitionEntry {
				namespace: "acs_rds_dashboard".to_string(),
				metric_name: "CpuUsage".to_string(),
				unit: "%".to_string(),
			},
		);
		database.insert(
			"memory".to_string(),
			MetricDefinitionEntry {
				namespace: "acs_rds_dashboard".to_string(),
				metric_name: "MemoryUsage".to_string(),
				unit: "%".to_string(),
			},
		);

		Self { server, database }
	}
}

/// Report document options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
	/// Document title; also drives the output filename
	pub title: String,
	/// Incident notes included verbatim in the report
	pub incidents: Vec<String>,
	/// Recommendation notes included verbatim in the report
	pub recommendations: Vec<String>,
}

impl Default for ReportSettings {
	fn default() -> Self {
		Self {
			title: "Cloud Resources Utilization Report".to_string(),
			incidents: Vec::new(),
			recommendations: Vec::new(),
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Settings validation and lookup failures
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("credential error: {0}")]
	Credential(#[from] ConfigurableValueError),

	#[error("no environments configured")]
	NoEnvironments,

	#[error("environment '{environment}' has an empty {role} roster")]
	EmptyRoster {
		environment: String,
		role: &'static str,
	},

	#[error("unknown metric kind '{key}' in metric table")]
	UnknownMetricKind { key: String },

	#[error("sprint length must be at least 1 day, got {0}")]
	InvalidSprintLength(i64),
}

impl Settings {
	/// Validate everything that must hold before any network activity.
	///
	/// Credential resolution happens here so a missing environment variable
	/// fails the run up front rather than on the first signed request.
	pub fn validate(&self) -> Result<(), SettingsError> {
		self.credentials.access_key_id.resolve()?;
		self.credentials.access_key_secret.resolve()?;

		if self.sprint.length_days < 1 {
			return Err(SettingsError::InvalidSprintLength(self.sprint.length_days));
		}

		if self.environments.is_empty() {
			return Err(SettingsError::NoEnvironments);
		}
		for (environment, roster) in &self.environments {
			if roster.servers().is_empty() {
				return Err(SettingsError::EmptyRoster {
					environment: environment.clone(),
					role: "server",
				});
			}
			if roster.databases().is_empty() {
				return Err(SettingsError::EmptyRoster {
					environment: environment.clone(),
					role: "database",
				});
			}
		}

		self.server_metrics()?;
		self.database_metrics()?;
		Ok(())
	}

	/// Server metric table keyed by parsed metric kind
	pub fn server_metrics(&self) -> Result<BTreeMap<MetricKind, MetricDefinition>, SettingsError> {
		Self::parse_metric_table(&self.metrics.server)
	}

	/// Database metric table keyed by parsed metric kind
	pub fn database_metrics(
		&self,
	) -> Result<BTreeMap<MetricKind, MetricDefinition>, SettingsError> {
		Self::parse_metric_table(&self.metrics.database)
	}

	fn parse_metric_table(
		table: &BTreeMap<String, MetricDefinitionEntry>,
	) -> Result<BTreeMap<MetricKind, MetricDefinition>, SettingsError> {
		let mut parsed = BTreeMap::new();
		for (key, entry) in table {
			let kind = MetricKind::from_str(key)
				.map_err(|_| SettingsError::UnknownMetricKind { key: key.clone() })?;
			parsed.insert(kind, MetricDefinition::from(entry));
		}
		Ok(parsed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn settings_with_roster() -> Settings {
		let mut settings = Settings {
			credentials: CredentialSettings {
				access_key_id: ConfigurableValue::from_plain("id"),
				access_key_secret: ConfigurableValue::from_plain("secret"),
			},
			..Settings::default()
		};
		settings.environments.insert(
			"DEV".to_string(),
			RosterSettings {
				web: vec![InstanceEntry {
					id: "i-web".to_string(),
					name: "DEV-WEB".to_string(),
				}],
				app: vec![InstanceEntry {
					id: "i-app".to_string(),
					name: "DEV-APP".to_string(),
				}],
				database: vec![InstanceEntry {
					id: "rm-db".to_string(),
					name: "DEV-RDS".to_string(),
				}],
			},
		);
		settings
	}

	#[test]
	fn default_metric_tables_cover_cpu_and_memory() {
		let settings = settings_with_roster();
		let server = settings.server_metrics().unwrap();
		assert_eq!(server.len(), 2);
		assert_eq!(server[&MetricKind::Cpu].metric_name, "CPUUtilization");
		assert_eq!(server[&MetricKind::Cpu].unit, "%");

		let database = settings.database_metrics().unwrap();
		assert_eq!(database[&MetricKind::Memory].metric_name, "MemoryUsage");
	}

	#[test]
	fn validate_accepts_complete_settings() {
		assert!(settings_with_roster().validate().is_ok());
	}

	#[test]
	fn validate_rejects_missing_environments() {
		let mut settings = settings_with_roster();
		settings.environments.clear();
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::NoEnvironments)
		));
	}

	#[test]
	fn validate_rejects_empty_server_roster() {
		let mut settings = settings_with_roster();
		if let Some(roster) = settings.environments.get_mut("DEV") {
			roster.web.clear();
			roster.app.clear();
		}
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::EmptyRoster { role: "server", .. })
		));
	}

	#[test]
	fn validate_rejects_unknown_metric_kind() {
		let mut settings = settings_with_roster();
		settings.metrics.server.insert(
			"disk".to_string(),
			MetricDefinitionEntry {
				namespace: "acs_ecs_dashboard".to_string(),
				metric_name: "DiskUsage".to_string(),
				unit: "%".to_string(),
			},
		);
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::UnknownMetricKind { .. })
		));
	}

	#[test]
	fn servers_combines_web_and_app_in_order() {
		let settings = settings_with_roster();
		let servers = settings.environments["DEV"].servers();
		assert_eq!(servers.len(), 2);
		assert_eq!(servers[0].name, "DEV-WEB");
		assert_eq!(servers[1].name, "DEV-APP");
	}

	#[test]
	fn sprint_defaults_match_reference_anchor() {
		let sprint = SprintSettings::default();
		assert_eq!(sprint.reference_number, 15);
		assert_eq!(
			sprint.reference_start,
			NaiveDate::from_ymd_opt(2025, 2, 13).unwrap()
		);
		assert_eq!(sprint.length_days, 14);
	}
}
