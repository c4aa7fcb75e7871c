//! Monitored instance identity

use serde::{Deserialize, Serialize};

/// A monitored instance from the static roster.
///
/// Pure configuration, never derived data: the id is the opaque identifier
/// the monitoring API filters on and the name is what the report shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
	/// Opaque instance identifier, e.g. "i-2zeabc..." or "rm-uf6abc..."
	pub id: String,
	/// Human-readable display name, e.g. "UAT-WEB-1"
	pub name: String,
}

impl Instance {
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

impl std::fmt::Display for Instance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.name, self.id)
	}
}
