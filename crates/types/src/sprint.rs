//! Sprint window representation

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single sprint's number and date range.
///
/// `start` sits at 00:00:00.000 of the first day and `end` at 23:59:59.999999
/// of the last day, so consecutive windows partition time with no gaps or
/// overlaps. Windows are always derived from the calendar's reference anchor,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SprintWindow {
	/// Sprint number, offset from the reference anchor
	pub number: i64,
	/// First instant of the sprint (inclusive)
	pub start: DateTime<Utc>,
	/// Last representable instant of the sprint (inclusive)
	pub end: DateTime<Utc>,
}

impl SprintWindow {
	/// Whether the given calendar date falls inside this window
	pub fn contains(&self, date: NaiveDate) -> bool {
		self.start.date_naive() <= date && date <= self.end.date_naive()
	}

	/// Number of whole days covered by this window
	pub fn length_days(&self) -> i64 {
		(self.end.date_naive() - self.start.date_naive()).num_days() + 1
	}
}

impl std::fmt::Display for SprintWindow {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Sprint {} ({} to {})",
			self.number,
			self.start.format("%d %b %Y %H:%M:%S"),
			self.end.format("%d %b %Y %H:%M:%S")
		)
	}
}
