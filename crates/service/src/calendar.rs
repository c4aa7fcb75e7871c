//! Sprint calendar
//!
//! Every sprint window is derived arithmetically from a single reference
//! anchor (a known sprint number and its start date). Nothing is persisted,
//! so two runs with the same configuration always agree on the mapping.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use fleetmon_types::SprintWindow;

/// Maps dates and sprint numbers to sprint windows.
#[derive(Debug, Clone)]
pub struct SprintCalendar {
	reference_number: i64,
	reference_start: NaiveDate,
	length_days: i64,
}

impl SprintCalendar {
	/// Create a calendar anchored at `reference_start` being day one of
	/// sprint `reference_number`. Lengths below one day are clamped.
	pub fn new(reference_number: i64, reference_start: NaiveDate, length_days: i64) -> Self {
		Self {
			reference_number,
			reference_start,
			length_days: length_days.max(1),
		}
	}

	/// The window containing the given date.
	///
	/// Floor division keeps dates before the anchor well-defined: they map to
	/// earlier (possibly non-positive) sprint numbers rather than rounding
	/// toward the anchor from both sides.
	pub fn window_for_date(&self, date: NaiveDate) -> SprintWindow {
		let elapsed_days = (date - self.reference_start).num_days();
		self.window_at_offset(elapsed_days.div_euclid(self.length_days))
	}

	/// The window of an explicitly numbered sprint
	pub fn window_for_sprint(&self, number: i64) -> SprintWindow {
		self.window_at_offset(number - self.reference_number)
	}

	/// Resolve the reporting window: an explicit sprint number wins,
	/// otherwise the sprint containing `today`
	pub fn window(&self, today: NaiveDate, sprint_override: Option<i64>) -> SprintWindow {
		match sprint_override {
			Some(number) => self.window_for_sprint(number),
			None => self.window_for_date(today),
		}
	}

	fn window_at_offset(&self, offset: i64) -> SprintWindow {
		let start_date = self.reference_start + Duration::days(offset * self.length_days);
		let end_date = start_date + Duration::days(self.length_days - 1);

		let start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
		let end_time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
			.unwrap_or(NaiveTime::MIN);
		let end = Utc.from_utc_datetime(&end_date.and_time(end_time));

		SprintWindow {
			number: self.reference_number + offset,
			start,
			end,
		}
	}
}
