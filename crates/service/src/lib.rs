//! fleetmon service
//!
//! Domain logic between the API client and the report assembler: mapping
//! dates to sprint windows, reducing raw series to summaries and anomalies,
//! and fanning collection out across an instance roster.

pub mod aggregator;
pub mod calendar;
pub mod collector;

pub use aggregator::aggregate;
pub use calendar::SprintCalendar;
pub use collector::CollectorService;
