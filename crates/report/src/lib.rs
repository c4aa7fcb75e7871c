//! fleetmon report
//!
//! Turns collected sprint metrics into deliverables: per-target utilization
//! charts and a markdown report document referencing them.

pub mod chart;
pub mod document;

pub use chart::ChartArtifact;
pub use document::{ReportAssembler, RenderedReport};
