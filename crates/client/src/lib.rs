//! fleetmon client
//!
//! The monitoring API boundary: a [`MonitorClient`] trait as the test seam,
//! the signed HTTP implementation against the cloud monitor RPC endpoint,
//! and the time-chunked fetcher that splits a sprint-length range into
//! API-sized requests and concatenates the partial series.

pub mod cms;
pub mod fetcher;
pub mod monitor;
pub mod signer;

pub use cms::CmsClient;
pub use fetcher::MetricFetcher;
pub use monitor::{Datapoint, MetricQuery, MonitorClient};
