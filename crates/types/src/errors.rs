//! Error taxonomy for the collection pipeline

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;
pub type CollectResult<T> = Result<T, CollectError>;

/// Errors from the monitoring API client and the time-chunked fetcher.
///
/// A failed chunk fails the whole series: a report silently missing data is
/// worse than a report that fails loudly, so there is no partial-success
/// suppression here.
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("monitor API error {code}: {message}")]
	Api { code: String, message: String },

	#[error("malformed response body: {reason}")]
	MalformedBody { reason: String },

	#[error("invalid endpoint '{url}': {reason}")]
	InvalidEndpoint { url: String, reason: String },

	#[error("request signing failed: {0}")]
	Signing(String),
}

/// Errors from the multi-instance collector.
#[derive(Debug, Error)]
pub enum CollectError {
	#[error("fetch failed for instance '{instance}', metric '{metric}': {source}")]
	Fetch {
		instance: String,
		metric: String,
		#[source]
		source: ClientError,
	},

	#[error("instance roster is empty")]
	EmptyRoster,

	#[error("no metric definitions configured")]
	EmptyMetricTable,
}
