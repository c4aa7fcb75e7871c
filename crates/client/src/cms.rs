//! Signed HTTP client for the cloud monitor RPC endpoint

use async_trait::async_trait;
use chrono::Utc;
use fleetmon_types::{ClientError, ClientResult};
use reqwest::header::{HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::monitor::{normalize_datapoints, Datapoint, MetricListResponse, MetricQuery, MonitorClient};
use crate::signer::sign_request;

const ACTION: &str = "DescribeMetricList";
const API_VERSION: &str = "2019-01-01";

/// Cloud monitor service client.
///
/// Issues RPC-style GET requests with HMAC-SHA1 request signing. One client
/// per run; the underlying reqwest client pools connections and applies the
/// per-request timeout.
pub struct CmsClient {
	http: reqwest::Client,
	endpoint: Url,
	region: String,
	access_key_id: String,
	access_key_secret: String,
}

impl CmsClient {
	/// Create a client against the given endpoint with a per-request timeout
	pub fn new(
		endpoint: &str,
		region: String,
		access_key_id: String,
		access_key_secret: String,
		timeout: Duration,
	) -> ClientResult<Self> {
		let endpoint = Url::parse(endpoint).map_err(|e| ClientError::InvalidEndpoint {
			url: endpoint.to_string(),
			reason: e.to_string(),
		})?;

		let mut headers = HeaderMap::new();
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert("User-Agent", HeaderValue::from_static("fleetmon/0.1"));

		let http = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(timeout)
			.build()?;

		Ok(Self {
			http,
			endpoint,
			region,
			access_key_id,
			access_key_secret,
		})
	}

	/// Common RPC parameters plus the query-specific ones, unsigned
	fn request_params(&self, query: &MetricQuery) -> BTreeMap<String, String> {
		let mut params = BTreeMap::new();
		params.insert("Action".to_string(), ACTION.to_string());
		params.insert("Version".to_string(), API_VERSION.to_string());
		params.insert("Format".to_string(), "JSON".to_string());
		params.insert("AccessKeyId".to_string(), self.access_key_id.clone());
		params.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
		params.insert("SignatureVersion".to_string(), "1.0".to_string());
		params.insert("SignatureNonce".to_string(), Uuid::new_v4().to_string());
		params.insert(
			"Timestamp".to_string(),
			Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
		);
		params.insert("RegionId".to_string(), self.region.clone());
		params.insert("Namespace".to_string(), query.namespace.clone());
		params.insert("MetricName".to_string(), query.metric_name.clone());
		params.insert("StartTime".to_string(), query.start_ms.to_string());
		params.insert("EndTime".to_string(), query.end_ms.to_string());
		params.insert("Dimensions".to_string(), query.dimensions());
		params.insert("Period".to_string(), query.period.clone());
		params
	}
}

#[async_trait]
impl MonitorClient for CmsClient {
	async fn describe_metric_list(&self, query: &MetricQuery) -> ClientResult<Vec<Datapoint>> {
		let mut params = self.request_params(query);
		let signature = sign_request("GET", &params, &self.access_key_secret)?;
		params.insert("Signature".to_string(), signature);

		debug!(
			namespace = %query.namespace,
			metric = %query.metric_name,
			instance = %query.instance_id,
			start_ms = query.start_ms,
			end_ms = query.end_ms,
			"requesting metric chunk"
		);

		let response = self
			.http
			.get(self.endpoint.clone())
			.query(&params)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(ClientError::Api {
				code: status.as_u16().to_string(),
				message: body,
			});
		}

		let parsed: MetricListResponse =
			serde_json::from_str(&body).map_err(|e| ClientError::MalformedBody {
				reason: format!("response is not valid JSON: {}", e),
			})?;

		if let Some(code) = &parsed.code {
			if code != "200" {
				return Err(ClientError::Api {
					code: code.clone(),
					message: parsed.message.unwrap_or_default(),
				});
			}
		}

		normalize_datapoints(parsed.datapoints.as_ref())
	}
}
