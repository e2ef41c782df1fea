//! Log-search backend client.
//!
//! The backend exposes three read-only endpoints:
//!
//! - `GET /api/v2/splunk/data/GetSplunkData`: the current telemetry batch
//! - `GET /api/v2/splunk/data/getTransactionDetailsData`: search by transaction id
//! - `GET /api/v2/splunk/data/getAmountTransactionDetailsData`: search by amount
//!
//! Both transaction endpoints take an optional date range and answer with
//! either a single object or an array of hits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wirewatch_adapters::logsearch::LogSearchClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LogSearchClient::builder()
//!         .endpoint("https://payments-monitor.internal")
//!         .build()?;
//!
//!     let records = client.fetch_telemetry().await?;
//!     println!("Fetched {} telemetry records", records.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use wirewatch_types::{TelemetryRecord, TransactionDetail};

use crate::{AdapterError, RetryPolicy};

const TELEMETRY_PATH: &str = "/api/v2/splunk/data/GetSplunkData";
const TRANSACTION_BY_ID_PATH: &str = "/api/v2/splunk/data/getTransactionDetailsData";
const TRANSACTION_BY_AMOUNT_PATH: &str = "/api/v2/splunk/data/getAmountTransactionDetailsData";

/// Client for the log-search HTTP API.
#[derive(Debug, Clone)]
pub struct LogSearchClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl LogSearchClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> LogSearchClientBuilder {
        LogSearchClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current telemetry batch.
    pub async fn fetch_telemetry(&self) -> Result<Vec<TelemetryRecord>, AdapterError> {
        let request = self.client.get(self.url(TELEMETRY_PATH));
        self.send_json(request, "telemetry").await
    }

    /// Fetch the telemetry batch, retrying transient failures.
    pub async fn fetch_telemetry_with_retry(
        &self,
        policy: &RetryPolicy,
    ) -> Result<Vec<TelemetryRecord>, AdapterError> {
        let mut attempt = 0;
        loop {
            match self.fetch_telemetry().await {
                Ok(records) => return Ok(records),
                Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                    let delay = policy.delay(attempt);
                    warn!(
                        "telemetry fetch failed (attempt {}): {}; retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Search transaction details by transaction id.
    pub async fn transaction_by_id(
        &self,
        transaction_id: &str,
        date_start: Option<&str>,
        date_end: Option<&str>,
    ) -> Result<Vec<TransactionDetail>, AdapterError> {
        let mut query = vec![("transactionId", transaction_id)];
        query.extend(date_start.map(|d| ("datestart", d)));
        query.extend(date_end.map(|d| ("enddate", d)));

        let request = self.client.get(self.url(TRANSACTION_BY_ID_PATH)).query(&query);
        let hits: OneOrMany<TransactionDetail> = self.send_json(request, transaction_id).await?;
        Ok(hits.into_vec())
    }

    /// Search transaction details by amount.
    pub async fn transaction_by_amount(
        &self,
        amount: &str,
        date_start: Option<&str>,
        date_end: Option<&str>,
    ) -> Result<Vec<TransactionDetail>, AdapterError> {
        let mut query = vec![("amount", amount)];
        query.extend(date_start.map(|d| ("startdate", d)));
        query.extend(date_end.map(|d| ("enddate", d)));

        let request = self.client.get(self.url(TRANSACTION_BY_AMOUNT_PATH)).query(&query);
        let hits: OneOrMany<TransactionDetail> = self.send_json(request, amount).await?;
        Ok(hits.into_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, AdapterError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!("log-search {} answered {}", what, status);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AdapterError::Auth(format!("API returned status {}", status)));
            }
            StatusCode::BAD_REQUEST => {
                return Err(AdapterError::InvalidRequest(format!(
                    "backend rejected query for '{}'",
                    what
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(AdapterError::NotFound(format!("'{}' not found", what)));
            }
            s if !s.is_success() => {
                return Err(AdapterError::Http(format!("API returned status {}", s)));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }
}

/// Builder for LogSearchClient.
#[derive(Debug, Default)]
pub struct LogSearchClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl LogSearchClientBuilder {
    /// Set the API base URL (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Send a bearer token with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LogSearchClient, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        Ok(LogSearchClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: self.token,
        })
    }
}

/// The transaction endpoints answer with one object or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<Option<T>>),
    One(Option<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().flatten().collect(),
            OneOrMany::One(item) => item.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = LogSearchClient::builder().build().unwrap();
        assert_eq!(client.endpoint, "http://localhost:8080");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_builder_custom() {
        let client = LogSearchClient::builder()
            .endpoint("https://monitor.local/")
            .token("secret")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(client.endpoint, "https://monitor.local");
        assert_eq!(client.token.as_deref(), Some("secret"));
        assert_eq!(
            client.url(TELEMETRY_PATH),
            "https://monitor.local/api/v2/splunk/data/GetSplunkData"
        );
    }

    #[test]
    fn test_one_or_many_single_object() {
        let hits: OneOrMany<TransactionDetail> =
            serde_json::from_str(r#"{"aitNumber": "11554", "_raw": {}}"#).unwrap();
        let hits = hits.into_vec();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ait_number, "11554");
    }

    #[test]
    fn test_one_or_many_array_skips_nulls() {
        let hits: OneOrMany<TransactionDetail> =
            serde_json::from_str(r#"[{"aitNumber": "1"}, null, {"aitNumber": "2"}]"#).unwrap();
        let ids: Vec<String> = hits.into_vec().into_iter().map(|h| h.ait_number).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_one_or_many_null() {
        let hits: OneOrMany<TransactionDetail> = serde_json::from_str("null").unwrap();
        assert!(hits.into_vec().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let client = LogSearchClient::builder()
            .endpoint("http://127.0.0.1:9")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        let err = client
            .fetch_telemetry_with_retry(&RetryPolicy::none())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
