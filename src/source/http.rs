//! HTTP data source backed by the log-search backend.
//!
//! A background tokio task fetches the telemetry batch every refresh
//! interval and publishes it through a watch channel. The TUI thread polls
//! the channel without blocking.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use wirewatch_adapters::logsearch::LogSearchClient;
use wirewatch_adapters::RetryPolicy;

use super::{DataSource, TelemetryBatch};

/// A data source that polls the log-search backend over HTTP.
///
/// Must be created from within a tokio runtime. The polling task stops when
/// the source is dropped.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wirewatch::{DataSource, HttpSource};
/// use wirewatch_adapters::logsearch::LogSearchClient;
/// use wirewatch_adapters::RetryPolicy;
///
/// # tokio_test::block_on(async {
/// let client = LogSearchClient::builder()
///     .endpoint("https://payments-monitor.internal")
///     .build()
///     .unwrap();
/// let mut source = HttpSource::spawn(client, Duration::from_secs(30), RetryPolicy::default());
/// let batch = source.poll();
/// # });
/// ```
#[derive(Debug)]
pub struct HttpSource {
    receiver: watch::Receiver<TelemetryBatch>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Start polling `client` every `interval`, retrying failed fetches per `retry`.
    pub fn spawn(client: LogSearchClient, interval: Duration, retry: RetryPolicy) -> Self {
        let description = format!("http: {}", client.endpoint());
        let (tx, receiver) = watch::channel(TelemetryBatch::default());
        let last_error = Arc::new(Mutex::new(None));

        let task = tokio::spawn(poll_loop(client, interval, retry, tx, Arc::clone(&last_error)));

        Self {
            receiver,
            description,
            last_error,
            task,
        }
    }
}

async fn poll_loop(
    client: LogSearchClient,
    interval: Duration,
    retry: RetryPolicy,
    tx: watch::Sender<TelemetryBatch>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        match client.fetch_telemetry_with_retry(&retry).await {
            Ok(batch) => {
                info!("fetched {} telemetry records from {}", batch.len(), client.endpoint());
                *last_error.lock() = None;
                if tx.send(batch).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("telemetry fetch from {} failed: {}", client.endpoint(), e);
                *last_error.lock() = Some(e.to_string());
            }
        }

        if tx.is_closed() {
            break;
        }
        tokio::time::sleep(interval).await;
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<TelemetryBatch> {
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_source_records_fetch_error() {
        let client = LogSearchClient::builder()
            .endpoint("http://127.0.0.1:9")
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let mut source =
            HttpSource::spawn(client, Duration::from_secs(60), RetryPolicy::none());
        assert_eq!(source.description(), "http: http://127.0.0.1:9");

        let mut error = None;
        for _ in 0..50 {
            error = source.error();
            if error.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert!(error.is_some());
        assert!(source.poll().is_none());
    }
}
