//! # wirewatch-adapters
//!
//! Client for the log-search backend that feeds the wire-transfer dashboard.
//!
//! The backend serves two kinds of data:
//!
//! - **Telemetry** - one record per (system, peer) flow, carrying traffic and
//!   trend indicators plus volume statistics
//! - **Transaction details** - log hits for a single transfer, searched by
//!   transaction id or by amount within an optional date range
//!
//! The HTTP client lives behind the `http` feature so the error and retry
//! types can be used without pulling in an HTTP stack.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use wirewatch_adapters::{logsearch::LogSearchClient, RetryPolicy};
//!
//! let client = LogSearchClient::builder()
//!     .endpoint("http://localhost:8080")
//!     .build()?;
//!
//! let records = client
//!     .fetch_telemetry_with_retry(&RetryPolicy::default())
//!     .await?;
//! println!("Fetched {} records", records.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod retry;

#[cfg(feature = "http")]
pub mod logsearch;

pub use error::AdapterError;
pub use retry::RetryPolicy;

// Re-export types for convenience
pub use wirewatch_types::{RawTransaction, TelemetryRecord, TransactionDetail};
