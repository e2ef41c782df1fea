//! Data source abstraction for receiving telemetry batches.
//!
//! A source hands the TUI the latest batch of telemetry records whenever one
//! is available. Sources never block and never panic; failures are kept as
//! a message for the status bar.

mod channel;
mod file;
mod http;
mod search;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::HttpSource;
pub use search::SearchTask;

use std::fmt::Debug;

use wirewatch_types::TelemetryRecord;

/// One poll's worth of telemetry records.
pub type TelemetryBatch = Vec<TelemetryRecord>;

/// Trait for receiving telemetry from various sources.
///
/// # Example
///
/// ```
/// use wirewatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("telemetry.json");
/// if let Some(batch) = source.poll() {
///     println!("Got {} records", batch.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest batch.
    ///
    /// Returns `Some(batch)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<TelemetryBatch>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the most recent poll, if it failed.
    fn error(&self) -> Option<String>;
}
