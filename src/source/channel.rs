//! Channel-based data source.
//!
//! Receives telemetry batches via a tokio watch channel. Producers push the
//! latest batch; the TUI only ever sees the most recent one.

use tokio::sync::watch;

use super::{DataSource, TelemetryBatch};

/// A data source that receives telemetry batches via a channel.
///
/// # Example
///
/// ```
/// use wirewatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("replay");
/// tx.send(Vec::new()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TelemetryBatch>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where batches come from
    /// (e.g. "replay", "https://backend").
    pub fn new(receiver: watch::Receiver<TelemetryBatch>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair; the sender pushes batches to the returned source.
    pub fn create(source_description: &str) -> (watch::Sender<TelemetryBatch>, Self) {
        let (tx, rx) = watch::channel(TelemetryBatch::default());
        (tx, Self::new(rx, source_description))
    }

    /// Whether the sending side has gone away.
    pub fn is_closed(&self) -> bool {
        self.receiver.has_changed().is_err()
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<TelemetryBatch> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

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
        self.is_closed().then(|| "channel closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirewatch_types::TelemetryRecord;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        // initial empty batch
        let batch = source.poll();
        assert!(batch.unwrap().is_empty());

        assert!(source.poll().is_none());

        tx.send(vec![TelemetryRecord::builder("11554").build()]).unwrap();

        let batch = source.poll().unwrap();
        assert_eq!(batch.len(), 1);
        assert!(source.error().is_none());
    }

    #[test]
    fn test_channel_source_reports_closed() {
        let (tx, source) = ChannelSource::create("test");
        drop(tx);
        assert!(source.is_closed());
        assert_eq!(source.error().as_deref(), Some("channel closed"));
    }
}
