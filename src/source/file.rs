//! File-based data source.
//!
//! Polls a JSON file holding an array of telemetry records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{DataSource, TelemetryBatch};

/// A data source that reads telemetry batches from a JSON file.
///
/// Useful for replaying a captured backend response or for feeding the
/// dashboard from an external exporter that rewrites the file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TelemetryBatch> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|content| {
                serde_json::from_str::<TelemetryBatch>(&content)
                    .map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(batch) => {
                debug!("read {} records from {}", batch.len(), self.path.display());
                self.last_error = None;
                Some(batch)
            }
            Err(e) => {
                warn!("{}: {}", self.path.display(), e);
                self.last_error = Some(e);
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<TelemetryBatch> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            // file disappeared, keep showing the last batch
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let batch = self.read_file()?;
        self.last_modified = current_modified;
        Some(batch)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"[
            {"aiT_NUM": "11554", "aiT_NAME": "Wire Gateway", "iS_TRAFFIC_FLOWING": "Yes"},
            {"aiT_NUM": "20001", "iS_TRAFFIC_FLOWING": "No"}
        ]"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/telemetry.json");
        assert_eq!(source.path(), Path::new("/tmp/telemetry.json"));
        assert_eq!(source.description(), "file: /tmp/telemetry.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_once() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let batch = source.poll().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].system_id, "11554");

        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/telemetry.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"not\": \"an array\"}}").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_fix() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "garbage").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        // last_modified is only stored on success, so the next poll rereads
        std::fs::write(file.path(), sample_json()).unwrap();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
