//! Settings loaded from an optional TOML file and the environment.
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! `WIREWATCH_*` environment variables (nested keys use `__`, e.g.
//! `WIREWATCH_SOURCE__ENDPOINT`), then command-line flags applied by `main`.
//!
//! ```toml
//! [source]
//! endpoint = "https://payments-monitor.internal"
//! refresh = "30s"
//!
//! [logging]
//! level = "debug"
//! file = "wirewatch.log"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use wirewatch_types::RawGraph;

use crate::data::LayoutConfig;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_NAME: &str = "wirewatch";

/// The US wires payment chain, used when no graph file is configured.
const DEFAULT_GRAPH: &str = include_str!("../assets/us-wires-flow.json");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub logging: LoggingSettings,
    /// Replaces the built-in US wires section layout when present.
    pub layout: Option<LayoutConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Telemetry JSON file to poll.
    pub file: Option<PathBuf>,
    /// Log-search backend base URL.
    pub endpoint: Option<String>,
    /// Bearer token for the backend.
    pub token: Option<String>,
    /// Graph description; the embedded US wires graph when absent.
    pub graph: Option<PathBuf>,
    pub refresh: String,
    pub timeout: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            file: None,
            endpoint: None,
            token: None,
            graph: None,
            refresh: "30s".to_string(),
            timeout: "10s".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file. Interactive mode does not log without one.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `wirewatch.toml` if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("WIREWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("loading configuration")?
            .try_deserialize()
            .context("parsing configuration")?;

        debug!("loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// The section layout to use, validated.
    pub fn layout(&self) -> Result<LayoutConfig> {
        let layout = self.layout.clone().unwrap_or_default();
        layout.validate().context("invalid section layout")?;
        Ok(layout)
    }

    /// The graph description: the configured file, else the embedded one.
    pub fn graph(&self) -> Result<RawGraph> {
        let graph = match &self.source.graph {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading graph from {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("parsing graph {}", path.display()))?
            }
            None => serde_json::from_str(DEFAULT_GRAPH).context("parsing embedded graph")?,
        };
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.source.refresh, "30s");
        assert_eq!(settings.logging.level, "info");
        assert!(settings.layout.is_none());
        assert_eq!(settings.layout().unwrap(), LayoutConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_toml(
            r#"
            [source]
            endpoint = "http://backend:8080"
            refresh = "5s"

            [logging]
            level = "debug"
            file = "/tmp/wirewatch.log"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.source.endpoint.as_deref(), Some("http://backend:8080"));
        assert_eq!(settings.source.refresh, "5s");
        assert_eq!(settings.source.timeout, "10s");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(
            settings.logging.file.as_deref(),
            Some(Path::new("/tmp/wirewatch.log"))
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/wirewatch.toml"))).is_err());
    }

    #[test]
    fn test_embedded_graph_fits_default_layout() {
        let settings = Settings::default();
        let graph = settings.graph().unwrap();
        let layout = settings.layout().unwrap();

        assert!(!graph.nodes.is_empty());
        assert!(graph
            .nodes
            .iter()
            .all(|n| layout.section_for(&n.category).is_some()));

        let ids: std::collections::HashSet<&str> =
            graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len());
    }

    #[test]
    fn test_graph_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": [{{"id": "1", "class": "edge", "data": {{"label": "Edge"}}}}], "edges": []}}"#
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.source.graph = Some(file.path().to_path_buf());
        let graph = settings.graph().unwrap();
        assert_eq!(graph.nodes[0].category, "edge");
        assert_eq!(graph.nodes[0].label(), "Edge");
    }

    #[test]
    fn test_layout_override_is_validated() {
        let file = write_toml(
            r#"
            [layout]
            gap = 8.0
            overflow_start_y = 100.0
            overflow_step = 120.0

            [layout.categories]
            edge = "bg-edge"

            [[layout.sections]]
            id = "bg-edge"
            title = "Edge"
            x = 0.0
            width = 400.0
            height = 600.0
            base_x = 20.0
            slots = [{ x = 20.0, y = 100.0 }]
            proportion = 0.5
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert!(settings.layout.is_some());
        assert!(settings.layout().is_err());
    }
}
