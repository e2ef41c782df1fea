//! # wirewatch
//!
//! A terminal dashboard and library for monitoring wire-transfer traffic
//! across the systems of a payment chain.
//!
//! Telemetry records from the log-search backend are classified per system
//! (is traffic flowing, is volume on trend) and shown both as a table and
//! on a sectioned flow diagram of the chain that adapts to the terminal
//! width.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(classify,│    │(render) │    │         │ │
//! │  └────┬────┘    │ layout)  │    └─────────┘    └─────────┘ │
//! │       │         └──────────┘                                │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | HttpSource | ChannelSource    │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, node selection and search
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for file polling, the HTTP backend and channels
//! - **[`data`]**: Traffic/trend classification, the diagram layout
//!   transformer, drill-down rows and transaction search summaries
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Settings from a TOML file and `WIREWATCH_*` variables
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Replay a captured telemetry batch
//! wirewatch --file telemetry.json
//!
//! # Poll the backend every 30 seconds
//! wirewatch --endpoint https://payments-monitor.internal --refresh 30s
//!
//! # Look up one transaction and print its summary
//! wirewatch --endpoint https://payments-monitor.internal --search-id AB12CD34EF56GH78
//! ```
//!
//! ### As a library
//!
//! ```
//! use wirewatch::{App, Diagram, FileSource, LayoutConfig, RawGraph};
//!
//! let layout = LayoutConfig::default();
//! let diagram = Diagram::transform(&RawGraph::default(), &layout);
//! let source = Box::new(FileSource::new("telemetry.json"));
//! let app = App::new(source, diagram, layout);
//! ```
//!
//! ### Classifying a batch
//!
//! ```
//! use wirewatch::{traffic_status_by_system, TelemetryRecord, TrafficFlowing, TrafficStatus};
//!
//! let batch = vec![
//!     TelemetryRecord::builder("11554").traffic(TrafficFlowing::Yes).build(),
//!     TelemetryRecord::builder("11554").traffic(TrafficFlowing::No).build(),
//! ];
//! let traffic = traffic_status_by_system(&batch);
//! assert_eq!(traffic["11554"], TrafficStatus::Red);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::classify::{traffic_status_by_system, trend_status_by_system};
pub use data::{
    DashboardData, Diagram, DiagramEdge, DiagramNode, Export, Focus, Health, LayoutConfig,
    SearchParams, SearchResult, SystemData, TrafficStatus, TrendStatus,
};
pub use source::{ChannelSource, DataSource, FileSource, HttpSource, SearchTask, TelemetryBatch};
pub use wirewatch_types::{RawGraph, TelemetryRecord, TrafficFlowing};
