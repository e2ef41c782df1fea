//! Data models and processing for telemetry batches and the flow diagram.
//!
//! Everything here is synchronous and free of I/O apart from
//! [`DashboardData::load`] and [`search::execute`].
//!
//! ## Submodules
//!
//! - [`classify`]: traffic and trend colors per system ([`TrafficStatus`], [`TrendStatus`], [`Health`])
//! - [`layout`]: sectioned diagram layout and responsive re-layout ([`Diagram`], [`LayoutConfig`])
//! - [`connections`]: node selection and connected-edge highlighting
//! - [`drilldown`]: per-system table rows with volume delta and analytics note
//! - [`search`]: transaction search parameters and result summaries
//! - [`dashboard`]: per-system aggregation of a batch ([`DashboardData`])
//! - [`history`]: rolling volume history for sparklines
//! - [`export`]: JSON export of classifications and the fitted diagram
//! - [`duration`]: parsing and formatting of refresh intervals
//!
//! ## Data Flow
//!
//! ```text
//! Vec<TelemetryRecord> (raw JSON)
//!        │
//!        ▼
//! DashboardData::from_records()
//!        │
//!        ├──▶ SystemData (traffic, trend, health)
//!        │
//!        └──▶ History::record() (for sparklines)
//!
//! RawGraph + LayoutConfig
//!        │
//!        ▼
//! Diagram::transform() ──▶ Diagram::relayout(width, height) on every draw
//! ```

pub mod classify;
pub mod connections;
pub mod dashboard;
pub mod drilldown;
pub mod duration;
pub mod export;
pub mod history;
pub mod layout;
pub mod search;

pub use classify::{Health, TrafficStatus, TrendStatus};
pub use connections::{Connections, Selection};
pub use dashboard::{DashboardData, SystemData};
pub use drilldown::{DrillDownRow, Focus};
pub use export::Export;
pub use history::History;
pub use layout::{Diagram, DiagramEdge, DiagramNode, LayoutConfig, LayoutConfigError};
pub use search::{SearchParams, SearchResult, TransactionSummary};
