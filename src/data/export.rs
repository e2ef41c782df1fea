//! JSON export of the classified dashboard and the fitted diagram.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::classify::{traffic_status_by_system, trend_status_by_system, Health, TrafficStatus, TrendStatus};
use super::dashboard::DashboardData;
use super::layout::{Diagram, LayoutConfig};

/// Canvas width used when no size is given: the built-in sections side by side.
pub const DEFAULT_WIDTH: f64 = 1650.0;
/// Canvas height used when no size is given.
pub const DEFAULT_HEIGHT: f64 = 960.0;

/// Health counts across all systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub total_systems: usize,
    pub healthy: usize,
    pub unknown: usize,
    pub warning: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedSystem {
    pub id: String,
    pub name: String,
    pub traffic: TrafficStatus,
    pub trend: TrendStatus,
    pub health: Health,
    pub current_volume: f64,
    pub average_volume: f64,
    pub flows: usize,
}

/// Everything written by `--export` and the in-app export key.
#[derive(Debug, Clone, Serialize)]
pub struct Export {
    pub summary: ExportSummary,
    /// System id to traffic color.
    pub traffic: BTreeMap<String, TrafficStatus>,
    /// System id to trend color.
    pub trend: BTreeMap<String, TrendStatus>,
    pub systems: Vec<ExportedSystem>,
    /// The diagram fitted to the requested canvas size.
    pub diagram: Diagram,
}

impl Export {
    pub fn build(
        data: &DashboardData,
        diagram: &Diagram,
        layout: &LayoutConfig,
        width: f64,
        height: f64,
    ) -> Self {
        let summary = ExportSummary {
            total_systems: data.systems.len(),
            healthy: data.count(Health::Healthy),
            unknown: data.count(Health::Unknown),
            warning: data.count(Health::Warning),
            critical: data.count(Health::Critical),
        };

        let systems = data
            .systems
            .iter()
            .map(|s| ExportedSystem {
                id: s.id.clone(),
                name: s.name.clone(),
                traffic: s.traffic,
                trend: s.trend,
                health: s.health,
                current_volume: s.current_volume,
                average_volume: s.average_volume,
                flows: s.flows,
            })
            .collect();

        Self {
            summary,
            traffic: traffic_status_by_system(&data.records),
            trend: trend_status_by_system(&data.records),
            systems,
            diagram: diagram.relayout(layout, width, height),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the export as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing export to {}", path.display()))
    }
}
