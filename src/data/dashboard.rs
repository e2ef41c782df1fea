//! Per-system aggregation of a telemetry batch.
//!
//! Groups a flat batch of records by system and annotates each system with
//! its traffic and trend colors and an overall health rank.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use wirewatch_types::TelemetryRecord;

use super::classify::{group_by_system, traffic_status, trend_status, Health, TrafficStatus, TrendStatus};

/// One monitored system with its classification.
#[derive(Debug, Clone)]
pub struct SystemData {
    pub id: String,
    /// First non-empty name reported for the system, or the id.
    pub name: String,
    pub traffic: TrafficStatus,
    pub trend: TrendStatus,
    pub health: Health,
    /// Sum of current transaction counts; malformed counts are skipped.
    pub current_volume: f64,
    /// Sum of average transaction counts; malformed counts are skipped.
    pub average_volume: f64,
    /// Number of flows (records) reported for the system.
    pub flows: usize,
}

impl SystemData {
    fn from_group(id: &str, records: &[&TelemetryRecord]) -> Self {
        let traffic = traffic_status(records.iter().copied());
        let trend = trend_status(records.iter().copied());

        let name = records
            .iter()
            .map(|r| r.system_name.trim())
            .find(|n| !n.is_empty())
            .unwrap_or(id)
            .to_string();

        Self {
            id: id.to_string(),
            name,
            traffic,
            trend,
            health: Health::rollup(traffic, trend),
            current_volume: records.iter().filter_map(|r| r.current_count()).sum(),
            average_volume: records.iter().filter_map(|r| r.average_count()).sum(),
            flows: records.len(),
        }
    }
}

/// Classified view of the latest telemetry batch.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Systems sorted worst health first, then by id.
    pub systems: Vec<SystemData>,
    /// The raw batch, kept for drill-down.
    pub records: Vec<TelemetryRecord>,
    pub last_updated: Instant,
}

impl Default for DashboardData {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl DashboardData {
    /// Load and classify a telemetry batch from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading telemetry from {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse a JSON array of telemetry records.
    pub fn parse(content: &str) -> Result<Self> {
        let records: Vec<TelemetryRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// Classify a batch. This is the conversion used by every data source.
    pub fn from_records(records: Vec<TelemetryRecord>) -> Self {
        let mut systems: Vec<SystemData> = group_by_system(&records)
            .into_iter()
            .map(|(id, group)| SystemData::from_group(id, &group))
            .collect();

        systems.sort_by(|a, b| b.health.cmp(&a.health).then_with(|| a.id.cmp(&b.id)));

        Self {
            systems,
            records,
            last_updated: Instant::now(),
        }
    }

    pub fn system(&self, id: &str) -> Option<&SystemData> {
        self.systems.iter().find(|s| s.id == id)
    }

    /// Number of systems at the given health.
    pub fn count(&self, health: Health) -> usize {
        self.systems.iter().filter(|s| s.health == health).count()
    }

    /// Worst health across all systems; healthy when there are none.
    pub fn overall_health(&self) -> Health {
        self.systems
            .iter()
            .map(|s| s.health)
            .max()
            .unwrap_or(Health::Healthy)
    }

    /// Systems that are not healthy, worst first.
    pub fn unhealthy(&self) -> impl Iterator<Item = &SystemData> {
        self.systems.iter().filter(|s| s.health > Health::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirewatch_types::TrafficFlowing;

    fn batch() -> Vec<TelemetryRecord> {
        vec![
            TelemetryRecord::builder("200")
                .name("Router")
                .traffic(TrafficFlowing::Yes)
                .std_variation("-8")
                .counts("100", "90")
                .build(),
            TelemetryRecord::builder("100")
                .traffic(TrafficFlowing::No)
                .counts("50", "oops")
                .build(),
            TelemetryRecord::builder("100")
                .name("Gateway")
                .traffic(TrafficFlowing::Yes)
                .counts("50", "40")
                .build(),
            TelemetryRecord::builder("300")
                .traffic(TrafficFlowing::Yes)
                .std_variation("45")
                .build(),
        ]
    }

    #[test]
    fn test_from_records_groups_and_sorts() {
        let data = DashboardData::from_records(batch());
        let ids: Vec<&str> = data.systems.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "300", "200"]);

        let gateway = data.system("100").unwrap();
        assert_eq!(gateway.name, "Gateway");
        assert_eq!(gateway.traffic, TrafficStatus::Red);
        assert_eq!(gateway.health, Health::Critical);
        assert_eq!(gateway.current_volume, 40.0);
        assert_eq!(gateway.average_volume, 100.0);
        assert_eq!(gateway.flows, 2);

        assert_eq!(data.system("300").unwrap().health, Health::Warning);
        assert_eq!(data.system("300").unwrap().name, "300");
        assert_eq!(data.system("200").unwrap().health, Health::Healthy);
    }

    #[test]
    fn test_counts_and_overall() {
        let data = DashboardData::from_records(batch());
        assert_eq!(data.count(Health::Critical), 1);
        assert_eq!(data.count(Health::Warning), 1);
        assert_eq!(data.count(Health::Healthy), 1);
        assert_eq!(data.overall_health(), Health::Critical);
        assert_eq!(data.unhealthy().count(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let data = DashboardData::default();
        assert!(data.systems.is_empty());
        assert_eq!(data.overall_health(), Health::Healthy);
    }

    #[test]
    fn test_parse_backend_json() {
        let json = r#"[
            {"aiT_NUM": "11554", "aiT_NAME": "Wire Gateway", "iS_TRAFFIC_FLOWING": "Yes",
             "currenT_STD_VARIATION": "-7.5", "currenT_TRANSACTION_COUNT": "120"},
            {"aiT_NUM": "11554", "iS_TRAFFIC_FLOWING": null, "currenT_STD_VARIATION": null}
        ]"#;
        let data = DashboardData::parse(json).unwrap();
        let system = data.system("11554").unwrap();
        assert_eq!(system.traffic, TrafficStatus::Grey);
        assert_eq!(system.trend, TrendStatus::Green);
        assert_eq!(system.current_volume, 120.0);
    }

    #[test]
    fn test_parse_keeps_batch_with_non_string_values() {
        let json = r#"[
            {"aiT_NUM": "11554", "iS_TRAFFIC_FLOWING": "Yes", "currenT_STD_VARIATION": "-8"},
            {"aiT_NUM": "11872", "iS_TRAFFIC_FLOWING": true, "currenT_STD_VARIATION": -25.5,
             "currenT_TRANSACTION_COUNT": 640}
        ]"#;
        let data = DashboardData::parse(json).unwrap();
        assert_eq!(data.systems.len(), 2);
        assert_eq!(data.system("11554").unwrap().trend, TrendStatus::Green);

        let treasury = data.system("11872").unwrap();
        assert_eq!(treasury.traffic, TrafficStatus::Grey);
        assert_eq!(treasury.trend, TrendStatus::Red);
        assert_eq!(treasury.current_volume, 640.0);
    }
}
