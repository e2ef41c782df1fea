//! Per-system drill-down rows.
//!
//! One row per telemetry record of the selected system, enriched with the
//! volume delta against the historical average and a short analytics note.

use serde::Serialize;
use wirewatch_types::{TelemetryRecord, TrafficFlowing};

/// Note attached to rows whose volume is well below average while off-trend.
pub const LOW_VOLUME_NOTE: &str = "Current Volume is Statistically Low";

/// Delta below which an off-trend row gets [`LOW_VOLUME_NOTE`].
const LOW_VOLUME_DELTA: f64 = -10.0;

/// Which aspect of the system the drill-down was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    /// Traffic flowing and current volume.
    #[default]
    Flow,
    /// On-trend text and volume delta.
    Trend,
    /// The balanced flag.
    Balanced,
}

impl Focus {
    pub fn label(&self) -> &'static str {
        match self {
            Focus::Flow => "Flow",
            Focus::Trend => "Trend",
            Focus::Balanced => "Balanced",
        }
    }

    /// Cycle to the next focus.
    pub fn next(self) -> Self {
        match self {
            Focus::Flow => Focus::Trend,
            Focus::Trend => Focus::Balanced,
            Focus::Balanced => Focus::Flow,
        }
    }

    /// Whether `column` is emphasized under this focus.
    pub fn highlights(&self, column: Column) -> bool {
        matches!(
            (self, column),
            (Focus::Flow, Column::TrafficFlowing)
                | (Focus::Flow, Column::CurrentCount)
                | (Focus::Trend, Column::OnTrend)
                | (Focus::Trend, Column::Delta)
                | (Focus::Balanced, Column::Balanced)
        )
    }
}

/// Columns of the drill-down table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Direction,
    PeerId,
    PeerName,
    TrafficFlowing,
    OnTrend,
    StdVariation,
    HistoricMean,
    HistoricStdDev,
    CurrentCount,
    AverageCount,
    Delta,
    Balanced,
    Analytics,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Direction,
        Column::PeerId,
        Column::PeerName,
        Column::TrafficFlowing,
        Column::OnTrend,
        Column::StdVariation,
        Column::HistoricMean,
        Column::HistoricStdDev,
        Column::CurrentCount,
        Column::AverageCount,
        Column::Delta,
        Column::Balanced,
        Column::Analytics,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Direction => "Direction",
            Column::PeerId => "Flow AIT",
            Column::PeerName => "Flow AIT Name",
            Column::TrafficFlowing => "Flowing",
            Column::OnTrend => "On Trend",
            Column::StdVariation => "Std Var",
            Column::HistoricMean => "Hist Mean",
            Column::HistoricStdDev => "Hist Std",
            Column::CurrentCount => "Current",
            Column::AverageCount => "Average",
            Column::Delta => "Delta",
            Column::Balanced => "Balanced",
            Column::Analytics => "Analytics",
        }
    }
}

/// One enriched drill-down row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownRow {
    pub direction: String,
    pub peer_id: String,
    pub peer_name: String,
    pub traffic_flowing: TrafficFlowing,
    pub on_trend: String,
    pub std_variation: Option<f64>,
    pub historic_mean: Option<f64>,
    pub historic_std_dev: Option<f64>,
    pub current_count: Option<f64>,
    pub average_count: Option<f64>,
    /// Percent change of current against average volume.
    pub delta_pct: f64,
    pub balanced: bool,
    pub analytics: String,
}

impl DrillDownRow {
    pub fn from_record(record: &TelemetryRecord) -> Self {
        let current = record.current_count();
        let average = record.average_count();
        let delta_pct = delta_pct(current, average);
        let balanced = is_on_trend(&record.is_traffic_on_trend);

        let on_trend = if balanced {
            format!("On-Trend ({})", format_percent(delta_pct.abs()))
        } else {
            record.is_traffic_on_trend.clone()
        };

        let analytics = if !balanced && delta_pct < LOW_VOLUME_DELTA {
            LOW_VOLUME_NOTE.to_string()
        } else {
            String::new()
        };

        Self {
            direction: normalize_direction(&record.flow_direction),
            peer_id: record.flow_peer_id.clone(),
            peer_name: record.flow_peer_name.clone(),
            traffic_flowing: record.is_traffic_flowing,
            on_trend,
            std_variation: record.std_variation(),
            historic_mean: record.historic_mean(),
            historic_std_dev: record.historic_std_dev(),
            current_count: current,
            average_count: average,
            delta_pct,
            balanced,
            analytics,
        }
    }

    /// Display text of one cell.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Direction => self.direction.clone(),
            Column::PeerId => self.peer_id.clone(),
            Column::PeerName => self.peer_name.clone(),
            Column::TrafficFlowing => self.traffic_flowing.label().to_string(),
            Column::OnTrend if self.on_trend.is_empty() => "-".to_string(),
            Column::OnTrend => self.on_trend.clone(),
            Column::StdVariation => format_number(self.std_variation, 2),
            Column::HistoricMean => format_number(self.historic_mean, 0),
            Column::HistoricStdDev => format_number(self.historic_std_dev, 0),
            Column::CurrentCount => format_number(self.current_count, 0),
            Column::AverageCount => format_number(self.average_count, 0),
            Column::Delta => format_percent(self.delta_pct),
            Column::Balanced => (if self.balanced { "Yes" } else { "No" }).to_string(),
            Column::Analytics => self.analytics.clone(),
        }
    }
}

/// Drill-down rows for one system, in batch order.
pub fn rows_for_system(records: &[TelemetryRecord], system_id: &str) -> Vec<DrillDownRow> {
    records
        .iter()
        .filter(|r| r.system_id == system_id)
        .map(DrillDownRow::from_record)
        .collect()
}

/// `(current - average) / average * 100`, or 0 without a usable average.
///
/// A missing current count also yields 0.
pub fn delta_pct(current: Option<f64>, average: Option<f64>) -> f64 {
    match (current, average) {
        (Some(current), Some(average)) if average.is_finite() && average != 0.0 => {
            (current - average) / average * 100.0
        }
        _ => 0.0,
    }
}

/// Case-insensitive match on "on-trend" anywhere in the text.
pub fn is_on_trend(text: &str) -> bool {
    text.to_ascii_lowercase().contains("on-trend")
}

/// `"INBOUND_FROM"` becomes `"Inbound From"`.
pub fn normalize_direction(direction: &str) -> String {
    direction
        .to_lowercase()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Signed percentage with two decimals; positive values get a `+`.
pub fn format_percent(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

fn format_number(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_default()
}
