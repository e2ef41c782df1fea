//! Per-system volume history for sparklines.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::dashboard::DashboardData;

/// Maximum number of polls to keep per system.
const MAX_HISTORY_SIZE: usize = 60;

/// Rolling current-volume totals per system, one entry per poll.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub volumes: HashMap<String, VecDeque<f64>>,
    pub timestamps: VecDeque<Instant>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the volumes of a freshly polled batch.
    pub fn record(&mut self, data: &DashboardData) {
        for system in &data.systems {
            let volumes = self.volumes.entry(system.id.clone()).or_default();
            volumes.push_back(system.current_volume);
            if volumes.len() > MAX_HISTORY_SIZE {
                volumes.pop_front();
            }
        }

        self.timestamps.push_back(data.last_updated);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Volume sparkline for a system, normalized to 0-7 for 8 bar levels.
    ///
    /// Returns an empty Vec until there are at least two samples.
    pub fn volume_sparkline(&self, system_id: &str) -> Vec<u8> {
        let Some(values) = self.volumes.get(system_id) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        let range = max - min;

        values
            .iter()
            .map(|&v| {
                if range <= 0.0 {
                    // flat line sits mid-height
                    3
                } else {
                    (((v - min) / range) * 7.0).round().clamp(0.0, 7.0) as u8
                }
            })
            .collect()
    }

    /// Change in volume since the previous poll.
    pub fn volume_delta(&self, system_id: &str) -> Option<f64> {
        let values = self.volumes.get(system_id)?;
        let current = *values.back()?;
        let previous = *values.get(values.len().checked_sub(2)?)?;
        Some(current - previous)
    }
}
