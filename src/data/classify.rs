//! Traffic and trend classification for monitored systems.
//!
//! Every function here is pure and total: the result depends only on the
//! multiset of input records, never on their order or on previous calls.

use std::collections::BTreeMap;

use serde::Serialize;
use wirewatch_types::TelemetryRecord;

/// Lower bound of the healthy std-variation band.
const GREEN_LOW: f64 = -20.0;
/// Upper bound of the healthy std-variation band.
const GREEN_HIGH: f64 = -6.0;
/// Values below this are a statistically low volume.
const RED_BELOW: f64 = -10.0;
/// Values above this are an unusually high volume.
const YELLOW_ABOVE: f64 = 30.0;

/// Whether traffic is observed moving through a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficStatus {
    Green,
    Red,
    Grey,
}

/// Whether a system's current volume matches its historical baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Green,
    Yellow,
    Red,
    Grey,
}

impl TrafficStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrafficStatus::Green => "Flowing",
            TrafficStatus::Red => "Stopped",
            TrafficStatus::Grey => "N/A",
        }
    }
}

impl TrendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrendStatus::Green => "On trend",
            TrendStatus::Yellow => "Watch",
            TrendStatus::Red => "Low",
            TrendStatus::Grey => "N/A",
        }
    }

    /// Single-character marker drawn next to a diagram node.
    pub fn marker(&self) -> &'static str {
        match self {
            TrendStatus::Green => "=",
            TrendStatus::Yellow => "~",
            TrendStatus::Red => "v",
            TrendStatus::Grey => "?",
        }
    }
}

/// Overall health of a system, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Health {
    Healthy,
    Unknown,
    Warning,
    Critical,
}

impl Health {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Health::Healthy => "OK",
            Health::Unknown => "N/A",
            Health::Warning => "WARN",
            Health::Critical => "CRIT",
        }
    }

    /// The worse of the traffic and trend ranks.
    pub fn rollup(traffic: TrafficStatus, trend: TrendStatus) -> Self {
        Health::from(traffic).max(Health::from(trend))
    }
}

impl From<TrafficStatus> for Health {
    fn from(status: TrafficStatus) -> Self {
        match status {
            TrafficStatus::Green => Health::Healthy,
            TrafficStatus::Grey => Health::Unknown,
            TrafficStatus::Red => Health::Critical,
        }
    }
}

impl From<TrendStatus> for Health {
    fn from(status: TrendStatus) -> Self {
        match status {
            TrendStatus::Green => Health::Healthy,
            TrendStatus::Grey => Health::Unknown,
            TrendStatus::Yellow => Health::Warning,
            TrendStatus::Red => Health::Critical,
        }
    }
}

/// Classify one std-variation value.
///
/// The healthy band is checked first, so the values shared with the
/// yellow band (`-10..=-6`) are green. Never returns grey.
pub fn classify_std_variation(value: f64) -> TrendStatus {
    if (GREEN_LOW..=GREEN_HIGH).contains(&value) {
        TrendStatus::Green
    } else if value > YELLOW_ABOVE || (RED_BELOW..=GREEN_HIGH).contains(&value) {
        TrendStatus::Yellow
    } else if value < RED_BELOW {
        TrendStatus::Red
    } else {
        TrendStatus::Yellow
    }
}

/// Traffic status of one system from all of its records.
///
/// Any record reporting no traffic makes the system red. The system is
/// green only when every record reports traffic. Anything else is grey,
/// including an empty slice and a mix of flowing and unknown.
pub fn traffic_status<'a, I>(records: I) -> TrafficStatus
where
    I: IntoIterator<Item = &'a TelemetryRecord>,
{
    let mut seen = false;
    let mut all_flowing = true;

    for record in records {
        seen = true;
        match record.is_traffic_flowing.as_bool() {
            Some(false) => return TrafficStatus::Red,
            Some(true) => {}
            None => all_flowing = false,
        }
    }

    if seen && all_flowing {
        TrafficStatus::Green
    } else {
        TrafficStatus::Grey
    }
}

/// Trend status of one system from all of its records.
///
/// Records whose std variation is missing or malformed are ignored. With no
/// usable value the system is grey.
pub fn trend_status<'a, I>(records: I) -> TrendStatus
where
    I: IntoIterator<Item = &'a TelemetryRecord>,
{
    let mut any_yellow = false;
    let mut any_value = false;

    for status in records
        .into_iter()
        .filter_map(TelemetryRecord::std_variation)
        .map(classify_std_variation)
    {
        any_value = true;
        match status {
            TrendStatus::Red => return TrendStatus::Red,
            TrendStatus::Yellow => any_yellow = true,
            _ => {}
        }
    }

    match (any_value, any_yellow) {
        (false, _) => TrendStatus::Grey,
        (true, true) => TrendStatus::Yellow,
        (true, false) => TrendStatus::Green,
    }
}

/// Group a flat batch by system id, preserving input order within a group.
pub fn group_by_system(records: &[TelemetryRecord]) -> BTreeMap<&str, Vec<&TelemetryRecord>> {
    let mut groups: BTreeMap<&str, Vec<&TelemetryRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.system_id.as_str()).or_default().push(record);
    }
    groups
}

/// Traffic status for every system in a batch.
pub fn traffic_status_by_system(records: &[TelemetryRecord]) -> BTreeMap<String, TrafficStatus> {
    group_by_system(records)
        .into_iter()
        .map(|(id, group)| (id.to_string(), traffic_status(group)))
        .collect()
}

/// Trend status for every system in a batch.
///
/// A system whose values are all malformed still appears, as grey.
pub fn trend_status_by_system(records: &[TelemetryRecord]) -> BTreeMap<String, TrendStatus> {
    group_by_system(records)
        .into_iter()
        .map(|(id, group)| (id.to_string(), trend_status(group)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirewatch_types::TrafficFlowing;

    fn flowing(id: &str, value: TrafficFlowing) -> TelemetryRecord {
        TelemetryRecord::builder(id).traffic(value).build()
    }

    fn variation(id: &str, value: &str) -> TelemetryRecord {
        TelemetryRecord::builder(id).std_variation(value).build()
    }

    #[test]
    fn test_traffic_any_no_is_red() {
        let records = vec![
            flowing("1", TrafficFlowing::Yes),
            flowing("1", TrafficFlowing::No),
            flowing("1", TrafficFlowing::Unknown),
        ];
        assert_eq!(traffic_status(&records), TrafficStatus::Red);
    }

    #[test]
    fn test_traffic_all_no_is_red_for_any_length() {
        for len in 1..=5 {
            let records = vec![flowing("1", TrafficFlowing::No); len];
            assert_eq!(traffic_status(&records), TrafficStatus::Red, "len {len}");
        }

        // a single No anywhere among Yes records
        for pos in 0..4 {
            let mut records = vec![flowing("1", TrafficFlowing::Yes); 4];
            records[pos] = flowing("1", TrafficFlowing::No);
            assert_eq!(traffic_status(&records), TrafficStatus::Red, "pos {pos}");
        }
    }

    #[test]
    fn test_traffic_all_yes_is_green() {
        let records = vec![flowing("1", TrafficFlowing::Yes), flowing("1", TrafficFlowing::Yes)];
        assert_eq!(traffic_status(&records), TrafficStatus::Green);
    }

    #[test]
    fn test_traffic_grey_cases() {
        assert_eq!(traffic_status(&[]), TrafficStatus::Grey);

        let unknown = vec![flowing("1", TrafficFlowing::Unknown)];
        assert_eq!(traffic_status(&unknown), TrafficStatus::Grey);

        let mixed = vec![flowing("1", TrafficFlowing::Yes), flowing("1", TrafficFlowing::Unknown)];
        assert_eq!(traffic_status(&mixed), TrafficStatus::Grey);
    }

    #[test]
    fn test_traffic_is_order_independent() {
        let mut records = vec![
            flowing("1", TrafficFlowing::Unknown),
            flowing("1", TrafficFlowing::Yes),
            flowing("1", TrafficFlowing::No),
        ];
        let forward = traffic_status(&records);
        records.reverse();
        assert_eq!(traffic_status(&records), forward);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_std_variation(-20.0), TrendStatus::Green);
        assert_eq!(classify_std_variation(-10.0), TrendStatus::Green);
        assert_eq!(classify_std_variation(-6.0), TrendStatus::Green);
        assert_eq!(classify_std_variation(-5.99), TrendStatus::Yellow);
        assert_eq!(classify_std_variation(-20.01), TrendStatus::Red);
        assert_eq!(classify_std_variation(0.0), TrendStatus::Yellow);
        assert_eq!(classify_std_variation(30.0), TrendStatus::Yellow);
        assert_eq!(classify_std_variation(30.5), TrendStatus::Yellow);
        assert_eq!(classify_std_variation(-100.0), TrendStatus::Red);
    }

    #[test]
    fn test_trend_aggregation() {
        let red = vec![variation("1", "-8"), variation("1", "-25"), variation("1", "40")];
        assert_eq!(trend_status(&red), TrendStatus::Red);

        let yellow = vec![variation("1", "-8"), variation("1", "40")];
        assert_eq!(trend_status(&yellow), TrendStatus::Yellow);

        let green = vec![variation("1", "-8"), variation("1", "-15")];
        assert_eq!(trend_status(&green), TrendStatus::Green);

        assert_eq!(trend_status(&[]), TrendStatus::Grey);
    }

    #[test]
    fn test_trend_ignores_malformed_values() {
        let records = vec![variation("1", "abc"), variation("1", ""), variation("1", " -8 ")];
        assert_eq!(trend_status(&records), TrendStatus::Green);

        let only_bad = vec![variation("1", "NaN"), variation("1", "n/a")];
        assert_eq!(trend_status(&only_bad), TrendStatus::Grey);
    }

    #[test]
    fn test_by_system_maps() {
        let records = vec![
            flowing("2", TrafficFlowing::No),
            flowing("1", TrafficFlowing::Yes),
            variation("3", "garbage"),
            variation("1", "-12"),
        ];

        let traffic = traffic_status_by_system(&records);
        assert_eq!(traffic.keys().collect::<Vec<_>>(), vec!["1", "2", "3"]);
        assert_eq!(traffic["2"], TrafficStatus::Red);
        // system 1 has one Yes and one record with no traffic value
        assert_eq!(traffic["1"], TrafficStatus::Grey);

        let trend = trend_status_by_system(&records);
        assert_eq!(trend["1"], TrendStatus::Green);
        assert_eq!(trend["3"], TrendStatus::Grey);
        assert_eq!(trend["2"], TrendStatus::Grey);
    }

    #[test]
    fn test_health_rollup() {
        assert_eq!(Health::rollup(TrafficStatus::Green, TrendStatus::Green), Health::Healthy);
        assert_eq!(Health::rollup(TrafficStatus::Green, TrendStatus::Yellow), Health::Warning);
        assert_eq!(Health::rollup(TrafficStatus::Red, TrendStatus::Green), Health::Critical);
        assert_eq!(Health::rollup(TrafficStatus::Grey, TrendStatus::Green), Health::Unknown);
        assert!(Health::Critical > Health::Warning);
        assert!(Health::Warning > Health::Unknown);
    }

    #[test]
    fn test_colors_serialize_lowercase() {
        let json = serde_json::to_string(&TrendStatus::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
        let json = serde_json::to_string(&TrafficStatus::Grey).unwrap();
        assert_eq!(json, "\"grey\"");
    }
}
