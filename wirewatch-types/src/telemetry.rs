//! Telemetry records returned by the log-search backend.

/// Tri-state "is traffic flowing" column.
///
/// The backend emits `"Yes"`, `"No"` or `null`. Anything other than the two
/// exact strings, including booleans and numbers, is treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "Option<String>"))]
pub enum TrafficFlowing {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TrafficFlowing {
    /// Parse a raw column value.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Yes") => TrafficFlowing::Yes,
            Some("No") => TrafficFlowing::No,
            _ => TrafficFlowing::Unknown,
        }
    }

    /// `Some(true)` for Yes, `Some(false)` for No, `None` when unknown.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TrafficFlowing::Yes => Some(true),
            TrafficFlowing::No => Some(false),
            TrafficFlowing::Unknown => None,
        }
    }

    /// Short label for tables.
    pub fn label(self) -> &'static str {
        match self {
            TrafficFlowing::Yes => "Yes",
            TrafficFlowing::No => "No",
            TrafficFlowing::Unknown => "N/A",
        }
    }
}

impl From<Option<String>> for TrafficFlowing {
    fn from(raw: Option<String>) -> Self {
        Self::parse(raw.as_deref())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TrafficFlowing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = crate::nullable::string(deserializer)?;
        Ok(Self::parse(Some(&raw)))
    }
}

impl From<TrafficFlowing> for Option<String> {
    fn from(value: TrafficFlowing) -> Self {
        match value {
            TrafficFlowing::Yes => Some("Yes".to_string()),
            TrafficFlowing::No => Some("No".to_string()),
            TrafficFlowing::Unknown => None,
        }
    }
}

/// One row of monitoring data for one system at one point in time.
///
/// Many records share a `system_id`; each describes the system's traffic
/// towards or from one peer. Numeric columns are kept as the strings the
/// backend sent, since they may be malformed. Use the accessor methods to
/// read them as numbers.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// AIT number of the monitored system.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "aiT_NUM", default, deserialize_with = "crate::nullable::string")
    )]
    pub system_id: String,

    /// Display name of the monitored system.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "aiT_NAME", default, deserialize_with = "crate::nullable::string")
    )]
    pub system_name: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "floW_DIRECTION",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub flow_direction: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "floW_AIT_NUM",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub flow_peer_id: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "floW_AIT_NAME",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub flow_peer_name: String,

    #[cfg_attr(feature = "serde", serde(rename = "iS_TRAFFIC_FLOWING", default))]
    pub is_traffic_flowing: TrafficFlowing,

    /// Free-text trend status, e.g. "On-Trend" or "Off-Trend".
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "iS_TRAFFIC_ON_TREND",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub is_traffic_on_trend: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "averagE_TRANSACTION_COUNT",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub average_transaction_count: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "currenT_TRANSACTION_COUNT",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub current_transaction_count: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "historiC_MEAN",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub historic_mean: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "historiC_STD",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub historic_std_dev: String,

    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "currenT_STD_VARIATION",
            default,
            deserialize_with = "crate::nullable::string"
        )
    )]
    pub current_std_variation: String,
}

impl TelemetryRecord {
    /// Create a builder for a record belonging to `system_id`.
    pub fn builder(system_id: impl Into<String>) -> TelemetryRecordBuilder {
        TelemetryRecordBuilder::new(system_id)
    }

    /// Current standard-deviation variation, if the column is numeric.
    pub fn std_variation(&self) -> Option<f64> {
        parse_number(&self.current_std_variation)
    }

    /// Current transaction count, if the column is numeric.
    pub fn current_count(&self) -> Option<f64> {
        parse_number(&self.current_transaction_count)
    }

    /// Average transaction count, if the column is numeric.
    pub fn average_count(&self) -> Option<f64> {
        parse_number(&self.average_transaction_count)
    }

    pub fn historic_mean(&self) -> Option<f64> {
        parse_number(&self.historic_mean)
    }

    pub fn historic_std_dev(&self) -> Option<f64> {
        parse_number(&self.historic_std_dev)
    }
}

/// Parse a numeric column. Blank, malformed, NaN and infinite values yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Builder for [`TelemetryRecord`], mostly useful for tests and fixtures.
#[derive(Debug, Clone)]
pub struct TelemetryRecordBuilder {
    record: TelemetryRecord,
}

impl TelemetryRecordBuilder {
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            record: TelemetryRecord {
                system_id: system_id.into(),
                ..Default::default()
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.system_name = name.into();
        self
    }

    /// Set the direction and the peer system on the other end.
    pub fn flow(
        mut self,
        direction: impl Into<String>,
        peer_id: impl Into<String>,
        peer_name: impl Into<String>,
    ) -> Self {
        self.record.flow_direction = direction.into();
        self.record.flow_peer_id = peer_id.into();
        self.record.flow_peer_name = peer_name.into();
        self
    }

    pub fn traffic(mut self, flowing: TrafficFlowing) -> Self {
        self.record.is_traffic_flowing = flowing;
        self
    }

    pub fn on_trend(mut self, status: impl Into<String>) -> Self {
        self.record.is_traffic_on_trend = status.into();
        self
    }

    /// Set the average and current transaction counts.
    pub fn counts(mut self, average: impl Into<String>, current: impl Into<String>) -> Self {
        self.record.average_transaction_count = average.into();
        self.record.current_transaction_count = current.into();
        self
    }

    /// Set the historic mean and standard deviation.
    pub fn historic(mut self, mean: impl Into<String>, std_dev: impl Into<String>) -> Self {
        self.record.historic_mean = mean.into();
        self.record.historic_std_dev = std_dev.into();
        self
    }

    pub fn std_variation(mut self, value: impl Into<String>) -> Self {
        self.record.current_std_variation = value.into();
        self
    }

    pub fn build(self) -> TelemetryRecord {
        self.record
    }
}
