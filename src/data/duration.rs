use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to milliseconds multiplier (longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("s", 1_000.0),
    ("m", 60_000.0),
    ("h", 3_600_000.0),
];

/// Parse refresh intervals like "30s", "500ms", "2m", "1.5h"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !(val.is_finite() && val >= 0.0) {
                bail!("Invalid duration: {}", s);
            }
            return Ok(Duration::from_millis((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Compact age for the header, e.g. "4s ago", "3m ago"
pub fn format_age(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

/// Format an interval for display
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis % 60_000 == 0 {
        format!("{}m", millis / 60_000)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}
