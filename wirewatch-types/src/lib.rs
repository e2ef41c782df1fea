//! # wirewatch-types
//!
//! Data-contract types shared between the wirewatch dashboard and the
//! log-search adapters. These mirror the flat JSON shapes the backend
//! returns, so field names on the wire keep the backend's exact casing.
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization via serde, using the backend field names
//!
//! ## Example
//!
//! ```rust
//! use wirewatch_types::{TelemetryRecord, TrafficFlowing};
//!
//! let record = TelemetryRecord::builder("11554")
//!     .name("Wire Gateway")
//!     .traffic(TrafficFlowing::Yes)
//!     .std_variation("-8.5")
//!     .build();
//!
//! assert_eq!(record.system_id, "11554");
//! assert_eq!(record.std_variation(), Some(-8.5));
//! ```

mod graph;
mod telemetry;
mod transaction;

#[cfg(feature = "serde")]
mod nullable;

pub use graph::*;
pub use telemetry::*;
pub use transaction::*;
