//! Shared library for the fleet telemetry monitor.
//!
//! Holds everything the binary does not own outright: the snapshot data
//! model and aggregation math, the error taxonomy, and configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::MonitorConfig;
pub use error::FleetError;
pub use types::{
    decode_snapshot, summarize, FleetHealth, FleetSnapshot, FleetSummary, RobotRecord,
    BATTERY_CRITICAL_PCT,
};
