//! Error types for the fleet monitor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    /// Store unreachable. Fatal at startup; mid-loop it is a per-iteration
    /// failure until the consecutive-failure limit trips.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// Payload has the wrong shape or carries no usable telemetry.
    #[error("Snapshot decode error: {0}")]
    Decode(String),

    /// Payload is not valid JSON.
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FleetError {
    /// Decode-class errors are always non-fatal for the polling loop.
    pub fn is_decode(&self) -> bool {
        matches!(self, FleetError::Decode(_) | FleetError::Json(_))
    }
}
