//! Fleet snapshot data model and aggregation.
//!
//! A snapshot is a JSON array of robot records owned by an external
//! producer. The only field the monitor consumes is `battery`; everything
//! else a record carries is kept opaque and passed through untouched.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FleetError;

/// Average battery at or below this percentage classifies the fleet as
/// critical. The comparison is strictly greater-than for healthy.
pub const BATTERY_CRITICAL_PCT: f64 = 20.0;

/// One robot as reported by the producer.
///
/// `id` and `battery` are the fields the monitor understands; any other
/// producer fields (position, color, robot type, ...) land in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Battery percentage, 0-100 by convention. Not enforced by the
    /// producer, so absence is handled explicitly (see [`summarize`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RobotRecord {
    /// Human-readable handle for log lines: the producer id when present,
    /// otherwise the array position.
    fn label(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("#{}", index),
        }
    }
}

/// Point-in-time fleet state: the decoded form of the stored blob.
pub type FleetSnapshot = Vec<RobotRecord>;

/// Aggregate statistics computed from one non-empty snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSummary {
    /// Number of records in the snapshot, including any excluded from the
    /// battery average.
    pub active_count: usize,
    /// Arithmetic mean of `battery` across records that carry the field.
    pub avg_battery: f64,
    /// Records skipped for a missing `battery` field.
    pub excluded: usize,
    /// Raw payload length in bytes.
    pub payload_bytes: usize,
}

impl FleetSummary {
    pub fn health(&self) -> FleetHealth {
        FleetHealth::classify(self.avg_battery)
    }
}

/// Presentation-only classification of the fleet battery average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetHealth {
    Healthy,
    Critical,
}

impl FleetHealth {
    /// Healthy iff the average is strictly above the critical threshold.
    pub fn classify(avg_battery: f64) -> Self {
        if avg_battery > BATTERY_CRITICAL_PCT {
            FleetHealth::Healthy
        } else {
            FleetHealth::Critical
        }
    }
}

/// Decode a raw snapshot blob into records.
///
/// Fails if the blob is not valid JSON or not an array of objects. The
/// producer may be mid-write, so callers treat this as transient.
pub fn decode_snapshot(blob: &str) -> Result<FleetSnapshot, FleetError> {
    let records: FleetSnapshot = serde_json::from_str(blob)?;
    Ok(records)
}

/// Compute aggregate statistics over a non-empty snapshot.
///
/// Missing-battery policy: exclude-and-warn. A record without `battery`
/// still counts as active but is left out of the mean, with a warning
/// naming it. A snapshot where no record carries `battery` is unusable
/// and fails; missing is never treated as zero.
pub fn summarize(records: &[RobotRecord], payload_bytes: usize) -> Result<FleetSummary, FleetError> {
    if records.is_empty() {
        return Err(FleetError::Decode(
            "cannot summarize an empty fleet".to_string(),
        ));
    }

    let mut sum = 0.0;
    let mut sampled = 0usize;
    for (index, record) in records.iter().enumerate() {
        match record.battery {
            Some(pct) => {
                sum += pct;
                sampled += 1;
            }
            None => {
                warn!(
                    robot = %record.label(index),
                    "record missing battery field, excluded from fleet average"
                );
            }
        }
    }

    if sampled == 0 {
        return Err(FleetError::Decode(
            "no record carries a battery reading".to_string(),
        ));
    }

    Ok(FleetSummary {
        active_count: records.len(),
        avg_battery: sum / sampled as f64,
        excluded: records.len() - sampled,
        payload_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize_blob(blob: &str) -> FleetSummary {
        let records = decode_snapshot(blob).unwrap();
        summarize(&records, blob.len()).unwrap()
    }

    #[test]
    fn test_active_count_matches_record_count() {
        let summary = summarize_blob(r#"[{"battery":10},{"battery":20},{"battery":30}]"#);
        assert_eq!(summary.active_count, 3);
        assert_eq!(summary.excluded, 0);
    }

    #[test]
    fn test_avg_battery_is_arithmetic_mean() {
        let summary = summarize_blob(r#"[{"battery":50},{"battery":70}]"#);
        assert_eq!(summary.active_count, 2);
        assert!((summary.avg_battery - 60.0).abs() < f64::EPSILON);
        assert_eq!(summary.health(), FleetHealth::Healthy);
    }

    #[test]
    fn test_threshold_equality_is_critical() {
        // avg of 30 and 10 is exactly 20.0; the rule is strictly greater-than
        let summary = summarize_blob(r#"[{"battery":30},{"battery":10}]"#);
        assert_eq!(summary.active_count, 2);
        assert!((summary.avg_battery - 20.0).abs() < f64::EPSILON);
        assert_eq!(summary.health(), FleetHealth::Critical);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(FleetHealth::classify(20.0), FleetHealth::Critical);
        assert_eq!(FleetHealth::classify(20.1), FleetHealth::Healthy);
        assert_eq!(FleetHealth::classify(0.0), FleetHealth::Critical);
        assert_eq!(FleetHealth::classify(100.0), FleetHealth::Healthy);
    }

    #[test]
    fn test_missing_battery_excluded_but_active() {
        let summary = summarize_blob(r#"[{"battery":80},{"id":"B"}]"#);
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.excluded, 1);
        assert!((summary.avg_battery - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_records_missing_battery_fails() {
        let records = decode_snapshot(r#"[{"id":"A"},{"id":"B"}]"#).unwrap();
        let err = summarize(&records, 0).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_empty_snapshot_is_never_summarized() {
        let records = decode_snapshot("[]").unwrap();
        assert!(records.is_empty());
        // The loop branches on empty before computing; summarize refuses it
        assert!(summarize(&records, 2).is_err());
    }

    #[test]
    fn test_malformed_json_fails_decode() {
        let err = decode_snapshot("{not json").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_wrong_shape_fails_decode() {
        assert!(decode_snapshot(r#"{"robots":[]}"#).is_err());
        assert!(decode_snapshot(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn test_opaque_fields_pass_through() {
        let records = decode_snapshot(
            r#"[{"id":"A","battery":95.5,"color":"hotpink","position":[0,0,0],"robotType":"ironhog"}]"#,
        )
        .unwrap();
        assert_eq!(records[0].id.as_deref(), Some("A"));
        assert_eq!(records[0].battery, Some(95.5));
        assert_eq!(records[0].extra.len(), 3);
        assert!(records[0].extra.contains_key("robotType"));

        // Unknown fields survive re-serialization untouched
        let round = serde_json::to_string(&records[0]).unwrap();
        assert!(round.contains("hotpink"));
    }

    #[test]
    fn test_payload_bytes_reported_verbatim() {
        let blob = r#"[{"battery":42}]"#;
        let summary = summarize_blob(blob);
        assert_eq!(summary.payload_bytes, blob.len());
    }
}
