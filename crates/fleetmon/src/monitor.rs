//! Snapshot summarizer - the fixed-period polling loop.
//!
//! One cooperative loop, no background tasks. Each tick fetches the blob,
//! decodes it, computes aggregates, and reports one status line. Decode
//! failures are transient (the producer may be mid-write) and never stop
//! the loop; read failures escalate to fatal only after a configured
//! number of consecutive misses.

use fleet_common::{decode_snapshot, summarize, FleetError, FleetSummary, MonitorConfig};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::output;
use crate::store::SnapshotStore;

/// Result of one polling iteration.
#[derive(Debug)]
pub enum TickOutcome {
    /// Key not set in the store.
    Absent,
    /// Valid snapshot, zero robots.
    EmptyFleet,
    /// Valid non-empty snapshot with computed aggregates.
    Report(FleetSummary),
    /// Blob unreadable this iteration; loop continues.
    DecodeFailed(String),
    /// Store read failed this iteration; counts toward escalation.
    ReadFailed(String),
}

/// Suppresses identical consecutive error lines.
struct ErrorDedupe {
    last: Option<String>,
    suppressed: u32,
}

impl ErrorDedupe {
    fn new() -> Self {
        Self {
            last: None,
            suppressed: 0,
        }
    }

    /// Whether this message should be reported. Repeats of the previous
    /// message are counted instead of reprinted.
    fn should_report(&mut self, message: &str) -> bool {
        if self.last.as_deref() == Some(message) {
            self.suppressed += 1;
            return false;
        }
        self.flush_suppressed();
        self.last = Some(message.to_string());
        true
    }

    /// Clear on any successful iteration.
    fn reset(&mut self) {
        self.flush_suppressed();
        self.last = None;
    }

    fn flush_suppressed(&mut self) {
        if self.suppressed > 0 {
            debug!(repeats = self.suppressed, "suppressed repeated error line");
            self.suppressed = 0;
        }
    }
}

/// Drives the poll-decode-report cycle against an injected store client.
pub struct Monitor<S: SnapshotStore> {
    store: S,
    config: MonitorConfig,
    read_failures: u32,
    dedupe: ErrorDedupe,
}

impl<S: SnapshotStore> Monitor<S> {
    pub fn new(store: S, config: MonitorConfig) -> Self {
        Self {
            store,
            config,
            read_failures: 0,
            dedupe: ErrorDedupe::new(),
        }
    }

    /// Consecutive store read failures since the last successful read.
    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    /// One full iteration: fetch, decode, compute.
    pub async fn tick(&mut self) -> TickOutcome {
        let blob = match self.store.fetch_blob().await {
            Ok(blob) => blob,
            Err(e) => {
                self.read_failures += 1;
                return TickOutcome::ReadFailed(e.to_string());
            }
        };
        self.read_failures = 0;

        let blob = match blob {
            Some(blob) => blob,
            None => return TickOutcome::Absent,
        };

        let payload_bytes = blob.len();
        let records = match decode_snapshot(&blob) {
            Ok(records) => records,
            Err(e) => return TickOutcome::DecodeFailed(e.to_string()),
        };

        if records.is_empty() {
            return TickOutcome::EmptyFleet;
        }

        match summarize(&records, payload_bytes) {
            Ok(summary) => TickOutcome::Report(summary),
            Err(e) => TickOutcome::DecodeFailed(e.to_string()),
        }
    }

    /// Run until interrupted (Ctrl+C).
    pub async fn run(&mut self) -> Result<(), FleetError> {
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        self.run_until(ctrl_c).await
    }

    /// Run the polling loop until `cancel` completes.
    ///
    /// Cancellation is observed at the interval boundary, never mid-decode.
    /// Returns Ok on cancellation, Err only when consecutive read failures
    /// exceed the configured limit.
    pub async fn run_until<F>(&mut self, cancel: F) -> Result<(), FleetError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        let period = Duration::from_secs(self.config.interval_secs.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut cancel => {
                    output::print_stopped();
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let outcome = self.tick().await;
                    self.render(&outcome);

                    if self.config.max_read_failures > 0
                        && self.read_failures >= self.config.max_read_failures
                    {
                        return Err(FleetError::Connection(format!(
                            "store unreachable for {} consecutive polls, giving up",
                            self.read_failures
                        )));
                    }
                }
            }
        }
    }

    fn render(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Absent => {
                self.dedupe.reset();
                output::print_waiting_for_data();
            }
            TickOutcome::EmptyFleet => {
                self.dedupe.reset();
                output::print_waiting_for_robots();
            }
            TickOutcome::Report(summary) => {
                self.dedupe.reset();
                output::print_status(summary);
            }
            TickOutcome::DecodeFailed(msg) | TickOutcome::ReadFailed(msg) => {
                if self.dedupe.should_report(msg) {
                    output::display_error(msg);
                }
            }
        }
    }
}
