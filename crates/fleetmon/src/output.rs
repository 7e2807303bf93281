//! Terminal output - single rewritten status line plus banners.
//!
//! Status renders rewrite one stdout line in place (carriage return plus
//! ANSI clear-line). Errors go to stderr, one line each. Diagnostics go
//! through tracing, which main points at stderr, so the status line on
//! stdout stays intact.

use chrono::Local;
use fleet_common::{FleetHealth, FleetSummary};
use owo_colors::OwoColorize;
use std::io::{self, Write};

const THIN_SEPARATOR: &str = "--------------------------------------------------";

/// Rewrite the current status line in place.
fn rewrite_line(text: &str) {
    let mut out = io::stdout();
    let _ = write!(out, "\r\x1b[K{}", text);
    let _ = out.flush();
}

/// One status line: wall-clock stamp, active count, battery average with
/// classification color, raw payload size.
pub fn format_status_line(summary: &FleetSummary) -> String {
    let stamp = Local::now().format("%H:%M:%S");
    let pct = format!("{:.1}%", summary.avg_battery);
    let pct = match summary.health() {
        FleetHealth::Healthy => pct.green().to_string(),
        FleetHealth::Critical => pct.red().to_string(),
    };
    format!(
        "[{}] Active Agents: {} | Fleet Battery Health: {} | Raw Data Stream: {} bytes",
        stamp,
        summary.active_count.bold(),
        pct,
        summary.payload_bytes
    )
}

pub fn print_status(summary: &FleetSummary) {
    rewrite_line(&format_status_line(summary));
}

/// Key not set yet: the producer has not published anything.
pub fn print_waiting_for_data() {
    rewrite_line(&"Waiting for fleet data...".yellow().to_string());
}

/// Snapshot exists but the fleet is empty.
pub fn print_waiting_for_robots() {
    rewrite_line(&"Waiting for active robots...".yellow().to_string());
}

pub fn print_connected(url: &str) {
    println!("{} Connected to fleet telemetry store at {}", "[OK]".green(), url);
}

pub fn print_connect_failed(url: &str, detail: &str) {
    eprintln!("{} {}", "[ERROR]".red(), detail);
    eprintln!("Is the store running? Try: redis-cli -u {} ping", url);
}

pub fn print_monitor_started() {
    println!(
        "{}",
        "Starting fleet telemetry monitor (press Ctrl+C to stop)".cyan()
    );
    println!("{}", THIN_SEPARATOR.dimmed());
}

pub fn print_stopped() {
    println!("\n{}", "Telemetry monitor stopped.".cyan());
}

/// Display an error (single line, stderr)
pub fn display_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red(), message);
}
