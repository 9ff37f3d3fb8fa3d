//! Core types for the page-cache monitor

use serde::Serialize;
use std::path::PathBuf;

/// Seconds-resolution Unix timestamp that names a probe file.
///
/// A probe's timestamp is its identity: the filename, the file content,
/// and the creation instant are all the same number.
pub type ProbeTimestamp = i64;

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Directory the probe files live in; must exist before startup
    pub probe_dir: PathBuf,
    /// Seconds between cycles
    pub interval_secs: u64,
    /// Maximum probe age before eviction regardless of residency
    pub max_time_window_secs: u64,
    /// Push the metric to a local DogStatsD daemon instead of stdout
    pub send_metrics_to_dogstatsd: bool,
    /// DogStatsD datagram target
    pub dogstatsd_addr: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_dir: PathBuf::from("tmp/"),
            interval_secs: 5,
            max_time_window_secs: 3600, // 1 hour
            send_metrics_to_dogstatsd: false,
            dogstatsd_addr: "127.0.0.1:8125".to_string(),
        }
    }
}

/// Outcome of one completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Seconds the oldest surviving probe has stayed cached
    pub min_cached_time: u64,
    /// Probes evicted this cycle
    pub evicted: usize,
}

/// Counters accumulated over the life of the run loop
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStats {
    pub cycles: u64,
    pub probes_evicted: u64,
    pub cycles_abandoned: u64,
}
