//! Cycle driver
//!
//! Runs the measurement loop: create a probe, snapshot the inventory,
//! plan the eviction boundary, evict, derive the minimum cached time, and
//! publish it. One cycle fully completes before the next begins; the only
//! suspension point is the interval sleep, which shutdown interrupts.

use crate::error::{MonitorError, Result};
use crate::inventory;
use crate::planner;
use crate::sink::{MetricSink, METRIC_NAME};
use crate::store::ProbeStore;
use crate::types::{CycleReport, MonitorConfig, MonitorStats, ProbeTimestamp};
use chrono::Utc;
use page_residency::ResidencyOracle;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Owns one probe directory and measures page-cache retention over it
pub struct PageCacheMonitor {
    config: MonitorConfig,
    store: ProbeStore,
    oracle: Box<dyn ResidencyOracle + Send + Sync>,
    sink: Box<dyn MetricSink>,
}

impl PageCacheMonitor {
    pub fn new(
        config: MonitorConfig,
        oracle: Box<dyn ResidencyOracle + Send + Sync>,
        sink: Box<dyn MetricSink>,
    ) -> Self {
        let store = ProbeStore::new(config.probe_dir.clone());
        Self {
            config,
            store,
            oracle,
            sink,
        }
    }

    /// Validate the probe directory; failures here are startup-fatal.
    pub async fn init(&self) -> Result<()> {
        self.store.init().await
    }

    /// Run cycles until the shutdown channel fires.
    ///
    /// A failed cycle is logged and abandoned; the loop always proceeds to
    /// the normal sleep, never tightening into a busy-loop. The one
    /// exception is probe creation failing, which ends the run: without
    /// fresh probes there is nothing left to measure.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        info!("Monitor running");
        let mut stats = MonitorStats::default();

        loop {
            match shutdown.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => {
                    info!("Shutdown requested, stopping monitor");
                    break;
                }
            }

            match self.cycle().await {
                Ok(report) => {
                    stats.cycles += 1;
                    stats.probes_evicted += report.evicted as u64;
                }
                Err(e @ MonitorError::ProbeCreate(_)) => {
                    error!(error = %e, "Probe creation failed, terminating monitor");
                    return Err(e);
                }
                Err(e) => {
                    stats.cycles += 1;
                    stats.cycles_abandoned += 1;
                    warn!(error = %e, "Cycle abandoned");
                }
            }

            tokio::select! {
                _ = sleep(Duration::from_secs(self.config.interval_secs)) => {}
                _ = shutdown.recv() => {
                    info!("Shutdown requested, stopping monitor");
                    break;
                }
            }
        }

        info!(
            cycles = stats.cycles,
            probes_evicted = stats.probes_evicted,
            cycles_abandoned = stats.cycles_abandoned,
            "Monitor stopped"
        );
        Ok(())
    }

    /// One full cycle: create, scan, plan, evict, derive, publish.
    async fn cycle(&self) -> Result<CycleReport> {
        self.store.create().await?;
        let names = self.store.list().await?;
        let inventory = inventory::scan(names)?;
        let now = Utc::now().timestamp();

        let boundary = planner::plan(
            &self.store,
            self.oracle.as_ref(),
            &inventory,
            now,
            self.config.max_time_window_secs,
        )?;

        let evicted = self.evict(&inventory, boundary).await?;
        let min_cached_time = Self::derive_metric(&inventory, boundary, now)?;

        self.sink.publish(METRIC_NAME, min_cached_time).await?;
        info!(
            "Current min time page is cached: {} seconds",
            min_cached_time
        );

        Ok(CycleReport {
            min_cached_time,
            evicted,
        })
    }

    /// Delete every probe at or beyond the boundary. The just-created
    /// probe sits at index 0 and is never inside the evicted region.
    async fn evict(
        &self,
        inventory: &[ProbeTimestamp],
        boundary: Option<usize>,
    ) -> Result<usize> {
        let boundary = match boundary {
            Some(boundary) => boundary,
            None => return Ok(0),
        };

        debug!(
            probes = inventory.len(),
            boundary, "Evicting probes from boundary to end of inventory"
        );
        for &timestamp in &inventory[boundary..] {
            self.store.delete(timestamp).await?;
        }
        Ok(inventory.len() - boundary)
    }

    /// Minimum cached time: age of the oldest probe that survived
    /// eviction, computed against the pre-eviction inventory.
    fn derive_metric(
        inventory: &[ProbeTimestamp],
        boundary: Option<usize>,
        now: i64,
    ) -> Result<u64> {
        if inventory.is_empty() {
            return Err(MonitorError::EmptyInventory);
        }
        let oldest_surviving = match boundary {
            // Boundary at 0 means nothing survived
            Some(0) => return Err(MonitorError::EmptyInventory),
            Some(boundary) => inventory[boundary - 1],
            None => inventory[inventory.len() - 1],
        };
        Ok((now - oldest_surviving).max(0) as u64)
    }
}
