//! Inventory scanner
//!
//! Turns the raw directory listing into the ordered snapshot every other
//! component works from: probe timestamps sorted newest first.

use crate::error::{MonitorError, Result};
use crate::types::ProbeTimestamp;
use tracing::debug;

/// Parse raw filenames into a descending-sorted inventory.
///
/// Every file in the probe directory must be named by a positive integer
/// timestamp; anything else means external interference with the working
/// directory and is surfaced rather than dropped.
pub fn scan(names: Vec<String>) -> Result<Vec<ProbeTimestamp>> {
    let mut inventory = Vec::with_capacity(names.len());
    for name in names {
        let timestamp = name
            .parse::<ProbeTimestamp>()
            .ok()
            .filter(|&ts| ts > 0)
            .ok_or(MonitorError::InvalidProbeName(name))?;
        inventory.push(timestamp);
    }
    inventory.sort_unstable_by(|a, b| b.cmp(a));
    debug!(probes = inventory.len(), "Scanned probe inventory");
    Ok(inventory)
}
