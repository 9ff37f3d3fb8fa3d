//! Eviction planner
//!
//! Walks the descending-sorted inventory twice, once for age and once
//! for residency, and combines both scans into a single eviction
//! boundary: the newest index at which probes stop being worth keeping.

use crate::error::Result;
use crate::store::ProbeStore;
use crate::types::ProbeTimestamp;
use page_residency::ResidencyOracle;
use std::fs::File;
use tracing::debug;

/// Index of the first probe older than the retention window.
///
/// The inventory is sorted newest first, so every index at or after the
/// returned one is at least as old.
pub fn first_expired(
    inventory: &[ProbeTimestamp],
    now: i64,
    max_time_window_secs: u64,
) -> Option<usize> {
    let cutoff = now - max_time_window_secs as i64;
    for (idx, &timestamp) in inventory.iter().enumerate() {
        if timestamp < cutoff {
            debug!(probe = timestamp, index = idx, "First expired probe");
            return Some(idx);
        }
    }
    None
}

/// Index of the first probe whose page is no longer cache-resident.
///
/// Residency is not monotonic with age (the kernel can evict out of
/// order under memory pressure), so every probe is checked newest to
/// oldest until the streak breaks. Each probe's handle is closed before
/// the next one is opened.
pub fn first_not_resident(
    store: &ProbeStore,
    oracle: &dyn ResidencyOracle,
    inventory: &[ProbeTimestamp],
) -> Result<Option<usize>> {
    for (idx, &timestamp) in inventory.iter().enumerate() {
        let file = File::open(store.path_for(timestamp))?;
        if !oracle.is_resident(&file)? {
            debug!(probe = timestamp, index = idx, "First non-resident probe");
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

/// Combine both scans into the eviction boundary.
///
/// Either condition alone disqualifies a probe, so when both scans find
/// something the smaller (newest) index wins: keeping a probe that is
/// expired or already evicted from cache would corrupt the metric.
pub fn eviction_boundary(
    expired: Option<usize>,
    not_resident: Option<usize>,
) -> Option<usize> {
    match (expired, not_resident) {
        (Some(expired), Some(not_resident)) => Some(expired.min(not_resident)),
        (Some(expired), None) => Some(expired),
        (None, Some(not_resident)) => Some(not_resident),
        (None, None) => None,
    }
}

/// Run both scans against the current inventory and pick the boundary.
pub fn plan(
    store: &ProbeStore,
    oracle: &dyn ResidencyOracle,
    inventory: &[ProbeTimestamp],
    now: i64,
    max_time_window_secs: u64,
) -> Result<Option<usize>> {
    let expired = first_expired(inventory, now, max_time_window_secs);
    let not_resident = first_not_resident(store, oracle, inventory)?;
    Ok(eviction_boundary(expired, not_resident))
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_residency::{PageResidency, ResidencyError};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tempfile::tempdir;

    const INVENTORY: [ProbeTimestamp; 7] = [
        1693739406, 1693739405, 1693739404, 1693739403, 1693739402, 1693739349, 1693739348,
    ];
    const NOW: i64 = 1693739410;

    /// Oracle that replays a scripted residency sequence.
    struct ScriptedOracle {
        script: RefCell<VecDeque<bool>>,
    }

    impl ScriptedOracle {
        fn new(script: &[bool]) -> Self {
            Self {
                script: RefCell::new(script.iter().copied().collect()),
            }
        }
    }

    impl ResidencyOracle for ScriptedOracle {
        fn residency(&self, _file: &File) -> page_residency::Result<PageResidency> {
            let resident = self
                .script
                .borrow_mut()
                .pop_front()
                .ok_or(ResidencyError::EmptyFile)?;
            Ok(PageResidency {
                cached: if resident { 1 } else { 0 },
                total: 1,
            })
        }
    }

    fn store_with_inventory(dir: &std::path::Path) -> ProbeStore {
        let store = ProbeStore::new(dir.to_path_buf());
        for &timestamp in &INVENTORY {
            std::fs::write(store.path_for(timestamp), timestamp.to_string()).unwrap();
        }
        store
    }

    #[test]
    fn test_first_expired_finds_oldest_region() {
        // Window 60s: cutoff is 1693739350, so index 5 (1693739349) is the
        // first expired probe
        assert_eq!(first_expired(&INVENTORY, NOW, 60), Some(5));
    }

    #[test]
    fn test_first_expired_none_within_window() {
        assert_eq!(first_expired(&INVENTORY, NOW, 120), None);
    }

    #[test]
    fn test_first_expired_everything_after_is_also_expired() {
        let idx = first_expired(&INVENTORY, NOW, 60).unwrap();
        let cutoff = NOW - 60;
        for &timestamp in &INVENTORY[idx..] {
            assert!(timestamp < cutoff);
        }
    }

    #[test]
    fn test_first_not_resident_stops_at_streak_break() {
        let dir = tempdir().unwrap();
        let store = store_with_inventory(dir.path());
        let oracle = ScriptedOracle::new(&[true, true, true, false]);

        let idx = first_not_resident(&store, &oracle, &INVENTORY).unwrap();
        assert_eq!(idx, Some(3));
    }

    #[test]
    fn test_first_not_resident_all_cached() {
        let dir = tempdir().unwrap();
        let store = store_with_inventory(dir.path());
        let oracle = ScriptedOracle::new(&[true; 7]);

        let idx = first_not_resident(&store, &oracle, &INVENTORY).unwrap();
        assert_eq!(idx, None);
    }

    #[test]
    fn test_first_not_resident_ignores_later_pattern() {
        // Residency need not be monotonic; only the first break matters
        let dir = tempdir().unwrap();
        let store = store_with_inventory(dir.path());
        let oracle = ScriptedOracle::new(&[true, false, true, false, true, true, true]);

        let idx = first_not_resident(&store, &oracle, &INVENTORY).unwrap();
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn test_boundary_is_minimum_of_both() {
        assert_eq!(eviction_boundary(Some(5), Some(3)), Some(3));
        assert_eq!(eviction_boundary(Some(2), Some(3)), Some(2));
    }

    #[test]
    fn test_boundary_uses_whichever_exists() {
        assert_eq!(eviction_boundary(Some(3), None), Some(3));
        assert_eq!(eviction_boundary(None, Some(1)), Some(1));
    }

    #[test]
    fn test_boundary_none_when_neither_exists() {
        assert_eq!(eviction_boundary(None, None), None);
    }

    #[test]
    fn test_plan_combines_expiry_and_residency() {
        // Expiry finds index 5, residency finds index 3; the newest
        // disqualifying index wins
        let dir = tempdir().unwrap();
        let store = store_with_inventory(dir.path());
        let oracle = ScriptedOracle::new(&[true, true, true, false]);

        let boundary = plan(&store, &oracle, &INVENTORY, NOW, 60).unwrap();
        assert_eq!(boundary, Some(3));
    }

    #[test]
    fn test_plan_healthy_inventory_has_no_boundary() {
        let dir = tempdir().unwrap();
        let store = store_with_inventory(dir.path());
        let oracle = ScriptedOracle::new(&[true; 7]);

        let boundary = plan(&store, &oracle, &INVENTORY, NOW, 120).unwrap();
        assert_eq!(boundary, None);
    }

    #[test]
    fn test_plan_empty_inventory() {
        let dir = tempdir().unwrap();
        let store = ProbeStore::new(dir.path().to_path_buf());
        let oracle = ScriptedOracle::new(&[]);

        let boundary = plan(&store, &oracle, &[], NOW, 60).unwrap();
        assert_eq!(boundary, None);
    }
}
